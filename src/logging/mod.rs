// Logging module - developer console for the TUI
//
// While the TUI owns the terminal, tracing output would tear through the
// alternate screen. ConsoleLayer captures events into a bounded ConsoleBuffer
// instead; the TUI shows it in its developer console overlay.

use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// Maximum number of console entries kept in memory
const MAX_CONSOLE_ENTRIES: usize = 1000;

/// A single captured tracing event
#[derive(Debug, Clone)]
pub struct ConsoleEntry {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub message: String,
}

impl ConsoleEntry {
    /// `HH:MM:SS LEVEL message`
    pub fn line(&self) -> String {
        format!(
            "{} {:5} {}",
            self.timestamp.format("%H:%M:%S"),
            self.level.as_str(),
            self.message
        )
    }
}

/// Bounded ring buffer of console entries
#[derive(Clone, Default)]
pub struct ConsoleBuffer {
    entries: Arc<Mutex<VecDeque<ConsoleEntry>>>,
}

impl ConsoleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, VecDeque<ConsoleEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append, dropping the oldest entry when full
    pub fn push(&self, entry: ConsoleEntry) {
        let mut entries = self.entries();
        if entries.len() >= MAX_CONSOLE_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// The newest `count` entries, oldest first
    pub fn tail(&self, count: usize) -> Vec<ConsoleEntry> {
        let entries = self.entries();
        let skip = entries.len().saturating_sub(count);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }
}

/// Tracing layer that records events into a ConsoleBuffer
pub struct ConsoleLayer {
    buffer: ConsoleBuffer,
}

impl ConsoleLayer {
    pub fn new(buffer: ConsoleBuffer) -> Self {
        Self { buffer }
    }
}

impl<S> Layer<S> for ConsoleLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut message = String::new();
        event.record(&mut MessageVisitor(&mut message));

        self.buffer.push(ConsoleEntry {
            timestamp: Local::now(),
            level: *event.metadata().level(),
            message,
        });
    }
}

/// Pulls the `message` field out of an event, plus any extra fields as
/// `key=value`
struct MessageVisitor<'a>(&'a mut String);

impl tracing::field::Visit for MessageVisitor<'_> {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.0.insert_str(0, value);
        } else {
            self.0.push_str(&format!(" {}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0.insert_str(0, &format!("{:?}", value));
        } else {
            self.0.push_str(&format!(" {}={:?}", field.name(), value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn captures_messages_and_fields() {
        let buffer = ConsoleBuffer::new();
        let subscriber = tracing_subscriber::registry().with(ConsoleLayer::new(buffer.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(profile = "acct-2", "Switch refused");
            tracing::info!("Bot started");
        });

        let entries = buffer.tail(10);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, Level::WARN);
        assert_eq!(entries[0].message, "Switch refused profile=acct-2");
        assert_eq!(entries[1].message, "Bot started");
        assert!(entries[1].line().contains("INFO  Bot started"));
    }

    #[test]
    fn buffer_is_bounded() {
        let buffer = ConsoleBuffer::new();
        for i in 0..MAX_CONSOLE_ENTRIES + 5 {
            buffer.push(ConsoleEntry {
                timestamp: Local::now(),
                level: Level::DEBUG,
                message: i.to_string(),
            });
        }
        assert_eq!(buffer.len(), MAX_CONSOLE_ENTRIES);
        assert_eq!(buffer.tail(1)[0].message, (MAX_CONSOLE_ENTRIES + 4).to_string());
        assert_eq!(buffer.tail(MAX_CONSOLE_ENTRIES)[0].message, "5");
    }
}
