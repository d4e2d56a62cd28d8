//! Bot start/stop and message statistics

use super::sequence::Resource;
use super::toast::ToastKind;
use super::Panel;
use crate::api::Ack;
use crate::error::ClientResult;
use std::collections::HashMap;

/// Longest message label shown in the statistics list
pub const STAT_LABEL_CHARS: usize = 50;

/// One row of the "messages sent" list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRow {
    pub message: String,
    pub label: String,
    pub count: u64,
}

/// Rows sorted by count, most sent first (ties by message text)
pub fn stat_rows(stats: HashMap<String, u64>) -> Vec<StatRow> {
    let mut rows: Vec<StatRow> = stats
        .into_iter()
        .map(|(message, count)| StatRow {
            label: truncate_label(&message),
            message,
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.message.cmp(&b.message)));
    rows
}

fn truncate_label(message: &str) -> String {
    if message.chars().count() > STAT_LABEL_CHARS {
        let head: String = message.chars().take(STAT_LABEL_CHARS).collect();
        format!("{}...", head)
    } else {
        message.to_string()
    }
}

impl Panel {
    /// Save the form, then ask the backend to start sending
    pub async fn start_bot(&self) -> ClientResult<()> {
        self.inner.autosave.cancel();
        // A failed save is already on screen; start with what the backend has
        let _ = self.save().await;

        self.inner.seq.issue(Resource::Status);
        let result = match self.inner.backend.start().await {
            Ok(ack) => ack.check("Failed to start bot").map(|_| ()),
            Err(e) => Err(e),
        };
        result.inspect_err(|e| self.report(e, None))?;

        self.write(|s| s.bot_running = true);
        self.notify(ToastKind::Success, "Bot started");
        Ok(())
    }

    /// Ask the backend to stop. The panel shows the bot as stopped whatever
    /// the answer.
    pub async fn stop_bot(&self) -> ClientResult<Ack> {
        // Invalidates status polls already in flight
        self.inner.seq.issue(Resource::Status);
        let result = self.inner.backend.stop().await;
        self.write(|s| s.bot_running = false);

        match result {
            Ok(ack) => {
                if !ack.success {
                    tracing::info!("Stop: {}", ack.message.as_deref().unwrap_or("rejected"));
                }
                Ok(ack)
            }
            Err(e) => {
                tracing::warn!("Failed to stop bot: {}", e);
                Err(e)
            }
        }
    }

    pub async fn load_stats(&self) -> ClientResult<()> {
        let ticket = self.inner.seq.issue(Resource::Stats);
        let stats = self.inner.backend.message_stats().await.map_err(|e| {
            tracing::warn!("Failed to load message stats: {}", e);
            e
        })?;
        if self.inner.seq.is_current(ticket) {
            let rows = stat_rows(stats);
            self.write(|s| s.stats = rows);
        }
        Ok(())
    }

    pub async fn reset_stats(&self) -> ClientResult<()> {
        self.inner.seq.issue(Resource::Stats);
        self.inner
            .backend
            .reset_message_stats()
            .await
            .inspect_err(|e| self.report(e, Some("Failed to reset statistics")))?;
        self.write(|s| s.stats.clear());
        self.notify(ToastKind::Info, "Message statistics reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_sort_by_count_descending() {
        let stats = HashMap::from([
            ("b".to_string(), 2),
            ("a".to_string(), 5),
            ("c".to_string(), 2),
        ]);
        let rows = stat_rows(stats);
        let order: Vec<_> = rows.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn long_labels_are_truncated() {
        let long = "x".repeat(60);
        let rows = stat_rows(HashMap::from([(long.clone(), 1)]));
        assert_eq!(rows[0].label, format!("{}...", "x".repeat(50)));
        assert_eq!(rows[0].message, long);
    }
}
