//! Status and log polling, plus the wall clock
//!
//! Poll failures only reach the developer console; the user keeps seeing the
//! last known state.

use super::sequence::Resource;
use super::Panel;
use crate::error::ClientResult;
use crate::storage::{CachedLogs, LOGS_KEY};
use chrono::{DateTime, Local, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static ERROR_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)error|failed").unwrap());

/// Log lines that deserve highlighting
pub fn is_error_line(line: &str) -> bool {
    ERROR_LINE.is_match(line)
}

impl Panel {
    /// Mirror `bot_running` from the backend
    pub async fn poll_status(&self) -> ClientResult<bool> {
        let ticket = self.inner.seq.issue(Resource::Status);
        let snapshot = self.inner.backend.get_config().await?;
        let running = snapshot.bot_running;
        if self.inner.seq.is_current(ticket) {
            self.write(|s| s.bot_running = running);
        }
        Ok(running)
    }

    /// Replace the displayed log with the backend's tail when it has one
    pub async fn poll_logs(&self) -> ClientResult<()> {
        let ticket = self.inner.seq.issue(Resource::Logs);
        let logs = self.inner.backend.logs().await?;
        if logs.is_empty() || !self.inner.seq.is_current(ticket) {
            return Ok(());
        }

        self.cache_logs(&logs);
        self.write(|s| s.logs = logs);
        Ok(())
    }

    /// One poll round: status and logs, independently
    pub async fn poll(&self) {
        let (status, logs) = tokio::join!(self.poll_status(), self.poll_logs());
        if let Err(e) = status {
            tracing::warn!("Failed to check status: {}", e);
        }
        if let Err(e) = logs {
            tracing::warn!("Failed to fetch logs: {}", e);
        }
    }

    pub fn tick_clock(&self, now: DateTime<Local>) {
        let clock = now.format("%H:%M:%S").to_string();
        self.write(|s| s.clock = clock);
    }

    fn cache_logs(&self, logs: &[String]) {
        let Some(store) = self.store() else {
            return;
        };
        let cached = CachedLogs {
            logs: logs.to_vec(),
            saved_at: Utc::now(),
        };
        if let Err(e) = store.set(LOGS_KEY, &cached) {
            tracing::warn!("Failed to cache logs: {:#}", e);
        }
    }

    /// Show the last cached log tail until the first poll lands
    pub fn restore_cached_logs(&self) {
        let Some(store) = self.store() else {
            return;
        };
        match store.get::<CachedLogs>(LOGS_KEY) {
            Ok(Some(cached)) if !cached.logs.is_empty() => {
                tracing::debug!("Restored {} cached log lines", cached.logs.len());
                self.write(|s| {
                    if s.logs.is_empty() {
                        s.logs = cached.logs;
                    }
                });
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Failed to read cached logs: {:#}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_errors_case_insensitively() {
        assert!(is_error_line("[10:00:00] Configuration Error: Token missing"));
        assert!(is_error_line("Failed to send message. Status: 401"));
        assert!(is_error_line("request FAILED"));
        assert!(!is_error_line("Sent: hello"));
    }
}
