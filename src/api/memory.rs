//! In-memory bot backend
//!
//! Answers every endpoint the way the real server does (same validation, same
//! messages) without a network. Used by demo mode and by controller tests,
//! which also use its knobs to simulate an unreachable server or slow replies.

use super::types::{Ack, ConfigSnapshot, Created, Profile, ProfileList};
use super::Backend;
use crate::error::{ClientError, ClientResult};
use crate::panel::settings::{Mode, Settings};
use async_trait::async_trait;
use chrono::Local;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// Server keeps only this many log lines
pub const MAX_LOGS: usize = 500;

pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

struct MemoryState {
    accounts: Vec<Profile>,
    active_id: Option<String>,
    running: bool,
    logs: VecDeque<String>,
    stats: HashMap<String, u64>,
    next_id: u64,

    // Test knobs
    offline: bool,
    latency: Duration,
    save_rejection: Option<String>,
    saves: usize,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Fresh backend with a single default profile, "Config 1", active
    pub fn new() -> Self {
        let mut state = MemoryState {
            accounts: Vec::new(),
            active_id: None,
            running: false,
            logs: VecDeque::new(),
            stats: HashMap::new(),
            next_id: 1,
            offline: false,
            latency: Duration::ZERO,
            save_rejection: None,
            saves: 0,
        };
        let first = state.insert("Config 1", Settings::default());
        state.active_id = Some(first);
        Self {
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Every call fails with a transport error while offline
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Delay every reply by `latency` (tokio time, so paused clocks apply)
    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = latency;
    }

    /// Make `save_config` answer `success: false` with this message
    pub fn reject_saves(&self, message: Option<&str>) {
        self.lock().save_rejection = message.map(str::to_string);
    }

    /// Number of `save_config` calls that reached the backend
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// Settings of the active profile as currently stored
    pub fn active_settings(&self) -> Option<Settings> {
        let state = self.lock();
        state.active().map(|p| p.config.clone())
    }

    pub fn profiles(&self) -> Vec<Profile> {
        self.lock().accounts.clone()
    }

    /// Append a timestamped line to the server log
    pub fn push_log(&self, line: &str) {
        self.lock().log(line);
    }

    /// Record one (simulated) send of `message`
    pub fn record_send(&self, message: &str, dry_run: bool) {
        let mut state = self.lock();
        if dry_run {
            state.log(&format!("[DRY RUN] Would send message: {}", message));
        } else {
            state.log(&format!("Sent: {}", message));
        }
        *state.stats.entry(message.to_string()).or_insert(0) += 1;
    }

    /// Simulate the send loop ending on its own
    pub fn finish_run(&self) {
        let mut state = self.lock();
        if state.running {
            state.running = false;
            state.log("Bot stopped");
        }
    }

    /// Compute a reply against current state, then deliver it after the
    /// configured latency
    async fn reply<T>(&self, compute: impl FnOnce(&mut MemoryState) -> T) -> ClientResult<T> {
        let (value, latency) = {
            let mut state = self.lock();
            if state.offline {
                return Err(ClientError::Transport("connection refused".into()));
            }
            (compute(&mut state), state.latency)
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        Ok(value)
    }
}

/// Settings as the server would store them: encoded to JSON and decoded back
fn over_the_wire(settings: &Settings) -> ClientResult<Settings> {
    Ok(serde_json::from_value(serde_json::to_value(settings)?)?)
}

impl MemoryState {
    fn insert(&mut self, name: &str, config: Settings) -> String {
        let id = format!("acct-{}", self.next_id);
        self.next_id += 1;
        self.accounts.push(Profile {
            id: id.clone(),
            name: name.to_string(),
            config,
        });
        id
    }

    fn active(&self) -> Option<&Profile> {
        let active = self.active_id.as_deref();
        self.accounts
            .iter()
            .find(|p| Some(p.id.as_str()) == active)
            .or_else(|| self.accounts.first())
    }

    fn active_mut(&mut self) -> Option<&mut Profile> {
        let pos = self
            .active_id
            .as_deref()
            .and_then(|id| self.accounts.iter().position(|p| p.id == id))
            .unwrap_or(0);
        self.accounts.get_mut(pos)
    }

    fn log(&mut self, message: &str) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        self.logs.push_back(format!("[{}] {}", stamp, message));
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    fn save(&mut self, settings: &Settings) -> Ack {
        self.saves += 1;
        if let Some(message) = self.save_rejection.clone() {
            return Ack::rejected(message);
        }
        let Some(active) = self.active_mut() else {
            return Ack::rejected("No active account");
        };
        active.config = settings.clone();
        self.log("Configuration updated successfully");
        Ack::ok("Configuration updated")
    }

    fn start(&mut self) -> Ack {
        if let Some(reason) = self.start_blocker() {
            if reason != "Bot is already running" {
                self.log(&format!("Configuration Error: {}", reason));
            }
            return Ack::rejected(reason);
        }
        self.running = true;
        let mode = self.active().map(|p| p.config.mode).unwrap_or_default();
        self.log(&format!("Bot started in {} mode", mode.label()));
        Ack::ok("Bot started")
    }

    fn delete(&mut self, id: &str) -> Ack {
        if self.accounts.len() <= 1 {
            return Ack::rejected("Cannot delete the last account");
        }
        let Some(pos) = self.accounts.iter().position(|p| p.id == id) else {
            return Ack::rejected("Account not found");
        };
        self.accounts.remove(pos);
        if self.active_id.as_deref() == Some(id) {
            // The previous neighbour takes over, or the new first entry
            let next = pos.saturating_sub(1).min(self.accounts.len() - 1);
            self.active_id = Some(self.accounts[next].id.clone());
        }
        Ack::success()
    }

    /// Why the active profile cannot start, if it cannot
    fn start_blocker(&self) -> Option<&'static str> {
        if self.running {
            return Some("Bot is already running");
        }
        let config = &self.active()?.config;
        if config.token.is_empty() || config.channel_id.is_empty() {
            return Some("Token and Channel ID are required");
        }
        if config.messages.is_empty() {
            return Some("At least one message is required");
        }
        match config.mode {
            Mode::Scheduled if config.send_times.is_empty() => {
                Some("At least one send time is required for scheduled mode")
            }
            Mode::Spam if config.spam_interval.unwrap_or(0) <= 0 => {
                Some("Spam interval must be greater than 0")
            }
            Mode::RandomWindow
                if config.window_start.is_empty() || config.window_end.is_empty() =>
            {
                Some("Window start and end times are required")
            }
            Mode::RandomWindow if config.messages_count.unwrap_or(0) <= 0 => {
                Some("Messages count must be greater than 0")
            }
            _ => None,
        }
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn get_config(&self) -> ClientResult<ConfigSnapshot> {
        self.reply(|state| ConfigSnapshot {
            settings: state.active().map(|p| p.config.clone()).unwrap_or_default(),
            bot_running: state.running,
        })
        .await
    }

    async fn save_config(&self, settings: &Settings) -> ClientResult<Ack> {
        let stored = over_the_wire(settings)?;
        self.reply(|state| state.save(&stored)).await
    }

    async fn start(&self) -> ClientResult<Ack> {
        self.reply(MemoryState::start).await
    }

    async fn stop(&self) -> ClientResult<Ack> {
        self.reply(|state| {
            if !state.running {
                return Ack::rejected("Bot is not running");
            }
            state.running = false;
            state.log("Bot stopped");
            Ack::ok("Bot stopping...")
        })
        .await
    }

    async fn logs(&self) -> ClientResult<Vec<String>> {
        self.reply(|state| state.logs.iter().cloned().collect()).await
    }

    async fn list_profiles(&self) -> ClientResult<ProfileList> {
        self.reply(|state| ProfileList {
            accounts: state.accounts.clone(),
            active_account_id: state.active_id.clone(),
        })
        .await
    }

    async fn create_profile(
        &self,
        name: &str,
        config: Option<&Settings>,
    ) -> ClientResult<Created> {
        let config = config.map(over_the_wire).transpose()?;
        self.reply(|state| {
            let name = if name.is_empty() {
                format!("Account {}", state.accounts.len() + 1)
            } else {
                name.to_string()
            };
            let id = state.insert(&name, config.unwrap_or_default());
            Created {
                success: true,
                message: None,
                account: state.accounts.iter().find(|p| p.id == id).cloned(),
            }
        })
        .await
    }

    async fn activate_profile(&self, id: &str) -> ClientResult<Ack> {
        self.reply(|state| {
            if state.running {
                return Ack::rejected("Stop the bot before switching accounts");
            }
            if !state.accounts.iter().any(|p| p.id == id) {
                return Ack::rejected("Account not found");
            }
            state.active_id = Some(id.to_string());
            Ack::success()
        })
        .await
    }

    async fn rename_profile(&self, id: &str, name: &str) -> ClientResult<Ack> {
        self.reply(|state| match state.accounts.iter_mut().find(|p| p.id == id) {
            Some(profile) => {
                profile.name = name.to_string();
                Ack::success()
            }
            None => Ack::rejected("Account not found"),
        })
        .await
    }

    async fn delete_profile(&self, id: &str) -> ClientResult<Ack> {
        self.reply(|state| state.delete(id)).await
    }

    async fn message_stats(&self) -> ClientResult<HashMap<String, u64>> {
        self.reply(|state| state.stats.clone()).await
    }

    async fn reset_message_stats(&self) -> ClientResult<()> {
        self.reply(|state| state.stats.clear()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_settings() -> Settings {
        Settings {
            token: "tok".into(),
            channel_id: "123".into(),
            messages: vec!["hello".into()],
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn starts_with_one_active_profile() {
        let backend = MemoryBackend::new();
        let list = backend.list_profiles().await.unwrap();
        assert_eq!(list.accounts.len(), 1);
        assert_eq!(list.accounts[0].name, "Config 1");
        assert_eq!(list.active_account_id.as_deref(), Some("acct-1"));
    }

    #[tokio::test]
    async fn start_requires_token_and_messages() {
        let backend = MemoryBackend::new();
        let ack = backend.start().await.unwrap();
        assert_eq!(ack.message.as_deref(), Some("Token and Channel ID are required"));

        let mut settings = ready_settings();
        settings.messages.clear();
        backend.save_config(&settings).await.unwrap();
        let ack = backend.start().await.unwrap();
        assert_eq!(ack.message.as_deref(), Some("At least one message is required"));

        backend.save_config(&ready_settings()).await.unwrap();
        assert!(backend.start().await.unwrap().success);
        let again = backend.start().await.unwrap();
        assert_eq!(again.message.as_deref(), Some("Bot is already running"));
    }

    #[tokio::test]
    async fn scheduled_mode_needs_times() {
        let backend = MemoryBackend::new();
        let settings = Settings {
            mode: Mode::Scheduled,
            ..ready_settings()
        };
        backend.save_config(&settings).await.unwrap();
        let ack = backend.start().await.unwrap();
        assert_eq!(
            ack.message.as_deref(),
            Some("At least one send time is required for scheduled mode")
        );
    }

    #[tokio::test]
    async fn stop_when_idle_is_rejected() {
        let backend = MemoryBackend::new();
        let ack = backend.stop().await.unwrap();
        assert_eq!(ack.message.as_deref(), Some("Bot is not running"));
    }

    #[tokio::test]
    async fn cannot_switch_while_running() {
        let backend = MemoryBackend::new();
        let created = backend.create_profile("Config 2", None).await.unwrap();
        let id = created.account.unwrap().id;
        backend.save_config(&ready_settings()).await.unwrap();
        backend.start().await.unwrap();

        let ack = backend.activate_profile(&id).await.unwrap();
        assert_eq!(
            ack.message.as_deref(),
            Some("Stop the bot before switching accounts")
        );
    }

    #[tokio::test]
    async fn deleting_active_profile_hands_over_to_neighbour() {
        let backend = MemoryBackend::new();
        backend.create_profile("Config 2", None).await.unwrap();
        backend.create_profile("Config 3", None).await.unwrap();
        backend.activate_profile("acct-1").await.unwrap();

        backend.delete_profile("acct-1").await.unwrap();
        let list = backend.list_profiles().await.unwrap();
        assert_eq!(list.active_account_id.as_deref(), Some("acct-2"));

        backend.activate_profile("acct-3").await.unwrap();
        backend.delete_profile("acct-3").await.unwrap();
        let list = backend.list_profiles().await.unwrap();
        assert_eq!(list.active_account_id.as_deref(), Some("acct-2"));

        let last = backend.delete_profile("acct-2").await.unwrap();
        assert_eq!(last.message.as_deref(), Some("Cannot delete the last account"));
    }

    #[tokio::test]
    async fn log_is_bounded() {
        let backend = MemoryBackend::new();
        for i in 0..(MAX_LOGS + 20) {
            backend.push_log(&format!("line {}", i));
        }
        let logs = backend.logs().await.unwrap();
        assert_eq!(logs.len(), MAX_LOGS);
        assert!(logs.last().unwrap().ends_with("line 519"));
    }

    #[tokio::test]
    async fn offline_backend_fails_with_transport_error() {
        let backend = MemoryBackend::new();
        backend.set_offline(true);
        assert!(backend.get_config().await.unwrap_err().is_transport());
    }

    #[tokio::test]
    async fn sends_feed_stats_and_logs() {
        let backend = MemoryBackend::new();
        backend.record_send("hi", false);
        backend.record_send("hi", true);
        assert_eq!(backend.message_stats().await.unwrap().get("hi"), Some(&2));
        let logs = backend.logs().await.unwrap();
        assert!(logs[1].contains("[DRY RUN] Would send message: hi"));

        backend.reset_message_stats().await.unwrap();
        assert!(backend.message_stats().await.unwrap().is_empty());
    }
}
