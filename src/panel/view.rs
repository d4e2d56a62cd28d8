//! Pure view-model of the panel
//!
//! `render` turns client state into exactly what the screen shows, so every
//! visibility and enablement rule is testable without a terminal.

use super::poller::is_error_line;
use super::runtime::StatRow;
use super::settings::{Mode, SettingsField};
use super::toast::{ToastId, ToastKind};
use super::ClientState;
use std::time::Duration;
use tokio::time::Instant;

/// Longest message chip, in characters
const CHIP_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub status: StatusView,
    pub clock: String,
    pub profiles: Vec<ProfileRow>,
    pub can_delete: bool,
    pub mode: Mode,
    pub fields: Vec<FieldView>,
    pub delay_enabled: bool,
    pub dry_run: bool,
    pub messages: Vec<String>,
    pub times: Vec<String>,
    pub logs: Vec<LogLine>,
    pub toasts: Vec<ToastView>,
    pub stats: Vec<StatRow>,
    pub loaded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub label: &'static str,
    pub running: bool,
    pub can_start: bool,
    pub can_stop: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRow {
    pub id: String,
    pub name: String,
    pub summary: String,
    pub message_count: usize,
    pub active: bool,
    pub renaming: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub field: SettingsField,
    pub label: &'static str,
    pub value: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub text: String,
    pub flagged: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToastView {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
    pub has_undo: bool,
    pub remaining: Duration,
}

impl PanelView {
    pub fn stats_visible(&self) -> bool {
        !self.stats.is_empty()
    }

    pub fn field(&self, field: SettingsField) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.field == field)
    }
}

/// Message chip text: line breaks shown as ` ↵ `, long text cut with `...`
pub fn message_chip(message: &str) -> String {
    let display = message.replace('\n', " ↵ ");
    if display.chars().count() > CHIP_CHARS {
        let head: String = display.chars().take(CHIP_CHARS).collect();
        format!("{}...", head)
    } else {
        display
    }
}

pub fn render(state: &ClientState, now: Instant) -> PanelView {
    let settings = &state.settings;
    let running = state.bot_running;

    let profiles = state
        .profiles
        .iter()
        .map(|p| ProfileRow {
            id: p.id.clone(),
            name: p.name.clone(),
            summary: p.config.token_summary(),
            message_count: p.config.messages.len(),
            active: state.active_id.as_deref() == Some(p.id.as_str()),
            renaming: state.renaming.as_deref() == Some(p.id.as_str()),
        })
        .collect();

    // Only the active mode's fields are shown; delay fields grey out with
    // the toggle
    let fields = SettingsField::all()
        .iter()
        .filter(|f| f.mode().map_or(true, |m| m == settings.mode))
        .map(|&field| FieldView {
            field,
            label: field.label(),
            value: settings.field_text(field),
            enabled: !field.is_delay() || settings.delay_enabled,
        })
        .collect();

    let times = if settings.mode == Mode::Scheduled {
        settings.send_times.clone()
    } else {
        Vec::new()
    };

    PanelView {
        status: StatusView {
            label: if running { "ONLINE" } else { "OFFLINE" },
            running,
            can_start: !running,
            can_stop: running,
        },
        clock: state.clock.clone(),
        profiles,
        can_delete: state.profiles.len() > 1,
        mode: settings.mode,
        fields,
        delay_enabled: settings.delay_enabled,
        dry_run: settings.dry_run,
        messages: settings.messages.iter().map(|m| message_chip(m)).collect(),
        times,
        logs: state
            .logs
            .iter()
            .map(|line| LogLine {
                text: line.clone(),
                flagged: is_error_line(line),
            })
            .collect(),
        toasts: state
            .toasts
            .live(now)
            .map(|t| ToastView {
                id: t.id,
                message: t.message.clone(),
                kind: t.kind,
                has_undo: t.undo.is_some(),
                remaining: t.remaining(now),
            })
            .collect(),
        stats: state.stats.clone(),
        loaded: state.config_loaded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Profile;
    use crate::panel::settings::Settings;
    use crate::panel::Timing;

    fn state() -> ClientState {
        ClientState::new(Timing::default())
    }

    fn profile(id: &str) -> Profile {
        Profile {
            id: id.into(),
            name: format!("Config {}", id),
            config: Settings::default(),
        }
    }

    #[test]
    fn chips_mark_line_breaks_and_truncate() {
        assert_eq!(message_chip("hi\nthere"), "hi ↵ there");
        let long = "y".repeat(51);
        assert_eq!(message_chip(&long), format!("{}...", "y".repeat(50)));
        assert_eq!(message_chip(&"z".repeat(50)), "z".repeat(50));
    }

    #[tokio::test]
    async fn status_reflects_run_state() {
        let mut state = state();
        let view = render(&state, Instant::now());
        assert_eq!(view.status.label, "OFFLINE");
        assert!(view.status.can_start && !view.status.can_stop);

        state.bot_running = true;
        let view = render(&state, Instant::now());
        assert_eq!(view.status.label, "ONLINE");
        assert!(!view.status.can_start && view.status.can_stop);
    }

    #[tokio::test]
    async fn only_active_mode_fields_are_listed() {
        let mut state = state();
        let view = render(&state, Instant::now());
        assert!(view.field(SettingsField::SpamInterval).is_some());
        assert!(view.field(SettingsField::WindowStart).is_none());

        state.settings.mode = Mode::RandomWindow;
        let view = render(&state, Instant::now());
        assert!(view.field(SettingsField::SpamInterval).is_none());
        assert!(view.field(SettingsField::MessagesCount).is_some());
        assert!(view.field(SettingsField::Token).is_some());
    }

    #[tokio::test]
    async fn delay_fields_follow_toggle() {
        let mut state = state();
        state.settings.delay_enabled = false;
        let view = render(&state, Instant::now());
        assert!(!view.field(SettingsField::MinDelay).unwrap().enabled);
        assert!(view.field(SettingsField::Token).unwrap().enabled);
    }

    #[tokio::test]
    async fn delete_needs_more_than_one_profile() {
        let mut state = state();
        state.profiles = vec![profile("1")];
        state.active_id = Some("1".into());
        let view = render(&state, Instant::now());
        assert!(!view.can_delete);
        assert!(view.profiles[0].active);
        assert_eq!(view.profiles[0].summary, "No token configured");

        state.profiles.push(profile("2"));
        assert!(render(&state, Instant::now()).can_delete);
    }

    #[tokio::test]
    async fn error_lines_are_flagged() {
        let mut state = state();
        state.logs = vec!["Sent: hi".into(), "Failed to send message".into()];
        let view = render(&state, Instant::now());
        assert!(!view.logs[0].flagged);
        assert!(view.logs[1].flagged);
    }
}
