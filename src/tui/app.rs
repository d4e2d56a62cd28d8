// TUI application state
//
// App holds what only the terminal front-end cares about: focus, cursors,
// the open modal and the theme. Everything about the bot lives in the Panel;
// App reads it through a fresh PanelView each frame and turns key presses
// into Panel operations. Network operations run in spawned tasks so the
// event loop never waits on the backend.

use super::clipboard;
use super::modal::{Modal, PromptKind};
use super::theme::{self, Theme, ThemeKind};
use crate::logging::ConsoleBuffer;
use crate::panel::settings::{Mode, SettingsField};
use crate::panel::toast::ToastKind;
use crate::panel::view::PanelView;
use crate::panel::{ListKind, Panel};
use crate::storage;
use chrono::{Local, Utc};
use std::future::Future;
use std::path::PathBuf;

/// Focusable sections, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Profiles,
    Settings,
    Messages,
    Times,
    Logs,
    Stats,
}

impl Section {
    const ORDER: [Section; 6] = [
        Section::Profiles,
        Section::Settings,
        Section::Messages,
        Section::Times,
        Section::Logs,
        Section::Stats,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Profiles => "Configs",
            Section::Settings => "Settings",
            Section::Messages => "Messages",
            Section::Times => "Send times",
            Section::Logs => "Logs",
            Section::Stats => "Message stats",
        }
    }

    /// Send times only exist in scheduled mode; stats hide while empty
    pub fn is_visible(&self, view: &PanelView) -> bool {
        match self {
            Section::Times => view.mode == Mode::Scheduled,
            Section::Stats => view.stats_visible(),
            _ => true,
        }
    }
}

/// One selectable row of the settings form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
    Mode,
    Field(SettingsField),
    Delay,
    DryRun,
}

/// Form rows for the current view: the mode selector, the visible fields
/// with the delay toggle just above the delay fields, then dry run
pub fn settings_rows(view: &PanelView) -> Vec<SettingsRow> {
    let mut rows = vec![SettingsRow::Mode];
    for field in &view.fields {
        if field.field == SettingsField::MinDelay {
            rows.push(SettingsRow::Delay);
        }
        rows.push(SettingsRow::Field(field.field));
    }
    rows.push(SettingsRow::DryRun);
    rows
}

/// Selection per list section
#[derive(Debug, Clone, Copy, Default)]
pub struct Cursors {
    pub profiles: usize,
    pub settings: usize,
    pub messages: usize,
    pub times: usize,
    /// Lines scrolled up from the newest log line; 0 follows the tail
    pub logs_back: usize,
}

pub struct App {
    pub panel: Panel,
    pub view: PanelView,
    pub console: ConsoleBuffer,
    pub theme_kind: ThemeKind,
    pub theme: Theme,
    pub focus: Section,
    pub cursors: Cursors,
    pub modal: Option<Modal>,
    pub should_quit: bool,
    export_dir: PathBuf,
    /// Profile whose rename prompt was already opened
    rename_prompted: Option<String>,
}

impl App {
    pub fn new(panel: Panel, console: ConsoleBuffer, fallback_theme: ThemeKind, export_dir: PathBuf) -> Self {
        let theme_kind = theme::load_preference(panel.store(), fallback_theme);
        let view = panel.view();
        Self {
            panel,
            view,
            console,
            theme_kind,
            theme: theme_kind.theme(),
            focus: Section::Profiles,
            cursors: Cursors::default(),
            modal: None,
            should_quit: false,
            export_dir,
            rename_prompted: None,
        }
    }

    /// Take a fresh view and bring focus, cursors and prompts in line with it
    pub fn refresh(&mut self) {
        self.panel.prune_toasts();
        self.view = self.panel.view();

        if !self.focus.is_visible(&self.view) {
            self.focus = Section::Profiles;
        }
        let clamp = |cursor: &mut usize, len: usize| *cursor = (*cursor).min(len.saturating_sub(1));
        clamp(&mut self.cursors.profiles, self.view.profiles.len());
        clamp(&mut self.cursors.settings, settings_rows(&self.view).len());
        clamp(&mut self.cursors.messages, self.view.messages.len());
        clamp(&mut self.cursors.times, self.view.times.len());
        clamp(&mut self.cursors.logs_back, self.view.logs.len());

        // A profile entered rename state (new config): ask for its name once
        let renaming = self.view.profiles.iter().find(|p| p.renaming);
        match renaming {
            Some(row) if self.rename_prompted.as_deref() != Some(row.id.as_str()) => {
                if self.modal.is_none() {
                    self.rename_prompted = Some(row.id.clone());
                    if let Some(pos) = self.view.profiles.iter().position(|p| p.id == row.id) {
                        self.cursors.profiles = pos;
                    }
                    self.modal = Some(Modal::prompt(
                        PromptKind::Rename { id: row.id.clone() },
                        &row.name,
                    ));
                }
            }
            Some(_) => {}
            None => self.rename_prompted = None,
        }
    }

    fn spawn<F, Fut>(&self, op: F)
    where
        F: FnOnce(Panel) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(op(self.panel.clone()));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Focus and cursors
    // ─────────────────────────────────────────────────────────────────────

    pub fn visible_sections(&self) -> Vec<Section> {
        Section::ORDER
            .into_iter()
            .filter(|s| s.is_visible(&self.view))
            .collect()
    }

    pub fn focus_next(&mut self) {
        self.focus = self.cycle_focus(1);
    }

    pub fn focus_prev(&mut self) {
        let len = self.visible_sections().len();
        self.focus = self.cycle_focus(len.saturating_sub(1));
    }

    fn cycle_focus(&self, step: usize) -> Section {
        let sections = self.visible_sections();
        let idx = sections.iter().position(|&s| s == self.focus).unwrap_or(0);
        sections[(idx + step) % sections.len()]
    }

    /// Move the focused section's cursor by `delta` rows
    pub fn move_cursor(&mut self, delta: isize) {
        let step = |cursor: usize, len: usize| -> usize {
            if len == 0 {
                return 0;
            }
            cursor.saturating_add_signed(delta).min(len - 1)
        };
        match self.focus {
            Section::Profiles => {
                self.cursors.profiles = step(self.cursors.profiles, self.view.profiles.len())
            }
            Section::Settings => {
                self.cursors.settings = step(self.cursors.settings, settings_rows(&self.view).len())
            }
            Section::Messages => {
                self.cursors.messages = step(self.cursors.messages, self.view.messages.len())
            }
            Section::Times => self.cursors.times = step(self.cursors.times, self.view.times.len()),
            // Up scrolls back in time
            Section::Logs => {
                self.cursors.logs_back = self
                    .cursors
                    .logs_back
                    .saturating_add_signed(-delta)
                    .min(self.view.logs.len().saturating_sub(1))
            }
            Section::Stats => {}
        }
    }

    pub fn selected_profile_id(&self) -> Option<String> {
        self.view
            .profiles
            .get(self.cursors.profiles)
            .map(|p| p.id.clone())
    }

    pub fn selected_settings_row(&self) -> Option<SettingsRow> {
        settings_rows(&self.view).get(self.cursors.settings).copied()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Bot control
    // ─────────────────────────────────────────────────────────────────────

    pub fn start_bot(&self) {
        if self.view.status.can_start {
            self.spawn(|p| async move {
                let _ = p.start_bot().await;
            });
        }
    }

    pub fn stop_bot(&self) {
        if self.view.status.can_stop {
            self.spawn(|p| async move {
                if let Ok(ack) = p.stop_bot().await {
                    if ack.success {
                        p.notify(ToastKind::Info, "Bot stopping...");
                    }
                }
            });
        }
    }

    pub fn undo_latest(&self) {
        self.spawn(|p| async move {
            let _ = p.undo_latest().await;
        });
    }

    pub fn dismiss_toasts(&self) {
        for toast in &self.view.toasts {
            self.panel.dismiss_toast(toast.id);
        }
    }

    pub fn reset_stats(&self) {
        self.spawn(|p| async move {
            let _ = p.reset_stats().await;
        });
    }

    // ─────────────────────────────────────────────────────────────────────
    // Profiles
    // ─────────────────────────────────────────────────────────────────────

    pub fn activate_selected(&self) {
        if let Some(id) = self.selected_profile_id() {
            self.spawn(move |p| async move {
                let _ = p.activate_profile(&id).await;
            });
        }
    }

    pub fn add_profile(&self) {
        self.spawn(|p| async move {
            let _ = p.add_profile().await;
        });
    }

    pub fn rename_selected(&mut self) {
        if let Some(id) = self.selected_profile_id() {
            self.panel.begin_rename(&id);
        }
    }

    pub fn delete_selected(&self) {
        if !self.view.can_delete {
            self.panel
                .notify(ToastKind::Error, "Cannot delete the last account");
            return;
        }
        if let Some(id) = self.selected_profile_id() {
            self.spawn(move |p| async move {
                let _ = p.delete_profile(&id).await;
            });
        }
    }

    pub fn export_selected(&self) {
        let Some(id) = self.selected_profile_id() else {
            return;
        };
        let file = match self.panel.export_profile(&id, Local::now()) {
            Ok(file) => file,
            Err(e) => {
                self.panel.notify(ToastKind::Error, e.user_message());
                return;
            }
        };
        match storage::write_export(&self.export_dir, &file.filename, &file.contents) {
            Ok(path) => self.panel.notify(
                ToastKind::Success,
                format!("Config exported to {}", path.display()),
            ),
            Err(e) => self.panel.notify(ToastKind::Error, format!("{:#}", e)),
        };
    }

    fn import_from(&self, path: &str) {
        let path = path.trim();
        if path.is_empty() {
            return;
        }
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                self.panel
                    .notify(ToastKind::Error, format!("Failed to read {}: {}", path, e));
                return;
            }
        };
        self.spawn(move |p| async move {
            let _ = p.import_profile(&text).await;
        });
    }

    // ─────────────────────────────────────────────────────────────────────
    // Settings and lists
    // ─────────────────────────────────────────────────────────────────────

    /// Enter on the selected settings row
    pub fn activate_settings_row(&mut self) {
        match self.selected_settings_row() {
            Some(SettingsRow::Mode) => {
                self.panel.cycle_mode(true);
            }
            Some(SettingsRow::Delay) => {
                self.panel.toggle_delay();
            }
            Some(SettingsRow::DryRun) => {
                self.panel.toggle_dry_run();
            }
            Some(SettingsRow::Field(field)) => {
                let Some(current) = self.view.field(field) else {
                    return;
                };
                if current.enabled {
                    self.modal = Some(Modal::prompt(PromptKind::EditField(field), &current.value));
                }
            }
            None => {}
        }
    }

    pub fn open_add_item(&mut self) {
        let kind = match self.focus {
            Section::Messages => PromptKind::AddMessage,
            Section::Times => PromptKind::AddTime,
            _ => return,
        };
        self.modal = Some(Modal::prompt(kind, ""));
    }

    pub fn remove_selected_item(&mut self) {
        let (kind, index) = match self.focus {
            Section::Messages => (ListKind::Messages, self.cursors.messages),
            Section::Times => (ListKind::SendTimes, self.cursors.times),
            _ => return,
        };
        self.panel.remove_item(kind, index);
    }

    pub fn open_import(&mut self) {
        self.modal = Some(Modal::prompt(PromptKind::ImportPath, ""));
    }

    /// Enter in a prompt
    pub fn submit_prompt(&mut self) {
        let Some(Modal::Prompt(prompt)) = self.modal.take() else {
            return;
        };
        let text = prompt.input.text().to_string();
        match prompt.kind {
            PromptKind::EditField(field) => {
                self.panel.edit_field(field, &text);
            }
            PromptKind::AddMessage => {
                self.panel.add_message(&text);
            }
            PromptKind::AddTime => {
                if !self.panel.add_time(&text) && !text.trim().is_empty() {
                    self.panel.notify(ToastKind::Error, "Send time must be HH:MM");
                }
            }
            PromptKind::Rename { id } => {
                self.spawn(move |p| async move {
                    let _ = p.rename_profile(&id, &text).await;
                });
            }
            PromptKind::ImportPath => self.import_from(&text),
        }
    }

    /// Esc in a prompt
    pub fn cancel_prompt(&mut self) {
        if let Some(Modal::Prompt(prompt)) = self.modal.take() {
            if matches!(prompt.kind, PromptKind::Rename { .. }) {
                self.panel.cancel_rename();
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Logs and theme
    // ─────────────────────────────────────────────────────────────────────

    fn logs_text(&self) -> String {
        clipboard::logs_text(self.view.logs.iter().map(|l| l.text.as_str()))
    }

    pub fn copy_logs(&self) {
        if self.view.logs.is_empty() {
            self.panel.notify(ToastKind::Info, "No logs to copy");
            return;
        }
        match clipboard::copy_to_clipboard(&self.logs_text()) {
            Ok(()) => self.panel.notify(ToastKind::Success, "Logs copied to clipboard"),
            Err(e) => {
                tracing::debug!("Clipboard copy failed: {:#}", e);
                self.panel.notify(ToastKind::Error, "Failed to copy logs")
            }
        };
    }

    pub fn export_logs(&self) {
        let logs: Vec<String> = self.view.logs.iter().map(|l| l.text.clone()).collect();
        match storage::write_log_export(&self.export_dir, &logs, Utc::now()) {
            Ok(path) => self.panel.notify(
                ToastKind::Success,
                format!("Logs exported to {}", path.display()),
            ),
            Err(e) => self.panel.notify(ToastKind::Error, format!("{:#}", e)),
        };
    }

    pub fn toggle_theme(&mut self) {
        self.theme_kind = self.theme_kind.toggle();
        self.theme = self.theme_kind.theme();
        theme::save_preference(self.panel.store(), self.theme_kind);
    }
}
