// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - The event loop: keyboard input, redraw ticks, backend polling, clock
// - Translating key presses into App actions

pub mod app;
pub mod clipboard;
pub mod components;
pub mod input;
pub mod layout;
pub mod modal;
pub mod theme;
pub mod ui;

use crate::config::Config;
use crate::logging::ConsoleBuffer;
use crate::panel::Panel;
use anyhow::{Context, Result};
use app::{App, Section};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use input::InputOutcome;
use modal::Modal;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use theme::ThemeKind;
use tokio::time::MissedTickBehavior;

/// Run the TUI
///
/// Sets up the terminal, loads the initial state in the background, runs the
/// event loop and restores the terminal. A pending autosave is flushed
/// before returning.
pub async fn run_tui(panel: Panel, console: ConsoleBuffer, config: &Config) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new(
        panel.clone(),
        console,
        ThemeKind::parse(&config.theme),
        config.export_dir.clone(),
    );

    let loader = panel.clone();
    tokio::spawn(async move { loader.bootstrap().await });

    let result = run_event_loop(&mut terminal, &mut app, config).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    if let Err(e) = panel.flush_autosave().await {
        tracing::warn!("Final save failed: {}", e);
        eprintln!("Warning: unsaved changes were lost ({})", e.user_message());
    }

    result
}

/// Main event loop
///
/// Four sources, whichever is ready first:
/// 1. Keyboard input
/// 2. Redraw tick, which also refreshes the view
/// 3. Backend poll (status and logs)
/// 4. Clock tick
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    config: &Config,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));
    let mut poll_interval = tokio::time::interval(config.timing.poll_interval());
    poll_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut clock_interval = tokio::time::interval(config.timing.clock_interval());

    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    if let Ok(Event::Key(key_event)) = event::read() {
                        handle_key_event(app, key_event);
                    }
                }
            } => {}

            _ = tick_interval.tick() => {}

            _ = poll_interval.tick() => {
                let panel = app.panel.clone();
                tokio::spawn(async move { panel.poll().await });
            }

            _ = clock_interval.tick() => {
                app.panel.tick_clock(Local::now());
            }
        }

        app.refresh();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
/// Layered dispatch: Modal → Global → focused section
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    if key_event.kind != KeyEventKind::Press {
        return;
    }
    if handle_modal_input(app, &key_event) {
        return;
    }
    if handle_global_keys(app, &key_event) {
        return;
    }
    handle_section_keys(app, &key_event);
}

/// Modal captures all input while open - returns true if it absorbed the key
fn handle_modal_input(app: &mut App, key_event: &KeyEvent) -> bool {
    let Some(modal) = app.modal.as_mut() else {
        return false;
    };

    match modal {
        Modal::Prompt(prompt) => match prompt.input.handle_key(*key_event) {
            InputOutcome::Submit => app.submit_prompt(),
            InputOutcome::Cancel => app.cancel_prompt(),
            InputOutcome::Edited | InputOutcome::Ignored => {}
        },
        Modal::Help | Modal::Console => {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Char('`')
            ) {
                app.modal = None;
            }
        }
    }

    true
}

/// Global keys work the same whichever section has focus
fn handle_global_keys(app: &mut App, key_event: &KeyEvent) -> bool {
    if key_event.modifiers.contains(KeyModifiers::CONTROL) {
        if key_event.code == KeyCode::Char('c') {
            app.should_quit = true;
            return true;
        }
        return false;
    }

    match key_event.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_prev(),
        KeyCode::Char('?') => app.modal = Some(Modal::Help),
        KeyCode::Char('`') => app.modal = Some(Modal::Console),
        KeyCode::Char('s') => app.start_bot(),
        KeyCode::Char('x') => app.stop_bot(),
        KeyCode::Char('u') => app.undo_latest(),
        KeyCode::Esc => app.dismiss_toasts(),
        KeyCode::Char('y') => app.copy_logs(),
        KeyCode::Char('E') => app.export_logs(),
        KeyCode::Char('t') => app.toggle_theme(),
        _ => return false,
    }
    true
}

/// Keys that act on the focused section
fn handle_section_keys(app: &mut App, key_event: &KeyEvent) {
    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => return app.move_cursor(-1),
        KeyCode::Down | KeyCode::Char('j') => return app.move_cursor(1),
        KeyCode::PageUp => return app.move_cursor(-10),
        KeyCode::PageDown => return app.move_cursor(10),
        _ => {}
    }

    match (app.focus, key_event.code) {
        (Section::Profiles, KeyCode::Enter) => app.activate_selected(),
        (Section::Profiles, KeyCode::Char('n')) => app.add_profile(),
        (Section::Profiles, KeyCode::Char('r')) => app.rename_selected(),
        (Section::Profiles, KeyCode::Char('d') | KeyCode::Delete) => app.delete_selected(),
        (Section::Profiles, KeyCode::Char('e')) => app.export_selected(),
        (Section::Profiles, KeyCode::Char('i')) => app.open_import(),

        (Section::Settings, KeyCode::Enter | KeyCode::Char(' ')) => app.activate_settings_row(),
        (Section::Settings, KeyCode::Left) => {
            app.panel.cycle_mode(false);
        }
        (Section::Settings, KeyCode::Right) => {
            app.panel.cycle_mode(true);
        }

        (Section::Messages | Section::Times, KeyCode::Char('a') | KeyCode::Enter) => {
            app.open_add_item()
        }
        (Section::Messages | Section::Times, KeyCode::Char('d') | KeyCode::Delete) => {
            app.remove_selected_item()
        }

        (Section::Stats, KeyCode::Char('R')) => app.reset_stats(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryBackend;
    use crate::panel::settings::Mode;
    use crate::panel::Timing;
    use crate::tui::modal::PromptKind;
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn app() -> App {
        let backend = Arc::new(MemoryBackend::new());
        let panel = Panel::new(backend, Timing::default(), None);
        panel.bootstrap().await;
        let mut app = App::new(panel, ConsoleBuffer::new(), ThemeKind::Dark, ".".into());
        app.refresh();
        app
    }

    #[tokio::test]
    async fn modal_swallows_global_keys() {
        let mut app = app().await;
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(matches!(app.modal, Some(Modal::Help)));

        // 'q' closes help instead of quitting
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.modal.is_none());
        assert!(!app.should_quit);

        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn typing_in_a_prompt_does_not_trigger_shortcuts() {
        let mut app = app().await;
        app.focus = Section::Messages;
        handle_key_event(&mut app, key(KeyCode::Char('a')));
        assert!(matches!(
            &app.modal,
            Some(Modal::Prompt(p)) if p.kind == PromptKind::AddMessage
        ));

        for c in "stop".chars() {
            handle_key_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_key_event(&mut app, key(KeyCode::Enter));
        app.refresh();

        assert!(app.modal.is_none());
        assert_eq!(app.view.messages, vec!["stop".to_string()]);
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn arrows_cycle_mode_in_settings() {
        let mut app = app().await;
        app.focus = Section::Settings;
        assert_eq!(app.view.mode, Mode::Spam);

        handle_key_event(&mut app, key(KeyCode::Left));
        app.refresh();
        let back = app.view.mode;
        handle_key_event(&mut app, key(KeyCode::Right));
        app.refresh();

        assert_ne!(back, Mode::Spam);
        assert_eq!(app.view.mode, Mode::Spam);
    }

    #[tokio::test]
    async fn ctrl_c_quits() {
        let mut app = app().await;
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }
}
