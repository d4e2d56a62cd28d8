// UI rendering
//
// Frame layout, top to bottom: title bar, body, status bar. The body
// arrangement depends on the terminal width; sections that are hidden in
// the current view (send times outside scheduled mode, empty stats) get no
// space at all. Toasts and the open modal are drawn last, on top.

use super::app::{App, Section};
use super::components::{
    chips_panel, logs_panel, overlay, profiles_panel, settings_panel, stats_panel, status_bar,
    title_bar, toast,
};
use super::layout::Breakpoint;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Body
            Constraint::Length(2), // Status bar
        ])
        .split(f.area());

    title_bar::render(f, chunks[0], app);

    match Breakpoint::from_width(chunks[1].width) {
        Breakpoint::Narrow => draw_narrow(f, chunks[1], app),
        Breakpoint::Normal => draw_normal(f, chunks[1], app),
        Breakpoint::Wide => draw_wide(f, chunks[1], app),
    }

    status_bar::render(f, chunks[2], app);

    toast::render(f, f.area(), app);
    overlay::render(f, f.area(), app);
}

fn draw_section(f: &mut Frame, area: Rect, app: &App, section: Section) {
    match section {
        Section::Profiles => profiles_panel::render(f, area, app),
        Section::Settings => settings_panel::render(f, area, app),
        Section::Messages | Section::Times => chips_panel::render(f, area, app, section),
        Section::Logs => logs_panel::render(f, area, app),
        Section::Stats => stats_panel::render(f, area, app),
    }
}

/// Stack `sections` vertically in `area`, each with its constraint
fn stack(f: &mut Frame, area: Rect, app: &App, sections: &[(Section, Constraint)]) {
    let visible: Vec<(Section, Constraint)> = sections
        .iter()
        .copied()
        .filter(|(s, _)| s.is_visible(&app.view))
        .collect();
    if visible.is_empty() {
        return;
    }
    let areas = Layout::vertical(visible.iter().map(|(_, c)| *c)).split(area);
    for ((section, _), rect) in visible.iter().zip(areas.iter()) {
        draw_section(f, *rect, app, *section);
    }
}

/// Rows the settings form needs, borders included
fn settings_height(app: &App) -> u16 {
    super::app::settings_rows(&app.view).len() as u16 + 2
}

/// Narrow: only the focused section, full height
fn draw_narrow(f: &mut Frame, area: Rect, app: &App) {
    draw_section(f, area, app, app.focus);
}

/// Normal: configs and settings on the left, lists and logs on the right
fn draw_normal(f: &mut Frame, area: Rect, app: &App) {
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(area);

    stack(
        f,
        left,
        app,
        &[
            (Section::Profiles, Constraint::Percentage(35)),
            (Section::Settings, Constraint::Min(settings_height(app))),
        ],
    );
    stack(
        f,
        right,
        app,
        &[
            (Section::Messages, Constraint::Percentage(25)),
            (Section::Times, Constraint::Percentage(15)),
            (Section::Logs, Constraint::Min(6)),
            (Section::Stats, Constraint::Percentage(20)),
        ],
    );
}

/// Wide: three columns, with logs and stats getting their own
fn draw_wide(f: &mut Frame, area: Rect, app: &App) {
    let [left, middle, right] = Layout::horizontal([
        Constraint::Percentage(30),
        Constraint::Percentage(30),
        Constraint::Percentage(40),
    ])
    .areas(area);

    stack(
        f,
        left,
        app,
        &[
            (Section::Profiles, Constraint::Percentage(40)),
            (Section::Settings, Constraint::Min(settings_height(app))),
        ],
    );
    stack(
        f,
        middle,
        app,
        &[
            (Section::Messages, Constraint::Min(6)),
            (Section::Times, Constraint::Percentage(35)),
        ],
    );
    stack(
        f,
        right,
        app,
        &[
            (Section::Logs, Constraint::Min(8)),
            (Section::Stats, Constraint::Percentage(30)),
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryBackend;
    use crate::logging::ConsoleBuffer;
    use crate::panel::{Panel, Timing};
    use crate::tui::theme::ThemeKind;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for row in buffer.content.chunks(buffer.area.width as usize) {
            for cell in row {
                text.push_str(cell.symbol());
            }
            text.push('\n');
        }
        text
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
    async fn wide_layout_shows_every_visible_section() {
        let app = app().await;
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("graphite"));
        assert!(text.contains("Configs"));
        assert!(text.contains("Settings"));
        assert!(text.contains("Messages"));
        assert!(text.contains("Logs"));
        assert!(text.contains("OFFLINE"));
        // Spam mode, no stats yet
        assert!(!text.contains("Send times"));
        assert!(!text.contains("Message stats"));
    }

    #[tokio::test]
    async fn narrow_layout_shows_only_the_focused_section() {
        let mut app = app().await;
        app.focus_next();
        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Settings"));
        assert!(!text.contains("Configs"));
    }
}
