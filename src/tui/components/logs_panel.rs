//! Logs panel component
//!
//! The backend's log tail. Lines that mention an error or failure are
//! flagged in the error color. The panel follows the newest line unless the
//! user scrolled back.

use super::section_block;
use crate::panel::view::LogLine;
use crate::tui::app::{App, Section};
use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Lines visible in a window of `height` rows, ending `back` lines before
/// the newest
fn window(logs: &[LogLine], height: usize, back: usize) -> &[LogLine] {
    let end = logs.len().saturating_sub(back);
    let start = end.saturating_sub(height);
    &logs[start..end]
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let mut block = section_block(app, Section::Logs);
    if app.cursors.logs_back > 0 {
        block = block.title_bottom(
            Line::styled(format!(" ↑ {} ", app.cursors.logs_back), theme.disabled()).right_aligned(),
        );
    }

    if app.view.logs.is_empty() {
        let empty = Paragraph::new(Line::styled("No logs yet", theme.disabled())).block(block);
        f.render_widget(empty, area);
        return;
    }

    let height = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = window(&app.view.logs, height, app.cursors.logs_back)
        .iter()
        .map(|line| {
            let color = if line.flagged {
                theme.log_flagged
            } else {
                theme.fg
            };
            Line::styled(line.text.clone(), Style::default().fg(color))
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logs(n: usize) -> Vec<LogLine> {
        (0..n)
            .map(|i| LogLine {
                text: i.to_string(),
                flagged: false,
            })
            .collect()
    }

    #[test]
    fn window_follows_tail_and_scrolls_back() {
        let logs = logs(10);
        let texts = |w: &[LogLine]| w.iter().map(|l| l.text.clone()).collect::<Vec<_>>();

        assert_eq!(texts(window(&logs, 3, 0)), ["7", "8", "9"]);
        assert_eq!(texts(window(&logs, 3, 2)), ["5", "6", "7"]);
        assert_eq!(texts(window(&logs, 20, 0)).len(), 10);
        assert!(window(&logs, 3, 50).is_empty());
    }
}
