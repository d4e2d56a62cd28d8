// Components module - the building blocks of the screen
//
// Shell components are rendered on every frame:
// - Title bar: app name, active config, clock
// - Status bar: bot status badge, mode, key hints
// - Toasts: notification stack, bottom right
//
// Section panels (profiles, settings, chips, logs, stats) render one focusable
// section each. Overlays draw the open modal on top of everything.

pub mod chips_panel;
pub mod logs_panel;
pub mod overlay;
pub mod profiles_panel;
pub mod settings_panel;
pub mod stats_panel;
pub mod status_bar;
pub mod title_bar;
pub mod toast;

use crate::tui::app::{App, Section};
use ratatui::{
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders},
};
use unicode_width::UnicodeWidthChar;

/// Bordered block for a section, highlighted while focused
pub fn section_block(app: &App, section: Section) -> Block<'static> {
    let focused = app.focus == section && app.modal.is_none();
    let title_style = if focused {
        Style::default()
            .fg(app.theme.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.fg)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(focused))
        .title(Line::styled(format!(" {} ", section.title()), title_style))
        .style(app.theme.base())
}

/// Cut `text` to at most `max` display columns, marking the cut with `…`
pub fn fit_width(text: &str, max: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max {
            out.pop();
            out.push('…');
            return out;
        }
        width += w;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_width_counts_columns() {
        assert_eq!(fit_width("hello", 10), "hello");
        assert_eq!(fit_width("hello world", 5), "hell…");
        // CJK characters are two columns wide
        assert_eq!(fit_width("日本語テキスト", 6), "日本…");
    }
}
