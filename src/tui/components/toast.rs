//! Toast notification stack
//!
//! Live toasts from the view-model, newest at the bottom, drawn over the
//! bottom-right corner. Toasts with an undo show the key and the seconds
//! left in their window.

use super::fit_width;
use crate::panel::toast::ToastKind;
use crate::panel::view::ToastView;
use crate::tui::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Toasts shown at once; older ones wait behind them
const VISIBLE_TOASTS: usize = 4;

fn toast_text(toast: &ToastView) -> String {
    if toast.has_undo {
        format!(
            "{}  [u] UNDO {}s",
            toast.message,
            toast.remaining.as_secs() + 1
        )
    } else {
        toast.message.clone()
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let toasts = &app.view.toasts;
    let shown = &toasts[toasts.len().saturating_sub(VISIBLE_TOASTS)..];

    let max_width = area.width.saturating_sub(4) as usize;
    let mut bottom = area.bottom().saturating_sub(2);

    for toast in shown.iter().rev() {
        let text = fit_width(&toast_text(toast), max_width.saturating_sub(4));
        let width = (text.width() as u16 + 4).min(area.width.saturating_sub(4));
        let height = 3;
        if bottom < area.top() + height {
            break;
        }
        let x = area.right().saturating_sub(width + 2);
        let y = bottom - height;
        let toast_area = Rect::new(x, y, width, height);

        let color = match toast.kind {
            ToastKind::Info => theme.toast_info,
            ToastKind::Success => theme.toast_success,
            ToastKind::Error => theme.toast_error,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .style(theme.base());
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.fg))
            .block(block);

        f.render_widget(Clear, toast_area);
        f.render_widget(paragraph, toast_area);
        bottom = y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn undo_toasts_show_seconds_left() {
        let toast = ToastView {
            id: 1,
            message: "Time removed: 09:00".into(),
            kind: ToastKind::Info,
            has_undo: true,
            remaining: Duration::from_millis(4200),
        };
        assert_eq!(toast_text(&toast), "Time removed: 09:00  [u] UNDO 5s");

        let plain = ToastView {
            has_undo: false,
            ..toast
        };
        assert_eq!(toast_text(&plain), "Time removed: 09:00");
    }
}
