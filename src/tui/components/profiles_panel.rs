// Profiles panel component
//
// One row per config: active marker, name, token summary, message count.

use super::{fit_width, section_block};
use crate::tui::app::{App, Section};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let focused = app.focus == Section::Profiles;
    let inner_width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = app
        .view
        .profiles
        .iter()
        .map(|row| {
            let marker = if row.active { "● " } else { "  " };
            let mut name_style = Style::default().fg(theme.fg);
            if row.active {
                name_style = name_style.add_modifier(Modifier::BOLD);
            }
            let name = if row.renaming {
                format!("{} ✎", row.name)
            } else {
                row.name.clone()
            };
            let detail = format!("  {} · {} messages", row.summary, row.message_count);
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(theme.online)),
                    Span::styled(fit_width(&name, inner_width.saturating_sub(2)), name_style),
                ]),
                Line::styled(fit_width(&detail, inner_width), theme.disabled()),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(section_block(app, Section::Profiles))
        .highlight_style(if focused {
            theme.selected()
        } else {
            Style::default()
        });

    let mut state = ListState::default();
    if !app.view.profiles.is_empty() {
        state.select(Some(app.cursors.profiles));
    }
    f.render_stateful_widget(list, area, &mut state);
}
