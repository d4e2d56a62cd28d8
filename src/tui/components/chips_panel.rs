// Chips panel component
//
// Messages and send times render as a list of chips. Message chips already
// come shortened from the view-model; here they are only fitted to width.

use super::{fit_width, section_block};
use crate::tui::app::{App, Section};
use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App, section: Section) {
    let theme = &app.theme;
    let (chips, cursor, empty) = match section {
        Section::Times => (&app.view.times, app.cursors.times, "No send times. Press a to add one."),
        _ => (&app.view.messages, app.cursors.messages, "No messages. Press a to add one."),
    };
    let block = section_block(app, section);

    if chips.is_empty() {
        let hint = Paragraph::new(Line::styled(empty, theme.disabled())).block(block);
        f.render_widget(hint, area);
        return;
    }

    let width = area.width.saturating_sub(6) as usize;
    let items: Vec<ListItem> = chips
        .iter()
        .map(|chip| {
            ListItem::new(Line::styled(
                format!(" {} ", fit_width(chip, width)),
                Style::default().fg(theme.chip),
            ))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(if app.focus == section {
        theme.selected()
    } else {
        Style::default()
    });

    let mut state = ListState::default();
    state.select(Some(cursor));
    f.render_stateful_widget(list, area, &mut state);
}
