// Settings panel component
//
// The form of the active config: mode selector, text fields and toggles.
// Fields greyed out by the delay toggle stay visible but dimmed.

use super::section_block;
use crate::panel::settings::SettingsField;
use crate::tui::app::{settings_rows, App, Section, SettingsRow};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
    Frame,
};

const LABEL_WIDTH: usize = 16;

/// Tokens are secrets: show only whether one is set and how long it is
fn masked(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        "•".repeat(value.chars().count().min(24))
    }
}

fn toggle(on: bool) -> &'static str {
    if on {
        "[x]"
    } else {
        "[ ]"
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let view = &app.view;
    let focused = app.focus == Section::Settings;

    let row_line = |label: &str, value: String, style: Style| {
        Line::from(vec![
            Span::styled(format!("{:<width$}", label, width = LABEL_WIDTH), theme.disabled()),
            Span::styled(value, style),
        ])
    };
    let normal = Style::default().fg(theme.fg);

    let items: Vec<ListItem> = settings_rows(view)
        .into_iter()
        .map(|row| {
            let line = match row {
                SettingsRow::Mode => {
                    row_line("Send mode", format!("‹ {} ›", view.mode.label()), normal)
                }
                SettingsRow::Delay => {
                    row_line("Random delay", toggle(view.delay_enabled).to_string(), normal)
                }
                SettingsRow::DryRun => {
                    row_line("Dry run", toggle(view.dry_run).to_string(), normal)
                }
                SettingsRow::Field(field) => match view.field(field) {
                    Some(fv) => {
                        let value = if field == SettingsField::Token {
                            masked(&fv.value)
                        } else {
                            fv.value.clone()
                        };
                        let style = if fv.enabled { normal } else { theme.disabled() };
                        row_line(fv.label, value, style)
                    }
                    None => Line::default(),
                },
            };
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(section_block(app, Section::Settings))
        .highlight_style(if focused {
            theme.selected()
        } else {
            Style::default()
        });

    let mut state = ListState::default();
    state.select(Some(app.cursors.settings));
    f.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_masked() {
        assert_eq!(masked(""), "");
        assert_eq!(masked("abc"), "•••");
        assert_eq!(masked(&"x".repeat(70)).chars().count(), 24);
    }
}
