// Overlay component - draws the open modal over the screen
//
// Prompts sit in a small centered box with a block cursor. Help and the
// developer console take most of the screen.

use crate::tui::app::App;
use crate::tui::modal::{Modal, Prompt, HELP};
use crate::tui::theme::Theme;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tracing::Level;

/// Rect of `width` x `height` centered in `area`, clamped to it
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

fn modal_block(theme: &Theme, title: String, footer: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(true))
        .title(Line::styled(
            title,
            Style::default()
                .fg(theme.title)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::styled(footer, theme.disabled()).right_aligned())
        .style(theme.base())
}

/// Prompt text as lines, with the cursor drawn as a reversed cell
fn prompt_lines<'a>(prompt: &'a Prompt, theme: &Theme) -> Vec<Line<'a>> {
    let (before, after) = prompt.input.split_at_cursor();
    let cursor_style = Style::default()
        .fg(theme.fg)
        .add_modifier(Modifier::REVERSED);

    let mut after_chars = after.chars();
    let (under, rest) = match after_chars.next() {
        Some('\n') | None => (" ".to_string(), after),
        Some(c) => (c.to_string(), after_chars.as_str()),
    };

    // Split on line breaks, carrying the cursor span on the line it sits in
    let mut lines = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    let mut before_parts = before.split('\n').peekable();
    while let Some(part) = before_parts.next() {
        current.push(Span::raw(part));
        if before_parts.peek().is_some() {
            lines.push(Line::from(std::mem::take(&mut current)));
        }
    }
    current.push(Span::styled(under, cursor_style));
    let mut rest_parts = rest.split('\n');
    if let Some(first) = rest_parts.next() {
        current.push(Span::raw(first));
    }
    lines.push(Line::from(current));
    lines.extend(rest_parts.map(Line::raw));
    lines
}

fn render_prompt(f: &mut Frame, area: Rect, prompt: &Prompt, theme: &Theme) {
    let lines = prompt_lines(prompt, theme);
    let height = (lines.len() as u16 + 2).clamp(3, area.height.saturating_sub(4).max(3));
    let rect = centered(area, 64, height);

    let footer = if prompt.input.is_multiline() {
        " ⏎ save · Alt+⏎ new line · Esc cancel "
    } else {
        " ⏎ save · Esc cancel "
    };
    let paragraph = Paragraph::new(lines)
        .block(modal_block(theme, prompt.kind.title(), footer))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, rect);
    f.render_widget(paragraph, rect);
}

fn render_help(f: &mut Frame, area: Rect, theme: &Theme) {
    let mut lines = Vec::new();
    for (group, bindings) in HELP {
        lines.push(Line::styled(
            *group,
            Style::default()
                .fg(theme.title)
                .add_modifier(Modifier::BOLD),
        ));
        for (keys, action) in bindings.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<18}", keys), Style::default().fg(theme.chip)),
                Span::styled(*action, Style::default().fg(theme.fg)),
            ]));
        }
        lines.push(Line::default());
    }

    let rect = centered(area, 70, lines.len() as u16 + 2);
    let paragraph = Paragraph::new(lines).block(modal_block(
        theme,
        " Keyboard shortcuts ".to_string(),
        " Esc close ",
    ));
    f.render_widget(Clear, rect);
    f.render_widget(paragraph, rect);
}

fn render_console(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let rect = centered(
        area,
        area.width.saturating_sub(8),
        area.height.saturating_sub(4),
    );
    let rows = rect.height.saturating_sub(2) as usize;

    let entries = app.console.tail(rows);
    let lines: Vec<Line> = if entries.is_empty() {
        vec![Line::styled("No log output captured yet", theme.disabled())]
    } else {
        entries
            .iter()
            .map(|entry| {
                let color = if entry.level == Level::ERROR {
                    theme.toast_error
                } else if entry.level == Level::WARN {
                    theme.log_flagged
                } else if entry.level == Level::INFO {
                    theme.fg
                } else {
                    theme.muted
                };
                Line::styled(entry.line(), Style::default().fg(color))
            })
            .collect()
    };

    let paragraph = Paragraph::new(lines).block(modal_block(
        theme,
        format!(" Console ({} entries) ", app.console.len()),
        " Esc close ",
    ));
    f.render_widget(Clear, rect);
    f.render_widget(paragraph, rect);
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    match &app.modal {
        Some(Modal::Prompt(prompt)) => render_prompt(f, area, prompt, &app.theme),
        Some(Modal::Help) => render_help(f, area, &app.theme),
        Some(Modal::Console) => render_console(f, area, app),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::modal::PromptKind;
    use crate::tui::theme::ThemeKind;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn cursor_stays_on_its_line() {
        let theme = ThemeKind::Dark.theme();
        let Modal::Prompt(mut prompt) = Modal::prompt(PromptKind::AddMessage, "hi\nthere") else {
            panic!("not a prompt");
        };
        // Cursor at the end: a blank cursor cell trails the last line
        let lines = prompt_lines(&prompt, &theme);
        assert_eq!(lines.len(), 2);
        assert_eq!(line_text(&lines[0]), "hi");
        assert_eq!(line_text(&lines[1]), "there ");

        prompt.input.clear();
        let lines = prompt_lines(&prompt, &theme);
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), " ");
    }

    #[test]
    fn centered_rect_fits_small_areas() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered(area, 64, 20);
        assert_eq!((rect.width, rect.height), (40, 10));

        let rect = centered(Rect::new(0, 0, 100, 40), 60, 10);
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (20, 15, 60, 10));
    }
}
