// Status bar component
//
// Bot status badge, send mode and dry-run marker, then key hints for the
// focused section. Hints shrink on narrow terminals.

use crate::tui::app::{App, Section};
use crate::tui::layout::Breakpoint;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn section_hints(section: Section) -> &'static str {
    match section {
        Section::Profiles => "⏎ switch · n new · r rename · d delete · e/i export/import",
        Section::Settings => "⏎ edit/toggle · ←/→ mode",
        Section::Messages | Section::Times => "a add · d remove",
        Section::Logs => "↑/↓ scroll · y copy · E export",
        Section::Stats => "R reset",
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let status = &app.view.status;
    let bp = Breakpoint::from_width(area.width);

    let badge_color = if status.running {
        theme.online
    } else {
        theme.offline
    };
    let mut spans = vec![
        Span::styled(
            format!(" ● {} ", status.label),
            Style::default().fg(badge_color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("│ {} ", app.view.mode.label()),
            Style::default().fg(theme.fg),
        ),
    ];
    if app.view.dry_run {
        spans.push(Span::styled(
            "│ DRY RUN ",
            Style::default().fg(theme.toast_info),
        ));
    }

    let control = if status.can_start {
        "s start"
    } else {
        "x stop"
    };
    let hints = if bp.at_least(Breakpoint::Normal) {
        format!(
            "│ {} · {} · u undo · Tab next · q quit",
            control,
            section_hints(app.focus)
        )
    } else {
        format!("│ {} · q quit", control)
    };
    spans.push(Span::styled(hints, Style::default().fg(theme.muted)));

    let bar = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::TOP).style(theme.base()));
    f.render_widget(bar, area);
}
