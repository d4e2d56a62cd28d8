// Title bar component
//
// App name and active config on the left, wall clock on the right.

use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let active = app.view.profiles.iter().find(|p| p.active);

    let mut spans = vec![Span::styled(
        " ◆ graphite",
        Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
    )];
    if let Some(profile) = active {
        spans.push(Span::styled(" ──── ", Style::default().fg(theme.muted)));
        spans.push(Span::styled(
            profile.name.clone(),
            Style::default().fg(theme.fg),
        ));
    }
    if !app.view.loaded {
        spans.push(Span::styled("  (loading…)", Style::default().fg(theme.muted)));
    }

    let title = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.title))
            .title_top(Line::from(format!(" {} ", app.view.clock)).right_aligned())
            .title_bottom(Line::from(" ? help ").right_aligned())
            .style(theme.base()),
    );

    f.render_widget(title, area);
}
