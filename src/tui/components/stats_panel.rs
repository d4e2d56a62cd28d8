// Stats panel component
//
// Per-message send counts, highest first, with a bar relative to the top
// message. Only laid out while there are stats to show.

use super::section_block;
use crate::tui::app::{App, Section};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Bar of `count` scaled so `max` fills `width` cells
fn bar(count: u64, max: u64, width: usize) -> String {
    if max == 0 || width == 0 {
        return String::new();
    }
    let cells = ((count as f64 / max as f64) * width as f64).round() as usize;
    "█".repeat(cells.max(1))
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let stats = &app.view.stats;
    let max = stats.first().map(|r| r.count).unwrap_or(0);
    let count_width = max.to_string().len();
    let bar_width = (area.width as usize / 4).clamp(4, 20);

    let lines: Vec<Line> = stats
        .iter()
        .map(|row| {
            Line::from(vec![
                Span::styled(
                    format!("{:>width$} ", row.count, width = count_width),
                    Style::default().fg(theme.fg),
                ),
                Span::styled(
                    format!("{:<width$} ", bar(row.count, max, bar_width), width = bar_width),
                    Style::default().fg(theme.chip),
                ),
                Span::styled(row.label.replace('\n', " ↵ "), theme.disabled()),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(section_block(app, Section::Stats));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_scale_to_the_top_count() {
        assert_eq!(bar(10, 10, 8).chars().count(), 8);
        assert_eq!(bar(5, 10, 8).chars().count(), 4);
        // Any count gets at least one cell
        assert_eq!(bar(1, 1000, 8).chars().count(), 1);
        assert_eq!(bar(3, 0, 8), "");
    }
}
