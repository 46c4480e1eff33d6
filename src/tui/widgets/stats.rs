// Statistics panel: min/max/average/total presented counts.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::picker::RosterStats;
use crate::tui::ViewState;

/// Render the statistics panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::ALL).title("Statistics");

    let paragraph = match &state.stats {
        Some(stats) => Paragraph::new(build_stat_lines(stats)).block(block),
        None => Paragraph::new(Line::styled(
            " no statistics",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
        ))
        .block(block),
    };
    frame.render_widget(paragraph, area);
}

fn build_stat_lines(stats: &RosterStats) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled(" min ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{:<4}", stats.min),
                Style::default().fg(Color::Green),
            ),
            Span::styled(" max ", Style::default().fg(Color::Gray)),
            Span::styled(format!("{:<4}", stats.max), Style::default().fg(Color::Red)),
        ]),
        Line::from(vec![
            Span::styled(" avg ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{:<4.1}", stats.average),
                Style::default().fg(Color::White),
            ),
            Span::styled(" total ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}", stats.total),
                Style::default().fg(Color::White),
            ),
        ]),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
