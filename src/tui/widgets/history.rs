// History panel: completed selections, newest first.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::picker::HistoryEntry;
use crate::tui::ViewState;

/// Render the history log into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("History ({})", state.history.len()));

    let dim = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::DIM);

    if !state.show_history {
        let paragraph =
            Paragraph::new(Line::styled(" hidden - press h to show", dim)).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    if state.history.is_empty() {
        let paragraph = Paragraph::new(Line::styled(" no selections yet", dim)).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = state
        .history
        .iter()
        .take(visible.max(1))
        .map(entry_line)
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// One history row: "No. 7   2026-08-06 14:32:05".
fn entry_line(entry: &HistoryEntry) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" No. {:<4}", entry.participant_number),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            Style::default().fg(Color::Gray),
        ),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
