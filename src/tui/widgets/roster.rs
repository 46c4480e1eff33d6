// Roster panel: the participant list with counts, streaks, and cursor.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::picker::{Participant, RosterStats};
use crate::tui::ViewState;

/// Render the participant list into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Participants ({})", state.participants.len()));

    if state.participants.is_empty() {
        let paragraph = Paragraph::new(Line::styled(
            " no numbers registered",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
        ))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    // Scroll the visible window so the cursor row stays on screen.
    let visible = area.height.saturating_sub(2) as usize;
    let skip = if visible == 0 {
        0
    } else {
        state.cursor.saturating_sub(visible - 1)
    };

    let selected_id = state.selected.as_ref().map(|p| p.id.as_str());
    let lines: Vec<Line> = state
        .participants
        .iter()
        .enumerate()
        .skip(skip)
        .take(visible.max(1))
        .map(|(idx, p)| {
            participant_line(
                p,
                idx == state.cursor,
                selected_id == Some(p.id.as_str()),
                state.stats.as_ref(),
            )
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Build one roster row: number, count badge, streak, selection star.
fn participant_line(
    p: &Participant,
    is_cursor: bool,
    is_selected: bool,
    stats: Option<&RosterStats>,
) -> Line<'static> {
    let count_color = match stats {
        // Color only when the spread is visible: least-presented green,
        // most-presented red.
        Some(s) if s.max > s.min && p.presented_count == s.min => Color::Green,
        Some(s) if s.max > s.min && p.presented_count == s.max => Color::Red,
        _ => Color::Gray,
    };

    let mut spans = vec![
        Span::styled(
            format!(" {:>4} ", p.number),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{:>3}x", p.presented_count),
            Style::default().fg(count_color),
        ),
    ];
    if p.streak > 1 {
        spans.push(Span::styled(
            format!("  ~{}", p.streak),
            Style::default().fg(Color::Magenta),
        ));
    }
    if is_selected {
        spans.push(Span::styled("  *", Style::default().fg(Color::Yellow)));
    }

    let mut line = Line::from(spans);
    if is_cursor {
        line = line.style(Style::default().add_modifier(Modifier::REVERSED));
    }
    line
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
