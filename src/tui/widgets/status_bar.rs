// Status bar: roster size, lifecycle phase, and the last error.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::picker::SelectionPhase;
use crate::tui::ViewState;

/// Render the status bar into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![
        Span::styled(
            " fairwheel ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "| {} participants | {}",
                state.participants.len(),
                phase_label(state.phase)
            ),
            Style::default().fg(Color::Gray),
        ),
    ];

    if let Some(err) = &state.last_error {
        spans.push(Span::styled(
            format!(" | {err}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Human label for a lifecycle phase.
pub fn phase_label(phase: SelectionPhase) -> &'static str {
    match phase {
        SelectionPhase::Idle => "ready",
        SelectionPhase::Spinning => "spinning",
        SelectionPhase::Revealing => "revealing",
        SelectionPhase::Settled => "settled",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
