// Selection wheel widget: the big central display of the pick lifecycle.
//
// Idle:      "READY" (or a setup hint when the roster is empty)
// Spinning:  rapidly changing placeholder number
// Revealing: the chosen number, highlighted
// Settled:   the chosen number plus presented count and streak

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::picker::SelectionPhase;
use crate::tui::ViewState;

/// Render the wheel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(build_wheel_lines(state))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Wheel")
                .border_style(Style::default().fg(border_color(state.phase))),
        );
    frame.render_widget(paragraph, area);
}

/// Border color per lifecycle phase.
pub fn border_color(phase: SelectionPhase) -> Color {
    match phase {
        SelectionPhase::Idle => Color::DarkGray,
        SelectionPhase::Spinning => Color::Yellow,
        SelectionPhase::Revealing => Color::Cyan,
        SelectionPhase::Settled => Color::Green,
    }
}

/// Build the content lines of the wheel panel.
fn build_wheel_lines(state: &ViewState) -> Vec<Line<'static>> {
    let dim = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::DIM);

    match state.phase {
        SelectionPhase::Idle => {
            if state.participants.is_empty() {
                vec![
                    Line::from(""),
                    Line::styled("no participants", dim),
                    Line::from(""),
                    Line::styled("press s to set up a number range", dim),
                ]
            } else {
                vec![
                    Line::from(""),
                    Line::styled(
                        "READY",
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Line::from(""),
                    Line::styled("press space to spin", dim),
                ]
            }
        }

        SelectionPhase::Spinning => {
            let display = state
                .spin_number
                .map(|n| format!("No. {n}"))
                .unwrap_or_else(|| "...".to_string());
            vec![
                Line::from(""),
                Line::styled(
                    display,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Line::from(""),
                Line::styled("selecting...", dim),
            ]
        }

        SelectionPhase::Revealing => {
            let display = state
                .spin_number
                .map(|n| format!("No. {n}"))
                .unwrap_or_else(|| "?".to_string());
            vec![
                Line::from(""),
                Line::styled(
                    display,
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
            ]
        }

        SelectionPhase::Settled => match &state.selected {
            Some(p) => {
                let mut lines = vec![
                    Line::from(""),
                    Line::styled(
                        format!("No. {}", p.number),
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Line::from(""),
                    Line::styled(format!("presented {} times", p.presented_count), dim),
                ];
                if p.streak > 1 {
                    lines.push(Line::styled(
                        format!("{} picks in a row", p.streak),
                        Style::default().fg(Color::Magenta),
                    ));
                }
                lines
            }
            None => vec![Line::from(""), Line::styled("READY", dim)],
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
