// Modal forms: range setup and add-participant.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::layout::centered_rect;
use crate::tui::{SetupField, ViewState};

/// Render the range-setup popup over the dashboard.
pub fn render_range_form(frame: &mut Frame, area: Rect, state: &ViewState) {
    let popup = centered_rect(44, 8, area);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from(""),
        field_line(
            "Start",
            &state.setup_start,
            state.setup_field == SetupField::Start,
        ),
        field_line("End", &state.setup_end, state.setup_field == SetupField::End),
        Line::from(""),
        hint_line(" Tab switch | Enter apply | Esc cancel"),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Set number range")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(paragraph, popup);
}

/// Render the add-participant popup over the dashboard.
pub fn render_add_form(frame: &mut Frame, area: Rect, state: &ViewState) {
    let popup = centered_rect(44, 6, area);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from(""),
        field_line("Number", &state.add_input, true),
        hint_line(" Enter add | Esc cancel"),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Add participant")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(paragraph, popup);
}

/// One labelled input row; the active field gets a block cursor.
fn field_line(label: &str, value: &str, active: bool) -> Line<'static> {
    let style = if active {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if active { "_" } else { " " };
    Line::from(vec![
        Span::styled(format!(" {label:>6}: "), Style::default().fg(Color::Gray)),
        Span::styled(format!("{value}{cursor}"), style),
    ])
}

fn hint_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM),
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
