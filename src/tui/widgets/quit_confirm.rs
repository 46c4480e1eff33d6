// Confirmation popups for quit and clear-all.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::layout::centered_rect;

/// Render the quit confirmation popup.
pub fn render(frame: &mut Frame, area: Rect) {
    render_popup(
        frame,
        area,
        "Quit",
        "Quit fairwheel? (y/n)",
        Color::Yellow,
    );
}

/// Render the clear-all confirmation popup.
pub fn render_clear_confirm(frame: &mut Frame, area: Rect) {
    render_popup(
        frame,
        area,
        "Clear all data",
        "Delete the roster and all history? (y/n)",
        Color::Red,
    );
}

fn render_popup(frame: &mut Frame, area: Rect, title: &str, message: &str, color: Color) {
    let popup = centered_rect(46, 5, area);
    frame.render_widget(Clear, popup);

    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::styled(message.to_string(), Style::default().fg(Color::White)),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(Style::default().fg(color)),
    );
    frame.render_widget(paragraph, popup);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
