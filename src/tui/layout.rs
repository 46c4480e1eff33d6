// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones for the picker dashboard:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +-----------------+--------------------------------+
// | Roster (35%)    | Wheel (9 rows)                 |
// |                 +--------------------------------+
// |                 | Statistics (4 rows)            |
// |                 +--------------------------------+
// |                 | History (fill)                 |
// +-----------------+--------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: roster size, policy, phase, last error.
    pub status_bar: Rect,
    /// Left column: the participant list.
    pub roster: Rect,
    /// Right column top: the selection wheel.
    pub wheel: Rect,
    /// Right column middle: presented-count statistics.
    pub stats: Rect,
    /// Right column bottom: selection history.
    pub history: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
///
/// The layout uses fixed heights for the status bar, wheel, statistics, and
/// help bar, with the remaining space going to the roster and history.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(10),   // middle section (roster + right column)
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let status_bar = vertical[0];
    let middle = vertical[1];
    let help_bar = vertical[2];

    // Horizontal: roster (35%) | right column (65%)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(middle);

    let roster = horizontal[0];
    let right = horizontal[1];

    // Right column vertical: wheel (9) | stats (4) | history (fill)
    let right_sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),
            Constraint::Length(4),
            Constraint::Min(3),
        ])
        .split(right);

    AppLayout {
        status_bar,
        roster,
        wheel: right_sections[0],
        stats: right_sections[1],
        history: right_sections[2],
        help_bar,
    }
}

/// A centered rectangle for modal popups, clamped to the available area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_zones_cover_expected_rows() {
        let layout = build_layout(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.wheel.height, 9);
        assert_eq!(layout.stats.height, 4);
        // Roster and history fill the rest.
        assert_eq!(layout.roster.height, 38);
        assert_eq!(layout.history.height, 38 - 9 - 4);
    }

    #[test]
    fn layout_splits_roster_and_right_column() {
        let layout = build_layout(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.roster.width, 35);
        assert_eq!(layout.wheel.width, 65);
        assert_eq!(layout.wheel.x, 35);
    }

    #[test]
    fn centered_rect_is_centered() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(40, 8, area);
        assert_eq!(popup.width, 40);
        assert_eq!(popup.height, 8);
        assert_eq!(popup.x, 30);
        assert_eq!(popup.y, 16);
    }

    #[test]
    fn centered_rect_clamps_to_small_terminals() {
        let area = Rect::new(0, 0, 20, 5);
        let popup = centered_rect(40, 8, area);
        assert!(popup.width <= area.width);
        assert!(popup.height <= area.height);
    }
}
