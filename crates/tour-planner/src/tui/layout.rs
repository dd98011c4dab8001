// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Main Panel (fill)                                 |
// |   form, plan tabs or itinerary                    |
// +--------------------------------------------------+
// | Notice (1 row)                                    |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: phase indicator and signed-in user.
    pub status_bar: Rect,
    pub main_panel: Rect,
    /// Validation notices and failure messages.
    pub notice: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(5),    // main panel
            Constraint::Length(1), // notice
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        main_panel: vertical[1],
        notice: vertical[2],
        help_bar: vertical[3],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(Rect::new(0, 0, 120, 40));
        for (name, rect) in [
            ("status_bar", layout.status_bar),
            ("main_panel", layout.main_panel),
            ("notice", layout.notice),
            ("help_bar", layout.help_bar),
        ] {
            assert!(
                rect.width > 0 && rect.height > 0,
                "{name} has zero area: {rect:?}"
            );
        }
    }

    #[test]
    fn fixed_rows_are_one_high() {
        let layout = build_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.notice.height, 1);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.main_panel.height, 21);
    }

    #[test]
    fn rows_stack_top_to_bottom() {
        let layout = build_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.status_bar.y, 0);
        assert_eq!(layout.main_panel.y, 1);
        assert_eq!(layout.notice.y, 22);
        assert_eq!(layout.help_bar.y, 23);
    }

    #[test]
    fn layout_spans_full_width() {
        let area = Rect::new(0, 0, 100, 30);
        let layout = build_layout(area);
        assert_eq!(layout.main_panel.width, area.width);
        assert_eq!(layout.help_bar.width, area.width);
    }
}
