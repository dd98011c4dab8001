// TUI widget modules for each panel.

pub mod form;
pub mod itinerary;
pub mod plan_sections;
pub mod quit_confirm;
pub mod status_bar;

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Wrap};

/// Border style for the main panel: yellow while a request is in flight.
pub fn panel_border_style(busy: bool) -> Style {
    if busy {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Cyan)
    }
}

/// Largest scroll offset that still fills a bordered panel at `area` with
/// `lines`, counting rows after word wrapping.
pub fn max_scroll(lines: &[Line], area: Rect) -> u16 {
    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);
    let rows = Paragraph::new(lines.to_vec())
        .wrap(Wrap { trim: false })
        .line_count(inner_width);
    u16::try_from(rows)
        .unwrap_or(u16::MAX)
        .saturating_sub(inner_height)
}

/// Flatten a rendered test buffer into text, one line per row.
#[cfg(test)]
pub(crate) fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}
