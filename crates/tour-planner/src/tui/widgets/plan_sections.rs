// Plan sections widget: five tabs over the flat plan text.
//
// Header row: [1:Transportation] [2:Accommodation] ... with the active tab
// highlighted. Body: the active section, one paragraph per line.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::{max_scroll, panel_border_style};
use crate::plan::sections::{PlanSections, SectionKey};

/// Returns the scroll limit for the active section at this size.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    sections: &PlanSections,
    active: SectionKey,
    scroll: u16,
) -> u16 {
    let [tabs_area, body_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(area);

    frame.render_widget(Paragraph::new(Line::from(tab_spans(active))), tabs_area);

    let lines = body_lines(sections, active);
    let limit = max_scroll(&lines, body_area);
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", active.label()))
                .border_style(panel_border_style(false)),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll.min(limit), 0));
    frame.render_widget(paragraph, body_area);
    limit
}

/// Tab header spans, e.g. "[1:Transportation] [2:Accommodation] ...".
pub fn tab_spans(active: SectionKey) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, key) in SectionKey::ALL.iter().enumerate() {
        let style = if *key == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}:{}]", i + 1, key.label()), style));
        spans.push(Span::raw(" "));
    }
    spans
}

fn body_lines(sections: &PlanSections, active: SectionKey) -> Vec<Line<'_>> {
    sections
        .paragraphs(active)
        .into_iter()
        .map(Line::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
