// Itinerary widget: the whole parsed document at once, day by day.
//
// Day N: <date>
//   <time>  <location> (<duration>)
//     - activity
//     alt: alternative
//
// No tabs; long itineraries scroll.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::{max_scroll, panel_border_style};
use crate::plan::itinerary::{Block as TimeBlock, ItineraryDocument};

/// Returns the scroll limit for this itinerary at this size.
pub fn render(frame: &mut Frame, area: Rect, itinerary: &ItineraryDocument, scroll: u16) -> u16 {
    let title = format!(
        " Itinerary: {} day(s), {} stop(s) ",
        itinerary.days.len(),
        itinerary.block_count()
    );
    let lines = build_lines(itinerary);
    let limit = max_scroll(&lines, area);
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(panel_border_style(false)),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll.min(limit), 0));
    frame.render_widget(paragraph, area);
    limit
}

pub fn build_lines(itinerary: &ItineraryDocument) -> Vec<Line<'static>> {
    if itinerary.is_empty() {
        return vec![Line::styled(
            "The planner returned an empty itinerary.",
            Style::default().fg(Color::DarkGray),
        )];
    }

    let mut lines = Vec::new();
    for (i, day) in itinerary.days.iter().enumerate() {
        if i > 0 {
            lines.push(Line::raw(""));
        }
        lines.push(Line::styled(
            format!("Day {}: {}", i + 1, day.date),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        for block in &day.blocks {
            lines.extend(block_lines(block));
        }
    }
    lines
}

fn block_lines(block: &TimeBlock) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("  {}  ", block.time),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            block.location.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" ({})", block.duration),
            Style::default().fg(Color::Gray),
        ),
    ])];
    for activity in &block.activities {
        lines.push(Line::raw(format!("    - {activity}")));
    }
    for alt in &block.alternative {
        lines.push(Line::styled(
            format!("    alt: {alt}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::itinerary::Day;
    use crate::tui::widgets::buffer_text;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn sample() -> ItineraryDocument {
        ItineraryDocument {
            days: vec![
                Day {
                    date: "2025-03-01".into(),
                    blocks: vec![TimeBlock {
                        time: "09:00".into(),
                        location: "Amber Fort".into(),
                        duration: "3h".into(),
                        activities: vec!["Elephant ride".into(), "Sheesh Mahal".into()],
                        alternative: vec!["Jaigarh Fort".into()],
                    }],
                },
                Day {
                    date: "2025-03-02".into(),
                    blocks: vec![],
                },
            ],
        }
    }

    #[test]
    fn empty_itinerary_has_placeholder() {
        let lines = build_lines(&ItineraryDocument::default());
        assert_eq!(lines.len(), 1);
        assert!(line_text(&lines[0]).contains("empty itinerary"));
    }

    #[test]
    fn lines_follow_document_order() {
        let texts: Vec<String> = build_lines(&sample()).iter().map(line_text).collect();
        assert_eq!(
            texts,
            vec![
                "Day 1: 2025-03-01",
                "  09:00  Amber Fort (3h)",
                "    - Elephant ride",
                "    - Sheesh Mahal",
                "    alt: Jaigarh Fort",
                "",
                "Day 2: 2025-03-02",
            ]
        );
    }

    #[test]
    fn render_shows_counts_in_title() {
        let backend = ratatui::backend::TestBackend::new(80, 12);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let doc = sample();
        terminal
            .draw(|frame| {
                render(frame, frame.area(), &doc, 0);
            })
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Itinerary: 2 day(s), 1 stop(s)"));
        assert!(text.contains("Amber Fort"));
    }

    #[test]
    fn scroll_past_the_end_shows_the_last_page() {
        let doc = ItineraryDocument {
            days: (0..10)
                .map(|i| Day {
                    date: format!("day-{i}"),
                    blocks: vec![TimeBlock {
                        time: "10:00".into(),
                        location: format!("Stop {i}"),
                        duration: "1h".into(),
                        activities: vec![format!("activity {i}")],
                        alternative: vec![],
                    }],
                })
                .collect(),
        };
        let backend = ratatui::backend::TestBackend::new(60, 8);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut limit = 0;
        terminal
            .draw(|frame| {
                limit = render(frame, frame.area(), &doc, u16::MAX);
            })
            .unwrap();
        // 10 days of 3 lines plus 9 separators, 6 visible rows.
        assert_eq!(limit, 39 - 6);
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("activity 9"));
    }
}

