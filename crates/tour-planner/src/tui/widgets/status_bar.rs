// Status bar widget: app name, phase indicator, signed-in user.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;
use crate::view::ViewPhase;

/// Render the status bar into the given area.
///
/// Layout: [title] | [phase indicator] | [session]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let (phase_text, phase_color) = phase_indicator(&state.phase);

    let spans = vec![
        Span::styled(
            " Tour Planner ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("| ", Style::default().fg(Color::Gray)),
        Span::styled(phase_text, Style::default().fg(phase_color)),
        Span::styled(" | ", Style::default().fg(Color::Gray)),
        Span::styled(
            session_label(state.session_user.as_deref()),
            Style::default().fg(Color::White),
        ),
    ];

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Short description of the phase and its color.
pub fn phase_indicator(phase: &ViewPhase) -> (&'static str, Color) {
    match phase {
        ViewPhase::Idle => ("Plan your trip", Color::White),
        ViewPhase::Submitting => ("Generating plan...", Color::Yellow),
        ViewPhase::PlanReady { .. } => ("Plan ready", Color::Green),
        ViewPhase::ItineraryReady { .. } => ("Itinerary ready", Color::Green),
        ViewPhase::Failed { .. } => ("Request failed", Color::Red),
    }
}

pub fn session_label(user: Option<&str>) -> String {
    match user {
        Some(name) => format!("Signed in as {name}"),
        None => "Not signed in".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::buffer_text;

    #[test]
    fn phase_indicator_values() {
        assert_eq!(phase_indicator(&ViewPhase::Idle).0, "Plan your trip");
        assert_eq!(phase_indicator(&ViewPhase::Submitting).1, Color::Yellow);
        assert_eq!(
            phase_indicator(&ViewPhase::Failed {
                message: "x".into()
            })
            .1,
            Color::Red
        );
    }

    #[test]
    fn session_label_values() {
        assert_eq!(session_label(Some("asha")), "Signed in as asha");
        assert_eq!(session_label(None), "Not signed in");
    }

    #[test]
    fn render_shows_phase_and_user() {
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState {
            phase: ViewPhase::Submitting,
            session_user: Some("ravi".into()),
            ..ViewState::default()
        };
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Generating plan..."));
        assert!(text.contains("Signed in as ravi"));
    }
}
