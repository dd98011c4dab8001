// Trip form widget: one row per field, the focused one highlighted.
//
// Tag fields render every option as a checkbox with the cursor option
// underlined. While a request is in flight the whole form is dimmed.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::panel_border_style;
use crate::trip::form::{FormField, TripForm};
use crate::trip::request::{Choice, DietaryTag, LocationTag};
use crate::tui::ViewState;
use crate::view::ViewPhase;

/// Width of the label column, including the required marker.
const LABEL_WIDTH: usize = 23;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let busy = state.phase == ViewPhase::Submitting;
    let title = if busy {
        " Trip Details (generating your travel plan...) "
    } else {
        " Trip Details "
    };

    let lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|field| field_line(state, *field, busy))
        .collect();

    let mut paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(panel_border_style(busy)),
    );
    if busy {
        paragraph = paragraph.style(Style::default().add_modifier(Modifier::DIM));
    }
    frame.render_widget(paragraph, area);
}

fn field_line(state: &ViewState, field: FormField, busy: bool) -> Line<'static> {
    let focused = !busy && state.focus == field;
    let marker = if focused { "> " } else { "  " };
    let required = if field.is_required() { "*" } else { "" };
    let label = format!("{marker}{}{required}", field.label());

    let label_style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut spans = vec![Span::styled(
        format!("{label:<width$} ", width = LABEL_WIDTH),
        label_style,
    )];

    match field {
        FormField::LocationPreference => {
            spans.extend(tag_spans(
                LocationTag::ALL,
                |t| state.form.has_location(t),
                focused.then_some(state.location_cursor),
            ));
        }
        FormField::DietaryPreferences => {
            spans.extend(tag_spans(
                DietaryTag::ALL,
                |t| state.form.has_dietary(t),
                focused.then_some(state.dietary_cursor),
            ));
        }
        _ => {
            let value = field_value(&state.form, field, state);
            let style = if value.is_empty() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            let shown = if value.is_empty() {
                placeholder(field).to_string()
            } else {
                value
            };
            spans.push(Span::styled(shown, style));
            if focused && is_text_entry(field) {
                spans.push(Span::styled("_", Style::default().fg(Color::Cyan)));
            }
        }
    }

    Line::from(spans)
}

/// Display text for a scalar field; empty when nothing is set.
pub fn field_value(form: &TripForm, field: FormField, state: &ViewState) -> String {
    match field {
        FormField::Source => form.source().to_string(),
        FormField::Destination => form.destination().to_string(),
        FormField::DateFrom => state.date_from_text.clone(),
        FormField::DateTo => state.date_to_text.clone(),
        FormField::Budget => format!("< {} >", form.budget().display_inr()),
        FormField::TravelMode => choice_label(form.travel_mode()),
        FormField::HotelPreference => choice_label(form.hotel_preference()),
        FormField::GroupType => choice_label(form.group_type()),
        FormField::SpecialRequirements => form.special_requirements().to_string(),
        FormField::LocationPreference | FormField::DietaryPreferences => String::new(),
    }
}

fn choice_label<T: Choice>(value: Option<T>) -> String {
    value.map(|v| format!("< {} >", v.label())).unwrap_or_default()
}

fn placeholder(field: FormField) -> &'static str {
    match field {
        FormField::DateFrom | FormField::DateTo => "YYYY-MM-DD",
        FormField::TravelMode | FormField::HotelPreference | FormField::GroupType => {
            "< select >"
        }
        FormField::SpecialRequirements => "(optional)",
        _ => "",
    }
}

/// Fields edited by typing characters.
pub fn is_text_entry(field: FormField) -> bool {
    matches!(
        field,
        FormField::Source
            | FormField::Destination
            | FormField::DateFrom
            | FormField::DateTo
            | FormField::SpecialRequirements
    )
}

fn tag_spans<T: Choice>(
    all: &[T],
    selected: impl Fn(T) -> bool,
    cursor: Option<usize>,
) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, tag) in all.iter().enumerate() {
        let check = if selected(*tag) { "[x]" } else { "[ ]" };
        let mut style = if selected(*tag) {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::White)
        };
        if cursor == Some(i) {
            style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
        }
        spans.push(Span::styled(format!("{check} {}", tag.label()), style));
        spans.push(Span::raw("  "));
    }
    spans
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
