// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the app
// loop, or into local ViewState changes (focus, cursors, scroll). Form
// edits are applied to the local form copy before being sent.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{ViewState, DATE_FORMAT};
use crate::plan::sections::SectionKey;
use crate::protocol::UserCommand;
use crate::trip::form::{FormEdit, FormField};
use crate::trip::request::{Choice, DietaryTag, LocationTag};
use crate::view::ViewPhase;

/// Longest text accepted in a date field ("YYYY-MM-DD").
const DATE_TEXT_LEN: usize = 10;

/// Lines scrolled by PageUp/PageDown.
const PAGE_SIZE: u16 = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key should be forwarded to the app
/// loop, `None` when it was handled locally (or ignored).
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C quits from anywhere; Ctrl+L logs out.
    if key_event.modifiers.contains(KeyModifiers::CONTROL) {
        return match key_event.code {
            KeyCode::Char('c') => Some(UserCommand::Quit),
            KeyCode::Char('l') if !view_state.confirm_quit => Some(UserCommand::Logout),
            _ => None,
        };
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    match view_state.phase {
        ViewPhase::Idle | ViewPhase::Failed { .. } => handle_form_key(key_event, view_state),
        ViewPhase::Submitting => {
            if key_event.code == KeyCode::Esc {
                view_state.confirm_quit = true;
            }
            None
        }
        ViewPhase::PlanReady { .. } => handle_plan_key(key_event, view_state),
        ViewPhase::ItineraryReady { .. } => handle_result_key(key_event, view_state),
    }
}

/// `y`/`q` confirm, `n`/Esc cancel, everything else is blocked.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

fn handle_form_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Tab | KeyCode::Down => {
            view_state.focus = view_state.focus.next();
            None
        }
        KeyCode::BackTab | KeyCode::Up => {
            view_state.focus = view_state.focus.prev();
            None
        }
        KeyCode::Enter => Some(UserCommand::Submit),
        KeyCode::Esc => {
            view_state.confirm_quit = true;
            None
        }
        _ => handle_field_key(key_event.code, view_state),
    }
}

/// Keys that change the value of the focused field.
fn handle_field_key(code: KeyCode, view_state: &mut ViewState) -> Option<UserCommand> {
    let form = &view_state.form;
    let edit = match (view_state.focus, code) {
        // Free text
        (FormField::Source, code) => FormEdit::Source(edit_text(form.source(), code)?),
        (FormField::Destination, code) => {
            FormEdit::Destination(edit_text(form.destination(), code)?)
        }
        (FormField::SpecialRequirements, code) => {
            FormEdit::SpecialRequirements(edit_text(form.special_requirements(), code)?)
        }

        // Dates: kept as raw text locally, sent once they parse
        (FormField::DateFrom, code) => {
            view_state.date_from_text = edit_date_text(&view_state.date_from_text, code)?;
            FormEdit::DateFrom(parse_date(&view_state.date_from_text))
        }
        (FormField::DateTo, code) => {
            view_state.date_to_text = edit_date_text(&view_state.date_to_text, code)?;
            FormEdit::DateTo(parse_date(&view_state.date_to_text))
        }

        (FormField::Budget, KeyCode::Left | KeyCode::Char('-')) => {
            FormEdit::Budget(form.budget().decrement().amount() as i64)
        }
        (FormField::Budget, KeyCode::Right | KeyCode::Char('+')) => {
            FormEdit::Budget(form.budget().increment().amount() as i64)
        }

        (FormField::TravelMode, code) => {
            FormEdit::TravelMode(cycle_choice(form.travel_mode(), code)?)
        }
        (FormField::HotelPreference, code) => {
            FormEdit::HotelPreference(cycle_choice(form.hotel_preference(), code)?)
        }
        (FormField::GroupType, code) => {
            FormEdit::GroupType(cycle_choice(form.group_type(), code)?)
        }

        (FormField::LocationPreference, code) => {
            let tag = tag_key(&mut view_state.location_cursor, LocationTag::ALL, code)?;
            FormEdit::ToggleLocation(tag)
        }
        (FormField::DietaryPreferences, code) => {
            let tag = tag_key(&mut view_state.dietary_cursor, DietaryTag::ALL, code)?;
            FormEdit::ToggleDietary(tag)
        }

        _ => return None,
    };

    view_state.form.apply(edit.clone());
    Some(UserCommand::Edit(edit))
}

/// New text after a typing key, or `None` if the key does not edit text.
fn edit_text(current: &str, code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Char(c) => {
            let mut text = current.to_string();
            text.push(c);
            Some(text)
        }
        KeyCode::Backspace => {
            let mut text = current.to_string();
            text.pop()?;
            Some(text)
        }
        _ => None,
    }
}

/// Like `edit_text` but only digits and `-`, up to `YYYY-MM-DD` length.
fn edit_date_text(current: &str, code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Char(c) if (c.is_ascii_digit() || c == '-') && current.len() < DATE_TEXT_LEN => {
            edit_text(current, code)
        }
        KeyCode::Backspace => edit_text(current, code),
        _ => None,
    }
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    if text.len() != DATE_TEXT_LEN {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

/// Left/Right step through the options; Backspace/Delete clears.
///
/// Outer `None`: key not handled. Inner `None`: nothing selected.
fn cycle_choice<T: Choice>(current: Option<T>, code: KeyCode) -> Option<Option<T>> {
    match code {
        KeyCode::Right | KeyCode::Char(' ') => Some(T::cycle(current, true)),
        KeyCode::Left => Some(T::cycle(current, false)),
        KeyCode::Backspace | KeyCode::Delete => current.map(|_| None),
        _ => None,
    }
}

/// Left/Right move the cursor along the tag row; Space toggles the tag
/// under it.
fn tag_key<T: Choice>(cursor: &mut usize, all: &[T], code: KeyCode) -> Option<T> {
    match code {
        KeyCode::Left => {
            *cursor = cursor.saturating_sub(1);
            None
        }
        KeyCode::Right => {
            *cursor = (*cursor + 1).min(all.len().saturating_sub(1));
            None
        }
        KeyCode::Char(' ') | KeyCode::Char('x') => all.get(*cursor).copied(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

fn handle_plan_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char(c @ '1'..='5') => {
            let idx = c.to_digit(10).map(|d| d as usize - 1)?;
            SectionKey::from_index(idx).map(UserCommand::SelectSection)
        }
        KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => Some(UserCommand::NextSection),
        KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => Some(UserCommand::PrevSection),
        _ => handle_result_key(key_event, view_state),
    }
}

/// Keys shared by both result views.
fn handle_result_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // The limit may have shrunk since the last key (resize, new tab).
    let limit = view_state.scroll_limit.get();
    let scroll = view_state.scroll.min(limit);
    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.scroll = scroll.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            view_state.scroll = scroll.saturating_add(1).min(limit);
            None
        }
        KeyCode::PageUp => {
            view_state.scroll = scroll.saturating_sub(PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            view_state.scroll = scroll.saturating_add(PAGE_SIZE).min(limit);
            None
        }
        KeyCode::Char('m') => Some(UserCommand::ModifyPlan),
        KeyCode::Char('q') | KeyCode::Esc => {
            view_state.confirm_quit = true;
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
