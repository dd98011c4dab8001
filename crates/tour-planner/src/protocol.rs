// Messages exchanged between the TUI, the app loop, and submission tasks.

use crate::api::client::{PlanOutcome, RequestError};
use crate::plan::sections::SectionKey;
use crate::trip::form::{FormEdit, TripForm};
use crate::view::ViewPhase;

/// Commands sent from the TUI to the app loop.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Change one form field.
    Edit(FormEdit),
    /// Freeze the form and send it to the planning service.
    Submit,
    SelectSection(SectionKey),
    NextSection,
    PrevSection,
    /// Drop the current result and return to the form.
    ModifyPlan,
    Logout,
    Quit,
}

/// Result of one planning request, tagged with its submission id so late
/// results from an abandoned request can be recognized.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionResult {
    pub submission: u64,
    pub result: Result<PlanOutcome, RequestError>,
}

/// Everything the TUI needs to draw a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSnapshot {
    pub form: TripForm,
    pub phase: ViewPhase,
    pub notice: Option<String>,
    /// Username of the signed-in account, if a session is present.
    pub session_user: Option<String>,
}

/// Updates pushed from the app loop to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Snapshot(Box<AppSnapshot>),
    /// Authoritative form, sent when an edit was refused so the TUI's copy
    /// can be rolled back.
    FormChanged(Box<TripForm>),
    PhaseChanged(Box<ViewPhase>),
    /// Informational line under the form; `None` clears it.
    Notice(Option<String>),
    SessionChanged(Option<String>),
}
