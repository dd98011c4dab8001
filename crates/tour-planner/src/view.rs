// Planning view lifecycle.
//
// Idle -> Submitting -> PlanReady | ItineraryReady | Failed
//
// Submitting is the lock that keeps a second request from starting while
// one is in flight. Failed goes back to Submitting on resubmit; the ready
// states go back to Idle on "modify plan". There is no terminal state.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::client::{PlanOutcome, RequestError};
use crate::plan::itinerary::{self, ItineraryDocument};
use crate::plan::sections::{PlanSections, SectionKey};
use crate::plan::unwrap::unwrap;
use crate::trip::form::{FormError, TripForm};
use crate::trip::request::TripRequest;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Exactly one of: nothing, in flight, a result, or an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewPhase {
    /// Form visible, no result.
    Idle,
    /// Request in flight, form locked.
    Submitting,
    /// Flat plan received; `active` is the visible tab.
    PlanReady {
        sections: PlanSections,
        active: SectionKey,
    },
    /// Structured itinerary received; rendered whole, no tabs.
    ItineraryReady { itinerary: ItineraryDocument },
    /// Request failed; form re-enabled with the message shown.
    Failed { message: String },
}

impl ViewPhase {
    pub fn name(&self) -> &'static str {
        match self {
            ViewPhase::Idle => "idle",
            ViewPhase::Submitting => "submitting",
            ViewPhase::PlanReady { .. } => "plan-ready",
            ViewPhase::ItineraryReady { .. } => "itinerary-ready",
            ViewPhase::Failed { .. } => "failed",
        }
    }

    /// Whether the form is shown and accepts edits.
    pub fn shows_form(&self) -> bool {
        matches!(self, ViewPhase::Idle | ViewPhase::Failed { .. })
    }
}

/// A request that has been let through, with the id its result must carry.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id: u64,
    pub request: TripRequest,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitRejected {
    #[error("a request is already in flight")]
    AlreadySubmitting,

    #[error("a result is being shown; modify the plan first")]
    ResultShown,

    #[error(transparent)]
    Incomplete(#[from] FormError),
}

// ---------------------------------------------------------------------------
// PlanView
// ---------------------------------------------------------------------------

/// The view state machine.
#[derive(Debug, Clone)]
pub struct PlanView {
    phase: ViewPhase,
    /// Id of the most recent submission. Results carrying any other id are
    /// stale and dropped.
    submission: u64,
}

impl Default for PlanView {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanView {
    pub fn new() -> Self {
        PlanView {
            phase: ViewPhase::Idle,
            submission: 0,
        }
    }

    pub fn phase(&self) -> &ViewPhase {
        &self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == ViewPhase::Submitting
    }

    /// Id of the latest submission (0 before the first one).
    pub fn current_submission(&self) -> u64 {
        self.submission
    }

    /// Enter `Submitting` with a frozen copy of `form`.
    ///
    /// Only allowed from `Idle` or `Failed`, and only when every required
    /// field is filled. On rejection the phase is unchanged.
    pub fn begin_submit(&mut self, form: &TripForm) -> Result<Submission, SubmitRejected> {
        match self.phase {
            ViewPhase::Submitting => return Err(SubmitRejected::AlreadySubmitting),
            ViewPhase::PlanReady { .. } | ViewPhase::ItineraryReady { .. } => {
                return Err(SubmitRejected::ResultShown)
            }
            ViewPhase::Idle | ViewPhase::Failed { .. } => {}
        }

        let request = form.snapshot()?;
        self.submission += 1;
        self.phase = ViewPhase::Submitting;
        info!("Submitting plan request #{}", self.submission);

        Ok(Submission {
            id: self.submission,
            request,
        })
    }

    /// Accept the result of submission `id`.
    ///
    /// Returns `false` (and changes nothing) if no request is in flight or
    /// `id` is not the current submission.
    pub fn complete(&mut self, id: u64, result: Result<PlanOutcome, RequestError>) -> bool {
        if !self.is_submitting() || id != self.submission {
            debug!(
                "Discarding stale plan result (result #{}, current #{}, phase {})",
                id,
                self.submission,
                self.phase.name()
            );
            return false;
        }
        self.phase = resolve_outcome(result);
        info!("Plan request #{} finished: {}", id, self.phase.name());
        true
    }

    /// The visible tab, when a flat plan is shown.
    pub fn active_section(&self) -> Option<SectionKey> {
        match &self.phase {
            ViewPhase::PlanReady { active, .. } => Some(*active),
            _ => None,
        }
    }

    /// Switch the visible tab. Only meaningful in `PlanReady`; the sections
    /// themselves are untouched.
    pub fn select_section(&mut self, key: SectionKey) -> bool {
        match &mut self.phase {
            ViewPhase::PlanReady { active, .. } => {
                *active = key;
                true
            }
            _ => false,
        }
    }

    pub fn next_section(&mut self) -> bool {
        match self.active_section() {
            Some(key) => self.select_section(key.next()),
            None => false,
        }
    }

    pub fn prev_section(&mut self) -> bool {
        match self.active_section() {
            Some(key) => self.select_section(key.prev()),
            None => false,
        }
    }

    /// Drop the shown result and go back to the form.
    pub fn modify_plan(&mut self) -> bool {
        match self.phase {
            ViewPhase::PlanReady { .. } | ViewPhase::ItineraryReady { .. } => {
                self.phase = ViewPhase::Idle;
                info!("Returning to form to modify plan");
                true
            }
            _ => false,
        }
    }
}

/// Turn a finished request into the phase it leads to.
///
/// Raw itinerary text goes through fence stripping and validation here, so
/// every failure ends in `Failed` with a user-facing message while the
/// diagnostic is logged.
pub fn resolve_outcome(result: Result<PlanOutcome, RequestError>) -> ViewPhase {
    let err = match result {
        Ok(PlanOutcome::Sections(sections)) => {
            return ViewPhase::PlanReady {
                sections,
                active: SectionKey::Transportation,
            }
        }
        Ok(PlanOutcome::RawItineraryText(raw)) => match itinerary::parse(&unwrap(&raw)) {
            Ok(itinerary) => return ViewPhase::ItineraryReady { itinerary },
            Err(e) => RequestError::MalformedPayload(e.to_string()),
        },
        Err(e) => e,
    };
    warn!("Plan request failed: {err}");
    ViewPhase::Failed {
        message: err.user_message(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
