// Application state and main event loop.
//
// The app loop owns the form, the view state machine and the session. It
// listens for commands from the TUI and results from submission tasks, and
// pushes UI updates back to the TUI.

use std::sync::Arc;

use futures_util::future::OptionFuture;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::client::PlanService;
use crate::api::session::{SessionStore, SessionUser};
use crate::protocol::{AppSnapshot, SubmissionResult, UiUpdate, UserCommand};
use crate::trip::form::{FormError, FormField, TripForm};
use crate::view::{PlanView, SubmitRejected};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub form: TripForm,
    pub view: PlanView,
    /// One-line notice under the form (validation refusals).
    pub notice: Option<String>,
    pub session: SessionStore,
    /// Planning backend, shared with submission tasks.
    pub service: Arc<dyn PlanService>,
    /// Submission tasks report back through a clone of this sender.
    pub result_tx: mpsc::Sender<SubmissionResult>,
    pub current_task: Option<JoinHandle<()>>,
}

impl AppState {
    pub fn new(
        service: Arc<dyn PlanService>,
        session: SessionStore,
        result_tx: mpsc::Sender<SubmissionResult>,
    ) -> Self {
        AppState {
            form: TripForm::new(),
            view: PlanView::new(),
            notice: None,
            session,
            service,
            result_tx,
            current_task: None,
        }
    }

    pub fn session_user(&self) -> Option<String> {
        self.session.user().map(|u| u.username.clone())
    }

    /// Build the full snapshot the TUI draws from.
    pub fn build_snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            form: self.form.clone(),
            phase: self.view.phase().clone(),
            notice: self.notice.clone(),
            session_user: self.session_user(),
        }
    }

    /// Start a planning request for the current form.
    ///
    /// On success the request runs in a spawned task and its result arrives
    /// on the result channel tagged with the returned submission id.
    pub fn submit(&mut self) -> Result<u64, SubmitRejected> {
        let submission = self.view.begin_submit(&self.form)?;
        let id = submission.id;

        let service = Arc::clone(&self.service);
        let tx = self.result_tx.clone();
        let handle = tokio::spawn(async move {
            let result = service.submit(submission.request).await;
            if tx
                .send(SubmissionResult {
                    submission: id,
                    result,
                })
                .await
                .is_err()
            {
                debug!("Result channel closed before submission #{id} finished");
            }
        });
        self.current_task = Some(handle);
        Ok(id)
    }

    /// Feed a finished submission into the view. Returns whether it was
    /// accepted (i.e. not stale).
    pub fn handle_result(&mut self, result: SubmissionResult) -> bool {
        let accepted = self.view.complete(result.submission, result.result);
        if accepted {
            self.current_task = None;
        }
        accepted
    }

    /// Abort the in-flight submission task, if any.
    pub fn cancel_task(&mut self) {
        if let Some(handle) = self.current_task.take() {
            handle.abort();
            info!("Cancelled in-flight plan request");
        }
    }
}

/// Shown when the account service did not confirm a logout.
const LOGOUT_FAILED_NOTICE: &str = "Logout failed, you are still signed in";

fn missing_fields_notice(fields: &[FormField]) -> String {
    let names: Vec<&str> = fields.iter().map(|f| f.label()).collect();
    format!("Please fill in: {}", names.join(", "))
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on the TUI command channel, the submission result channel and
/// the startup session check with `tokio::select!`, pushing UI updates
/// through `ui_tx`. Returns when the TUI sends `Quit` or drops its command
/// sender.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut result_rx: mpsc::Receiver<SubmissionResult>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    let _ = ui_tx
        .send(UiUpdate::Snapshot(Box::new(state.build_snapshot())))
        .await;

    // AppState holds a sender, so this channel only closes if the state is
    // torn down; guard anyway so select! never spins on a closed receiver.
    let mut results_open = true;

    // The account service may be slow; the form is usable meanwhile.
    let mut session_check = state.session.spawn_check();

    loop {
        tokio::select! {
            // --- Startup session check ---
            Some(joined) = OptionFuture::from(session_check.as_mut()), if session_check.is_some() => {
                session_check = None;
                let user = joined.unwrap_or_else(|e| {
                    warn!("Session check task failed: {e}");
                    None
                });
                apply_session_check(&mut state, user, &ui_tx).await;
            }

            // --- Submission results ---
            result = result_rx.recv(), if results_open => {
                match result {
                    Some(result) => {
                        if state.handle_result(result) {
                            let _ = ui_tx
                                .send(UiUpdate::PhaseChanged(Box::new(state.view.phase().clone())))
                                .await;
                        }
                    }
                    None => {
                        info!("Result channel closed");
                        results_open = false;
                    }
                }
            }

            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    if let Some(check) = session_check.take() {
        check.abort();
    }
    state.cancel_task();
    info!("Application event loop exiting");
    Ok(())
}

/// Handle a user command from the TUI.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::Edit(edit) => {
            // The TUI applies edits to its own copy as they are typed, so an
            // accepted edit needs no echo. A refused one does.
            if !state.view.phase().shows_form() {
                debug!("Ignoring form edit in phase {}", state.view.phase().name());
                let _ = ui_tx
                    .send(UiUpdate::FormChanged(Box::new(state.form.clone())))
                    .await;
                return;
            }
            state.form.apply(edit);
        }
        UserCommand::Submit => match state.submit() {
            Ok(_) => {
                if state.notice.take().is_some() {
                    let _ = ui_tx.send(UiUpdate::Notice(None)).await;
                }
                let _ = ui_tx
                    .send(UiUpdate::PhaseChanged(Box::new(state.view.phase().clone())))
                    .await;
            }
            Err(SubmitRejected::Incomplete(FormError::MissingFields(fields))) => {
                info!("Submit refused, {} required field(s) missing", fields.len());
                let notice = missing_fields_notice(&fields);
                state.notice = Some(notice.clone());
                let _ = ui_tx.send(UiUpdate::Notice(Some(notice))).await;
            }
            Err(e) => {
                debug!("Submit ignored: {e}");
            }
        },
        UserCommand::SelectSection(key) => {
            if state.view.select_section(key) {
                send_phase(state, ui_tx).await;
            }
        }
        UserCommand::NextSection => {
            if state.view.next_section() {
                send_phase(state, ui_tx).await;
            }
        }
        UserCommand::PrevSection => {
            if state.view.prev_section() {
                send_phase(state, ui_tx).await;
            }
        }
        UserCommand::ModifyPlan => {
            if state.view.modify_plan() {
                send_phase(state, ui_tx).await;
            }
        }
        UserCommand::Logout => {
            if !state.session.is_present() {
                debug!("Logout requested without a session");
                return;
            }
            if state.session.teardown().await {
                let _ = ui_tx.send(UiUpdate::SessionChanged(None)).await;
            } else {
                let notice = LOGOUT_FAILED_NOTICE.to_string();
                state.notice = Some(notice.clone());
                let _ = ui_tx.send(UiUpdate::Notice(Some(notice))).await;
            }
        }
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

async fn apply_session_check(
    state: &mut AppState,
    user: Option<SessionUser>,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    state.session.apply_check(user);
    let _ = ui_tx
        .send(UiUpdate::SessionChanged(state.session_user()))
        .await;
}

async fn send_phase(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let _ = ui_tx
        .send(UiUpdate::PhaseChanged(Box::new(state.view.phase().clone())))
        .await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
