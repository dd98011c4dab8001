// Terminal UI: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the application state. The app
// loop pushes `UiUpdate` messages over an mpsc channel; the TUI applies them
// to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::cell::Cell;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::protocol::{AppSnapshot, UiUpdate, UserCommand};
use crate::trip::form::{FormField, TripForm};
use crate::view::ViewPhase;

use layout::{build_layout, AppLayout};

/// Date format typed into and shown by the date fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
///
/// The form copy is edited in place as keys are pressed and the same edits
/// are sent to the app; the app only answers with `FormChanged` when it
/// refused an edit.
pub struct ViewState {
    pub form: TripForm,
    pub phase: ViewPhase,
    pub notice: Option<String>,
    pub session_user: Option<String>,
    /// Form field with keyboard focus.
    pub focus: FormField,
    /// Highlighted option in the location tag row.
    pub location_cursor: usize,
    /// Highlighted option in the dietary tag row.
    pub dietary_cursor: usize,
    /// Raw text of the date fields; only complete dates reach the form.
    pub date_from_text: String,
    pub date_to_text: String,
    /// Vertical scroll of the result panel.
    pub scroll: u16,
    /// Largest useful `scroll`, recorded by the last render of a result.
    pub scroll_limit: Cell<u16>,
    pub confirm_quit: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            form: TripForm::new(),
            phase: ViewPhase::Idle,
            notice: None,
            session_user: None,
            focus: FormField::Source,
            location_cursor: 0,
            dietary_cursor: 0,
            date_from_text: String::new(),
            date_to_text: String::new(),
            scroll: 0,
            scroll_limit: Cell::new(0),
            confirm_quit: false,
        }
    }
}

impl ViewState {
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        self.set_form(snapshot.form);
        self.set_phase(snapshot.phase);
        self.notice = snapshot.notice;
        self.session_user = snapshot.session_user;
    }

    /// Replace the form copy and re-derive the date text from it.
    fn set_form(&mut self, form: TripForm) {
        self.date_from_text = format_date(form.date_from());
        self.date_to_text = format_date(form.date_to());
        self.form = form;
    }

    /// Scroll resets whenever a different result or tab is shown.
    fn set_phase(&mut self, phase: ViewPhase) {
        let same_view = match (&self.phase, &phase) {
            (ViewPhase::PlanReady { active: a, .. }, ViewPhase::PlanReady { active: b, .. }) => {
                a == b
            }
            (old, new) => old.name() == new.name(),
        };
        if !same_view {
            self.scroll = 0;
        }
        self.phase = phase;
    }
}

fn format_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => state.apply_snapshot(*snapshot),
        UiUpdate::FormChanged(form) => state.set_form(*form),
        UiUpdate::PhaseChanged(phase) => state.set_phase(*phase),
        UiUpdate::Notice(notice) => state.notice = notice,
        UiUpdate::SessionChanged(user) => state.session_user = user,
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    render_main_panel(frame, &layout, state);
    render_notice(frame, &layout, state);
    render_help_bar(frame, &layout, state);

    if state.confirm_quit {
        widgets::quit_confirm::render(
            frame,
            frame.area(),
            state.phase == ViewPhase::Submitting,
        );
    }
}

fn render_main_panel(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    match &state.phase {
        ViewPhase::Idle | ViewPhase::Submitting | ViewPhase::Failed { .. } => {
            widgets::form::render(frame, layout.main_panel, state);
        }
        ViewPhase::PlanReady { sections, active } => {
            let limit = widgets::plan_sections::render(
                frame,
                layout.main_panel,
                sections,
                *active,
                state.scroll,
            );
            state.scroll_limit.set(limit);
        }
        ViewPhase::ItineraryReady { itinerary } => {
            let limit =
                widgets::itinerary::render(frame, layout.main_panel, itinerary, state.scroll);
            state.scroll_limit.set(limit);
        }
    }
}

/// Failure messages take the notice row over validation notices.
fn render_notice(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let line = match (&state.phase, &state.notice) {
        (ViewPhase::Failed { message }, _) => Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        (_, Some(notice)) => Line::from(Span::styled(
            format!(" {notice}"),
            Style::default().fg(Color::Yellow),
        )),
        _ => Line::raw(""),
    };
    frame.render_widget(Paragraph::new(line), layout.notice);
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        help_text(&state.phase),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

pub fn help_text(phase: &ViewPhase) -> &'static str {
    match phase {
        ViewPhase::Idle | ViewPhase::Failed { .. } => {
            " Tab/Up/Down:Field | Left/Right:Change | Space:Toggle | Enter:Generate plan | Ctrl+L:Logout | Esc:Quit"
        }
        ViewPhase::Submitting => " Generating plan... | Esc:Quit",
        ViewPhase::PlanReady { .. } => {
            " 1-5/Left/Right:Section | j/k:Scroll | m:Modify plan | Ctrl+L:Logout | q:Quit"
        }
        ViewPhase::ItineraryReady { .. } => {
            " j/k:Scroll | m:Modify plan | Ctrl+L:Logout | q:Quit"
        }
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook that restores the terminal.
/// 3. Selects over UI updates, keyboard input and render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // App loop is gone.
                    None => break,
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
