// Integration tests for the tour planner.
//
// These exercise the library's public API end to end: form -> view state
// machine -> planning service, both through a stub service driven by the
// app loop and through the real HTTP client against a local one-shot
// server.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Url;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use tour_planner::api::client::{
    PlanClient, PlanOutcome, PlanService, RequestError, GENERIC_FAILURE_MESSAGE,
    UNREADABLE_PLAN_MESSAGE,
};
use tour_planner::api::session::SessionStore;
use tour_planner::app::{self, AppState};
use tour_planner::plan::sections::{PlanSections, SectionKey};
use tour_planner::protocol::{UiUpdate, UserCommand};
use tour_planner::trip::form::{FormEdit, TripForm};
use tour_planner::trip::request::{
    DietaryTag, GroupType, HotelPreference, LocationTag, TravelMode, TripRequest,
};
use tour_planner::view::{PlanView, ViewPhase};

// ===========================================================================
// Test helpers
// ===========================================================================

fn filled_form() -> TripForm {
    let mut form = TripForm::new();
    form.set_source("Delhi");
    form.set_destination("Jaipur");
    form.set_date_from(NaiveDate::from_ymd_opt(2025, 11, 20));
    form.set_date_to(NaiveDate::from_ymd_opt(2025, 11, 23));
    form.set_travel_mode(Some(TravelMode::Car));
    form.set_hotel_preference(Some(HotelPreference::Premium));
    form.set_group_type(Some(GroupType::Friends));
    form.toggle_location(LocationTag::HistoricalSites);
    form.toggle_dietary(DietaryTag::Vegetarian);
    form.set_budget(80_000);
    form
}

fn five_sections() -> PlanSections {
    PlanSections {
        transportation: "Drive via NH48".into(),
        accommodation: "Haveli stay in the old city".into(),
        highlights: "Amber Fort\nHawa Mahal".into(),
        itinerary: "Day 1: forts\nDay 2: bazaars".into(),
        additional: "Book monument tickets online".into(),
    }
}

struct StubService(Result<PlanOutcome, RequestError>);

#[async_trait]
impl PlanService for StubService {
    async fn submit(&self, _request: TripRequest) -> Result<PlanOutcome, RequestError> {
        self.0.clone()
    }
}

/// Serve exactly one HTTP response with the given status line and body.
async fn one_shot_server(status_line: &'static str, body: String) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        // Read until the request body has arrived (headers + JSON body).
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let len = text[..head_end]
                    .to_lowercase()
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:").map(|v| v.trim().to_string()))
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + len {
                    break;
                }
            }
        }
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;
    });
    Url::parse(&format!("http://{addr}/api/generate-plan")).unwrap()
}

/// Submit `filled_form()` through the real client against a server that
/// answers with `status_line` and `body`, and return the resulting phase.
async fn phase_after_http(status_line: &'static str, body: String) -> ViewPhase {
    let url = one_shot_server(status_line, body).await;
    let client = PlanClient::new(url, Some(Duration::from_secs(10))).unwrap();

    let mut view = PlanView::new();
    let submission = view.begin_submit(&filled_form()).unwrap();
    let result = client.submit(submission.request).await;
    assert!(view.complete(submission.id, result));
    view.phase().clone()
}

async fn recv_phase(ui_rx: &mut mpsc::Receiver<UiUpdate>) -> ViewPhase {
    loop {
        let update = tokio::time::timeout(Duration::from_secs(5), ui_rx.recv())
            .await
            .expect("timed out waiting for UI update")
            .expect("UI channel closed");
        if let UiUpdate::PhaseChanged(phase) = update {
            return *phase;
        }
    }
}

// ===========================================================================
// Full flow through the app loop
// ===========================================================================

#[tokio::test]
async fn flat_plan_flow_through_app_loop() {
    let service = Arc::new(StubService(Ok(PlanOutcome::Sections(five_sections()))));
    let (result_tx, result_rx) = mpsc::channel(16);
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (ui_tx, mut ui_rx) = mpsc::channel(64);
    let state = AppState::new(service, SessionStore::Disabled, result_tx);
    let handle = tokio::spawn(app::run(cmd_rx, result_rx, ui_tx, state));

    let form = filled_form();
    for edit in [
        FormEdit::Source(form.source().into()),
        FormEdit::Destination(form.destination().into()),
        FormEdit::DateFrom(form.date_from()),
        FormEdit::DateTo(form.date_to()),
        FormEdit::TravelMode(form.travel_mode()),
        FormEdit::HotelPreference(form.hotel_preference()),
        FormEdit::GroupType(form.group_type()),
    ] {
        cmd_tx.send(UserCommand::Edit(edit)).await.unwrap();
    }
    cmd_tx.send(UserCommand::Submit).await.unwrap();

    assert_eq!(recv_phase(&mut ui_rx).await, ViewPhase::Submitting);
    assert_eq!(
        recv_phase(&mut ui_rx).await,
        ViewPhase::PlanReady {
            sections: five_sections(),
            active: SectionKey::Transportation,
        }
    );

    cmd_tx
        .send(UserCommand::SelectSection(SectionKey::Itinerary))
        .await
        .unwrap();
    match recv_phase(&mut ui_rx).await {
        ViewPhase::PlanReady { sections, active } => {
            assert_eq!(active, SectionKey::Itinerary);
            assert_eq!(sections, five_sections());
            assert_eq!(
                sections.paragraphs(active),
                vec!["Day 1: forts", "Day 2: bazaars"]
            );
        }
        other => panic!("expected PlanReady, got {other:?}"),
    }

    // Modify plan returns to the form; a second submit goes out again.
    cmd_tx.send(UserCommand::ModifyPlan).await.unwrap();
    assert_eq!(recv_phase(&mut ui_rx).await, ViewPhase::Idle);
    cmd_tx.send(UserCommand::Submit).await.unwrap();
    assert_eq!(recv_phase(&mut ui_rx).await, ViewPhase::Submitting);
    assert!(matches!(
        recv_phase(&mut ui_rx).await,
        ViewPhase::PlanReady { .. }
    ));

    cmd_tx.send(UserCommand::Quit).await.unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn itinerary_text_flow_through_app_loop() {
    let raw = "```json\n{\"days\":[{\"date\":\"2025-11-20\",\"blocks\":[{\"time\":\"10:00\",\
               \"location\":\"City Palace\",\"duration\":\"2 hours\",\
               \"activities\":[\"Museum\"],\"alternative\":[]}]}]}\n```";
    let service = Arc::new(StubService(Ok(PlanOutcome::RawItineraryText(raw.into()))));
    let (result_tx, result_rx) = mpsc::channel(16);
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (ui_tx, mut ui_rx) = mpsc::channel(64);
    let mut state = AppState::new(service, SessionStore::Disabled, result_tx);
    state.form = filled_form();
    let handle = tokio::spawn(app::run(cmd_rx, result_rx, ui_tx, state));

    cmd_tx.send(UserCommand::Submit).await.unwrap();
    assert_eq!(recv_phase(&mut ui_rx).await, ViewPhase::Submitting);
    match recv_phase(&mut ui_rx).await {
        ViewPhase::ItineraryReady { itinerary } => {
            assert_eq!(itinerary.days.len(), 1);
            assert_eq!(itinerary.days[0].blocks[0].location, "City Palace");
            assert!(itinerary.days[0].blocks[0].alternative.is_empty());
        }
        other => panic!("expected ItineraryReady, got {other:?}"),
    }

    cmd_tx.send(UserCommand::Quit).await.unwrap();
    handle.await.unwrap().unwrap();
}

// ===========================================================================
// Real HTTP client against a local server
// ===========================================================================

#[tokio::test]
async fn http_five_sections_lead_to_plan_ready() {
    let body = serde_json::to_string(&five_sections()).unwrap();
    assert_eq!(
        phase_after_http("200 OK", body).await,
        ViewPhase::PlanReady {
            sections: five_sections(),
            active: SectionKey::Transportation,
        }
    );
}

#[tokio::test]
async fn http_application_error_is_shown_verbatim() {
    let phase = phase_after_http("400 Bad Request", r#"{"error":"Budget too low"}"#.into()).await;
    assert_eq!(
        phase,
        ViewPhase::Failed {
            message: "Budget too low".into()
        }
    );
}

#[tokio::test]
async fn http_unreadable_error_is_generic() {
    let phase = phase_after_http("500 Internal Server Error", "oops".into()).await;
    assert_eq!(
        phase,
        ViewPhase::Failed {
            message: GENERIC_FAILURE_MESSAGE.into()
        }
    );
}

#[tokio::test]
async fn http_fenced_empty_itinerary_string() {
    let body = serde_json::to_string("```json\n{\"days\":[]}\n```").unwrap();
    match phase_after_http("200 OK", body).await {
        ViewPhase::ItineraryReady { itinerary } => assert!(itinerary.days.is_empty()),
        other => panic!("expected ItineraryReady, got {other:?}"),
    }
}

#[tokio::test]
async fn http_bare_fenced_body_is_parsed() {
    let body = "```json\n{\"days\":[{\"date\":\"Day 1\",\"blocks\":[]}]}\n```".to_string();
    match phase_after_http("200 OK", body).await {
        ViewPhase::ItineraryReady { itinerary } => {
            assert_eq!(itinerary.days.len(), 1);
            assert_eq!(itinerary.days[0].date, "Day 1");
        }
        other => panic!("expected ItineraryReady, got {other:?}"),
    }
}

#[tokio::test]
async fn http_itinerary_missing_alternative_fails_whole_document() {
    let doc = r#"{"days":[{"date":"d","blocks":[{"time":"t","location":"l","duration":"1h","activities":[]}]}]}"#;
    let body = serde_json::to_string(doc).unwrap();
    assert_eq!(
        phase_after_http("200 OK", body).await,
        ViewPhase::Failed {
            message: UNREADABLE_PLAN_MESSAGE.into()
        }
    );
}

#[tokio::test]
async fn http_unrelated_json_is_malformed() {
    assert_eq!(
        phase_after_http("200 OK", "[1,2,3]".into()).await,
        ViewPhase::Failed {
            message: UNREADABLE_PLAN_MESSAGE.into()
        }
    );
}

#[tokio::test]
async fn unreachable_service_fails_with_generic_message() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let url = Url::parse(&format!("http://{addr}/api/generate-plan")).unwrap();
    let client = PlanClient::new(url, Some(Duration::from_secs(5))).unwrap();

    let mut view = PlanView::new();
    let submission = view.begin_submit(&filled_form()).unwrap();
    let result = client.submit(submission.request).await;
    assert!(matches!(result, Err(RequestError::Transport(_))));
    view.complete(submission.id, result);
    assert_eq!(
        view.phase(),
        &ViewPhase::Failed {
            message: GENERIC_FAILURE_MESSAGE.into()
        }
    );

    // The form is editable again and a retry enters Submitting.
    assert!(view.phase().shows_form());
    assert!(view.begin_submit(&filled_form()).is_ok());
}

// ===========================================================================
// Request payload
// ===========================================================================

#[test]
fn request_payload_matches_service_contract() {
    let request = filled_form().snapshot().unwrap();
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "source": "Delhi",
            "destination": "Jaipur",
            "dateFrom": "2025-11-20",
            "dateTo": "2025-11-23",
            "travelMode": "car",
            "hotelPreference": "premium",
            "locationPreference": ["Historical Sites"],
            "dietaryPreferences": ["Vegetarian"],
            "groupType": "friends",
            "budget": 80000,
            "specialRequirements": ""
        })
    );
}
