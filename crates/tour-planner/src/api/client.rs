// Planning service client.
//
// POSTs the trip request as JSON and classifies the reply. The backend has
// no response-type tag, so `classify_response` sniffs the body shape once
// here and hands the rest of the program a tagged `PlanOutcome`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::plan::sections::{PlanSections, SectionKey};
use crate::trip::request::TripRequest;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Shown when the service gives no usable reason.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate travel plan";

/// Shown when the reply cannot be turned into a plan or itinerary.
pub const UNREADABLE_PLAN_MESSAGE: &str = "Could not read itinerary";

// ---------------------------------------------------------------------------
// Outcome and error types
// ---------------------------------------------------------------------------

/// The two legitimate success shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    /// Flat object with all five section keys.
    Sections(PlanSections),
    /// Text payload holding an itinerary document, possibly fenced.
    RawItineraryText(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Network failure, or a non-2xx reply without a readable reason.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx reply carrying a message from the service.
    #[error("service returned {status}: {message}")]
    Application { status: u16, message: String },

    /// 2xx reply whose body is neither success shape, or whose itinerary
    /// text fails validation.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl RequestError {
    /// Text to put in front of the traveler. Diagnostics stay in the log.
    pub fn user_message(&self) -> String {
        match self {
            RequestError::Transport(_) => GENERIC_FAILURE_MESSAGE.to_string(),
            RequestError::Application { message, .. } => message.clone(),
            RequestError::MalformedPayload(_) => UNREADABLE_PLAN_MESSAGE.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// PlanService
// ---------------------------------------------------------------------------

/// Anything that can turn a trip request into a plan outcome.
#[async_trait]
pub trait PlanService: Send + Sync {
    async fn submit(&self, request: TripRequest) -> Result<PlanOutcome, RequestError>;
}

/// HTTP implementation of [`PlanService`]. No retries, no caching.
pub struct PlanClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl PlanClient {
    pub fn new(endpoint: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(
            config.service.plan_url.clone(),
            config.service.request_timeout,
        )
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PlanService for PlanClient {
    async fn submit(&self, request: TripRequest) -> Result<PlanOutcome, RequestError> {
        info!(
            "Requesting plan: {} -> {} ({} to {})",
            request.source, request.destination, request.date_from, request.date_to
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| RequestError::Transport(format!("POST {} failed: {e}", self.endpoint)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RequestError::Transport(format!("failed to read response body: {e}")))?;
        debug!(status = status.as_u16(), bytes = body.len(), "plan response received");

        classify_response(status.as_u16(), &body)
    }
}

// ---------------------------------------------------------------------------
// Response classification
// ---------------------------------------------------------------------------

/// Decide which outcome a raw HTTP reply represents.
///
/// - non-2xx: `error` or `message` string from a JSON body becomes
///   `Application`; anything else is `Transport`
/// - JSON object with the five section keys: `Sections`
/// - JSON string, or a body that is not JSON at all: `RawItineraryText`
/// - any other JSON: `MalformedPayload`
pub fn classify_response(status: u16, body: &str) -> Result<PlanOutcome, RequestError> {
    if !(200..300).contains(&status) {
        return Err(error_from_body(status, body));
    }

    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        // A fenced itinerary is not JSON until unwrapped; let the parser judge.
        Err(_) => return Ok(PlanOutcome::RawItineraryText(body.to_string())),
    };

    match value {
        Value::String(text) => Ok(PlanOutcome::RawItineraryText(text)),
        Value::Object(map) => sections_from_object(&map).map(PlanOutcome::Sections),
        other => Err(RequestError::MalformedPayload(format!(
            "expected an object or string, got {}",
            json_kind(&other)
        ))),
    }
}

fn sections_from_object(map: &Map<String, Value>) -> Result<PlanSections, RequestError> {
    let section = |key: SectionKey| -> Result<String, RequestError> {
        match map.get(key.key()) {
            Some(Value::String(text)) => Ok(text.clone()),
            Some(other) => Err(RequestError::MalformedPayload(format!(
                "section `{}` should be a string, got {}",
                key.key(),
                json_kind(other)
            ))),
            None => Err(RequestError::MalformedPayload(format!(
                "missing section `{}`",
                key.key()
            ))),
        }
    };

    Ok(PlanSections {
        transportation: section(SectionKey::Transportation)?,
        accommodation: section(SectionKey::Accommodation)?,
        highlights: section(SectionKey::Highlights)?,
        itinerary: section(SectionKey::Itinerary)?,
        additional: section(SectionKey::Additional)?,
    })
}

/// Build the error for a non-2xx reply.
fn error_from_body(status: u16, body: &str) -> RequestError {
    let reason = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        ["error", "message"].iter().find_map(|key| {
            v.get(*key)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        })
    });

    match reason {
        Some(message) => RequestError::Application { status, message },
        None => RequestError::Transport(format!("service returned status {status}")),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
