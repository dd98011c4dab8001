// Structured day-by-day itinerary parsed from the service's text payload.
//
// The payload comes from a generative backend, so the shape is checked
// field by field rather than trusted. Any defect rejects the whole document;
// there is no partial itinerary.

use serde_json::{Map, Value};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Document types
// ---------------------------------------------------------------------------

/// One scheduled window within a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Free-text time label (e.g. "09:00", "Morning"); not parsed as a time.
    pub time: String,
    pub location: String,
    pub duration: String,
    pub activities: Vec<String>,
    /// Alternatives the traveler can swap in; often empty.
    pub alternative: Vec<String>,
}

/// A calendar day and its blocks in schedule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    pub date: String,
    pub blocks: Vec<Block>,
}

/// The full itinerary. Day order is display order. Read-only once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItineraryDocument {
    pub days: Vec<Day>,
}

impl ItineraryDocument {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Total number of blocks across all days.
    pub fn block_count(&self) -> usize {
        self.days.iter().map(|d| d.blocks.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ParseError {
    /// The text is not JSON at all.
    #[error("itinerary is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    /// Valid JSON, but a required key is absent.
    #[error("itinerary is missing field `{path}`")]
    MissingField { path: String },

    /// Valid JSON, but a value has the wrong shape.
    #[error("itinerary field `{path}` should be {expected}")]
    WrongType { path: String, expected: &'static str },
}

impl ParseError {
    /// True when the text could not be read as JSON, as opposed to JSON
    /// with the wrong structure.
    pub fn is_syntax(&self) -> bool {
        matches!(self, ParseError::Syntax(_))
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse and validate an itinerary document.
///
/// Expected shape:
/// `{ "days": [ { "date": "...", "blocks": [ { "time", "location", "duration",
/// "activities": [..], "alternative": [..] } ] } ] }`
pub fn parse(text: &str) -> Result<ItineraryDocument, ParseError> {
    let root: Value = serde_json::from_str(text)?;
    let root = as_object(&root, "(root)")?;

    let days = required_array(root, "", "days")?
        .iter()
        .enumerate()
        .map(|(i, day)| parse_day(day, &format!("days[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ItineraryDocument { days })
}

fn parse_day(value: &Value, path: &str) -> Result<Day, ParseError> {
    let obj = as_object(value, path)?;
    let date = required_string(obj, path, "date")?;
    let blocks = required_array(obj, path, "blocks")?
        .iter()
        .enumerate()
        .map(|(i, block)| parse_block(block, &format!("{path}.blocks[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Day { date, blocks })
}

fn parse_block(value: &Value, path: &str) -> Result<Block, ParseError> {
    let obj = as_object(value, path)?;
    Ok(Block {
        time: required_string(obj, path, "time")?,
        location: required_string(obj, path, "location")?,
        duration: required_string(obj, path, "duration")?,
        activities: required_string_list(obj, path, "activities")?,
        alternative: required_string_list(obj, path, "alternative")?,
    })
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, ParseError> {
    value.as_object().ok_or_else(|| ParseError::WrongType {
        path: path.to_string(),
        expected: "an object",
    })
}

fn required<'a>(obj: &'a Map<String, Value>, parent: &str, key: &str) -> Result<&'a Value, ParseError> {
    obj.get(key).ok_or_else(|| ParseError::MissingField {
        path: join(parent, key),
    })
}

fn required_string(obj: &Map<String, Value>, parent: &str, key: &str) -> Result<String, ParseError> {
    required(obj, parent, key)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ParseError::WrongType {
            path: join(parent, key),
            expected: "a string",
        })
}

fn required_array<'a>(
    obj: &'a Map<String, Value>,
    parent: &str,
    key: &str,
) -> Result<&'a Vec<Value>, ParseError> {
    required(obj, parent, key)?
        .as_array()
        .ok_or_else(|| ParseError::WrongType {
            path: join(parent, key),
            expected: "an array",
        })
}

fn required_string_list(
    obj: &Map<String, Value>,
    parent: &str,
    key: &str,
) -> Result<Vec<String>, ParseError> {
    let path = join(parent, key);
    required_array(obj, parent, key)?
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| ParseError::WrongType {
                    path: format!("{path}[{i}]"),
                    expected: "a string",
                })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
