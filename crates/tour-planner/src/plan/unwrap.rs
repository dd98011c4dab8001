// Strip the documentation-style code fence the planning backend sometimes
// wraps around its JSON itinerary.

const OPEN_FENCE: &str = "```json";
const CLOSE_FENCE: &str = "```";

/// Return `raw` trimmed, with a leading "```json" marker and a trailing
/// "```" marker removed when the text starts with the opening marker.
///
/// Text that does not start with the exact (case-sensitive) opening marker
/// is returned trimmed and otherwise untouched. Never fails.
pub fn unwrap(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(body) = trimmed.strip_prefix(OPEN_FENCE) else {
        return trimmed.to_string();
    };
    let body = body.strip_suffix(CLOSE_FENCE).unwrap_or(body);
    body.trim().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
