//! Goal input rules: titles, deadlines, and the edit scope of recurring goals.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::recurrence::Frequency;
use crate::timezone::{local_day, localize};
use crate::types::Timestamp;

/// Maximum goal (and pattern) title length, in characters.
pub const MAX_TITLE_LEN: usize = 100;

/// Form-style deadline format accepted alongside RFC 3339.
const LOCAL_DEADLINE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// How far an edit to a generated goal reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// Only this occurrence.
    #[default]
    This,
    /// This occurrence and the pattern that generates later ones.
    Future,
}

/// Trim a title and enforce presence and length.
pub fn normalize_title(raw: &str) -> Result<String, CoreError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(CoreError::Validation("Title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(title.to_string())
}

/// Parse a deadline given either as RFC 3339 or as `YYYY-MM-DDTHH:MM`.
///
/// The offset-less form is wall-clock time in the user's zone `tz`.
pub fn parse_deadline(raw: &str, tz: Tz) -> Result<Timestamp, CoreError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, LOCAL_DEADLINE_FORMAT)
        .map_err(|_| CoreError::Validation(format!("Invalid deadline '{raw}'")))?;
    localize(naive, tz)
}

/// A recurring goal anchors its pattern on the deadline, so it must have one.
pub fn validate_recurrence(frequency: Option<Frequency>, deadline: Option<Timestamp>) -> Result<(), CoreError> {
    match (frequency, deadline) {
        (Some(freq), None) => Err(CoreError::Validation(format!(
            "A {freq} goal requires a deadline"
        ))),
        _ => Ok(()),
    }
}

/// Reject deadlines on a calendar day before today, both read in `tz`.
/// Earlier today is allowed.
pub fn validate_deadline_not_past_day(
    deadline: Timestamp,
    now: Timestamp,
    tz: Tz,
) -> Result<(), CoreError> {
    if local_day(deadline, tz) < local_day(now, tz) {
        return Err(CoreError::Validation(
            "Deadline cannot be in a past day".to_string(),
        ));
    }
    Ok(())
}
