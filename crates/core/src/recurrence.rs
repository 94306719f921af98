//! Recurrence rules and catch-up expansion.
//!
//! A recurring pattern owns an anchor timestamp and a frequency. Expansion
//! walks a cursor forward from the latest existing occurrence (or the anchor
//! when none exist) one period at a time and emits every occurrence that has
//! become due, bounded one day into the future.
//!
//! Everything here is pure. The repository layer supplies the pattern, what it
//! knows about the latest stored occurrence, and the current instant; it then
//! persists whatever [`expand`] returns as a single batch.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Window constants
// ---------------------------------------------------------------------------

/// An occurrence whose deadline lies less than this many hours in the past
/// is still current; catch-up does not move past it yet.
pub const GRACE_WINDOW_HOURS: i64 = 12;

/// Catch-up never emits an occurrence more than this many days after `now`.
pub const LOOKAHEAD_DAYS: i64 = 1;

/// Length of a "monthly" period.
///
/// This is a fixed 30-day offset, not calendar-month arithmetic: a pattern
/// anchored on the 31st drifts through the calendar over time.
pub const MONTHLY_PERIOD_DAYS: i64 = 30;

/// Request value meaning "this goal does not repeat".
pub const FREQUENCY_NONE: &str = "none";

// ---------------------------------------------------------------------------
// Frequency
// ---------------------------------------------------------------------------

/// How often a pattern produces an occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub const ALL: [Frequency; 3] = [Frequency::Daily, Frequency::Weekly, Frequency::Monthly];

    /// Value stored in the `recurring_patterns.frequency` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        }
    }

    /// Fixed offset between two consecutive occurrences.
    pub fn period(self) -> Duration {
        match self {
            Frequency::Daily => Duration::days(1),
            Frequency::Weekly => Duration::weeks(1),
            Frequency::Monthly => Duration::days(MONTHLY_PERIOD_DAYS),
        }
    }

    /// Move `instant` forward by exactly one period.
    pub fn advance(self, instant: Timestamp) -> Timestamp {
        instant + self.period()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Frequency::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid frequency '{s}'. Must be one of: {}, {}",
                    FREQUENCY_NONE,
                    Frequency::ALL.map(Frequency::as_str).join(", ")
                ))
            })
    }
}

/// Parse the `frequency` field of a goal-creation request.
///
/// Absent, empty, or `"none"` means a standalone goal. Anything else must be a
/// known frequency; unknown values are rejected here so no pattern with an
/// unusable frequency is ever stored.
pub fn parse_requested_frequency(raw: Option<&str>) -> Result<Option<Frequency>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(FREQUENCY_NONE) => Ok(None),
        Some(other) => other.parse().map(Some),
    }
}

// ---------------------------------------------------------------------------
// Expansion inputs and outputs
// ---------------------------------------------------------------------------

/// The parts of a stored pattern that drive generation.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternRule {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub frequency: Frequency,
    /// Start of the sequence. Its time of day is reused for every occurrence.
    pub anchor: Timestamp,
    pub category_id: Option<DbId>,
}

/// What the store knows about the most recent live occurrence of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatestOccurrence {
    /// No live occurrence exists (never generated, or all deleted).
    Missing,
    /// The latest occurrence has no deadline, so there is no cursor.
    Undated,
    /// The latest occurrence is due at this instant.
    Dated(Timestamp),
}

impl From<Option<Option<Timestamp>>> for LatestOccurrence {
    /// Outer `None` = no row found, inner `None` = row without a deadline.
    fn from(row: Option<Option<Timestamp>>) -> Self {
        match row {
            None => LatestOccurrence::Missing,
            Some(None) => LatestOccurrence::Undated,
            Some(Some(deadline)) => LatestOccurrence::Dated(deadline),
        }
    }
}

/// A goal occurrence ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOccurrence {
    pub pattern_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub deadline: Timestamp,
}

// ---------------------------------------------------------------------------
// Expansion
// ---------------------------------------------------------------------------

/// Starting point of the next catch-up pass.
///
/// Returns `None` when the latest occurrence is undated; the pattern is then
/// skipped for this cycle.
pub fn next_cursor(anchor: Timestamp, latest: LatestOccurrence) -> Option<Timestamp> {
    match latest {
        LatestOccurrence::Missing => Some(anchor),
        LatestOccurrence::Undated => None,
        LatestOccurrence::Dated(deadline) => Some(deadline),
    }
}

/// Combine the calendar date of `day` with the time of day of `anchor`.
pub fn align_to_anchor(day: Timestamp, anchor: Timestamp) -> Timestamp {
    day.date_naive().and_time(anchor.time()).and_utc()
}

/// Deadlines that have become due after `cursor`, in increasing order.
///
/// The cursor advances one period per iteration while it is older than the
/// grace window, and the walk stops as soon as an occurrence would land more
/// than [`LOOKAHEAD_DAYS`] after `now`.
pub fn due_deadlines(
    frequency: Frequency,
    anchor: Timestamp,
    cursor: Timestamp,
    now: Timestamp,
) -> Vec<Timestamp> {
    let grace_floor = now - Duration::hours(GRACE_WINDOW_HOURS);
    let ceiling = now + Duration::days(LOOKAHEAD_DAYS);

    let mut cursor = cursor;
    let mut deadlines = Vec::new();

    while cursor < grace_floor {
        cursor = frequency.advance(cursor);
        if cursor > ceiling {
            break;
        }
        let deadline = align_to_anchor(cursor, anchor);
        // The anchor time can sit later in the day than the cursor after a
        // "future occurrences" edit; keep the lookahead bound on the result.
        if deadline > ceiling {
            break;
        }
        deadlines.push(deadline);
    }

    deadlines
}

/// Expand `pattern` into the occurrences that are due at `now`.
///
/// Running this twice against the same stored state and the same `now` yields
/// nothing the second time, because the caller re-reads the latest occurrence
/// (now the last one emitted here) before each pass.
pub fn expand(
    pattern: &PatternRule,
    latest: LatestOccurrence,
    now: Timestamp,
) -> Vec<NewOccurrence> {
    let Some(cursor) = next_cursor(pattern.anchor, latest) else {
        return Vec::new();
    };

    due_deadlines(pattern.frequency, pattern.anchor, cursor, now)
        .into_iter()
        .map(|deadline| NewOccurrence {
            pattern_id: pattern.id,
            title: pattern.title.clone(),
            description: pattern.description.clone(),
            category_id: pattern.category_id,
            deadline,
        })
        .collect()
}

/// Deadline of the occurrence that follows one completed at `deadline`.
pub fn next_occurrence_deadline(frequency: Frequency, deadline: Timestamp) -> Timestamp {
    frequency.advance(deadline)
}
