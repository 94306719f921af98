//! Goal status state machine.
//!
//! ```text
//! pending --advance--> in_progress --advance--> completed --advance--> archived
//!    ^                     |
//!    +-------reset---------+
//! ```
//!
//! Every (status, action) pair not drawn above is a no-op. Overdue is not a
//! status: it is derived from `pending` plus a past deadline on every read.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Stored goal status. Discriminants match the `goal_statuses` seed rows.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Pending = 1,
    InProgress = 2,
    Completed = 3,
    Archived = 4,
}

impl GoalStatus {
    pub const ALL: [GoalStatus; 4] = [
        GoalStatus::Pending,
        GoalStatus::InProgress,
        GoalStatus::Completed,
        GoalStatus::Archived,
    ];

    /// Return the database status ID.
    pub fn id(self) -> i16 {
        self as i16
    }

    /// Map a database status ID back to a variant.
    pub fn from_id(id: i16) -> Option<Self> {
        GoalStatus::ALL.into_iter().find(|s| s.id() == id)
    }

    /// Machine name used in query strings and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            GoalStatus::Pending => "pending",
            GoalStatus::InProgress => "in_progress",
            GoalStatus::Completed => "completed",
            GoalStatus::Archived => "archived",
        }
    }

    /// Human-readable label ("In Progress").
    pub fn label(self) -> &'static str {
        match self {
            GoalStatus::Pending => "Pending",
            GoalStatus::InProgress => "In Progress",
            GoalStatus::Completed => "Completed",
            GoalStatus::Archived => "Archived",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GoalStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown goal status '{s}'")))
    }
}

/// A user-initiated status action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalAction {
    Advance,
    Reset,
}

/// Effect of a transition on one of the goal's timestamp columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampChange {
    Unchanged,
    Set(Timestamp),
    Cleared,
}

impl TimestampChange {
    /// Resulting column value given the current one.
    pub fn apply(self, current: Option<Timestamp>) -> Option<Timestamp> {
        match self {
            TimestampChange::Unchanged => current,
            TimestampChange::Set(at) => Some(at),
            TimestampChange::Cleared => None,
        }
    }
}

/// A valid transition together with its side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: GoalStatus,
    pub to: GoalStatus,
    pub start_time: TimestampChange,
    pub end_time: TimestampChange,
    /// Set on completion: a goal that belongs to a pattern gets its next
    /// occurrence created alongside this transition.
    pub spawns_next_occurrence: bool,
}

/// Resolve `action` applied to a goal in `from` at instant `now`.
///
/// Returns `None` for every pair that is not a defined transition; callers
/// treat that as a no-op rather than an error.
pub fn transition(from: GoalStatus, action: GoalAction, now: Timestamp) -> Option<Transition> {
    let (to, start_time, end_time) = match (from, action) {
        (GoalStatus::Pending, GoalAction::Advance) => (
            GoalStatus::InProgress,
            TimestampChange::Set(now),
            TimestampChange::Unchanged,
        ),
        (GoalStatus::InProgress, GoalAction::Advance) => (
            GoalStatus::Completed,
            TimestampChange::Unchanged,
            TimestampChange::Set(now),
        ),
        (GoalStatus::Completed, GoalAction::Advance) => (
            GoalStatus::Archived,
            TimestampChange::Unchanged,
            TimestampChange::Unchanged,
        ),
        (GoalStatus::InProgress, GoalAction::Reset) => (
            GoalStatus::Pending,
            TimestampChange::Cleared,
            TimestampChange::Unchanged,
        ),
        (GoalStatus::Archived, GoalAction::Advance)
        | (GoalStatus::Pending, GoalAction::Reset)
        | (GoalStatus::Completed, GoalAction::Reset)
        | (GoalStatus::Archived, GoalAction::Reset) => return None,
    };

    Some(Transition {
        from,
        to,
        start_time,
        end_time,
        spawns_next_occurrence: to == GoalStatus::Completed,
    })
}

// ---------------------------------------------------------------------------
// Derived presentation status
// ---------------------------------------------------------------------------

/// Status as presented to the user, including the derived `overdue` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Pending,
    Overdue,
    InProgress,
    Completed,
    Archived,
}

/// A pending goal whose deadline is strictly before `now`.
pub fn is_overdue(status: GoalStatus, deadline: Option<Timestamp>, now: Timestamp) -> bool {
    status == GoalStatus::Pending && deadline.is_some_and(|d| d < now)
}

pub fn display_status(
    status: GoalStatus,
    deadline: Option<Timestamp>,
    now: Timestamp,
) -> DisplayStatus {
    if is_overdue(status, deadline, now) {
        return DisplayStatus::Overdue;
    }
    match status {
        GoalStatus::Pending => DisplayStatus::Pending,
        GoalStatus::InProgress => DisplayStatus::InProgress,
        GoalStatus::Completed => DisplayStatus::Completed,
        GoalStatus::Archived => DisplayStatus::Archived,
    }
}
