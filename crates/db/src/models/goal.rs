//! Goal model, list projections, and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use waypoint_core::lifecycle::{display_status, DisplayStatus, GoalStatus};
use waypoint_core::listing::{Schedulable, SortKey, StatusFilter};
use waypoint_core::types::{DbId, Timestamp};

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

/// A row from the `goals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Goal {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status_id: StatusId,
    pub deadline: Option<Timestamp>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub category_id: Option<DbId>,
    pub pattern_id: Option<DbId>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Goal {
    /// Decoded status. The foreign key to `goal_statuses` keeps IDs in range.
    pub fn status(&self) -> GoalStatus {
        GoalStatus::from_id(self.status_id).unwrap_or(GoalStatus::Pending)
    }

    pub fn is_recurring(&self) -> bool {
        self.pattern_id.is_some()
    }
}

/// A goal joined with its category name, as listed on the dashboard and calendar.
#[derive(Debug, Clone, FromRow)]
pub struct GoalListRow {
    #[sqlx(flatten)]
    pub goal: Goal,
    pub category_name: Option<String>,
}

impl Schedulable for GoalListRow {
    fn status(&self) -> GoalStatus {
        self.goal.status()
    }

    fn deadline(&self) -> Option<Timestamp> {
        self.goal.deadline
    }

    fn created_at(&self) -> Timestamp {
        self.goal.created_at
    }
}

/// Goal as rendered to clients: the row plus derived fields.
#[derive(Debug, Clone, Serialize)]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: Goal,
    pub status: GoalStatus,
    pub display_status: DisplayStatus,
    pub category_name: Option<String>,
    pub is_recurring: bool,
}

impl GoalView {
    pub fn new(goal: Goal, category_name: Option<String>, now: Timestamp) -> Self {
        let status = goal.status();
        Self {
            display_status: display_status(status, goal.deadline, now),
            is_recurring: goal.is_recurring(),
            status,
            category_name,
            goal,
        }
    }

    pub fn from_row(row: GoalListRow, now: Timestamp) -> Self {
        Self::new(row.goal, row.category_name, now)
    }
}

/// DTO for inserting a goal created directly by the user.
#[derive(Debug, Clone)]
pub struct CreateGoal {
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<Timestamp>,
    pub category_id: Option<DbId>,
}

/// DTO for editing a goal. Every field is written; `None` clears the column.
#[derive(Debug, Clone)]
pub struct UpdateGoal {
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<Timestamp>,
    pub category_id: Option<DbId>,
}

/// Dashboard list filter.
#[derive(Debug, Clone, Default)]
pub struct DashboardFilter {
    pub category_id: Option<DbId>,
    pub status: Option<StatusFilter>,
    /// Pre-built `LIKE` pattern; matched case-sensitively against the title.
    pub search: Option<String>,
    pub sort: SortKey,
}

/// Calendar view filter. Archived goals are always excluded.
#[derive(Debug, Clone, Default)]
pub struct CalendarFilter {
    /// Only goals with a deadline in `[start, end)`: one calendar day in
    /// the user's zone.
    pub deadline_window: Option<(Timestamp, Timestamp)>,
    pub status: Option<StatusFilter>,
    pub category_id: Option<DbId>,
    /// Pre-built `ILIKE` pattern; matched against title or description.
    pub search: Option<String>,
}
