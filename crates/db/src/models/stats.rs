//! Aggregates backing the statistics endpoint.

use serde::Serialize;
use sqlx::FromRow;

use crate::models::goal::StatusId;

/// Headline counts over a user's live goals.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct GoalTotals {
    pub total: i64,
    pub completed: i64,
    pub uncategorized: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct CategoryCount {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, FromRow)]
pub struct StatusCount {
    pub status_id: StatusId,
    pub count: i64,
}
