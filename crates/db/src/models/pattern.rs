//! Recurrence pattern model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use waypoint_core::error::CoreError;
use waypoint_core::recurrence::{Frequency, PatternRule};
use waypoint_core::types::{DbId, Timestamp};

/// A row from the `recurring_patterns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecurringPattern {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub frequency: String,
    pub anchor_at: Timestamp,
    pub category_id: Option<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl RecurringPattern {
    /// Parse the stored frequency and project the row onto the expansion input.
    pub fn rule(&self) -> Result<PatternRule, CoreError> {
        Ok(PatternRule {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            frequency: self.frequency.parse::<Frequency>()?,
            anchor: self.anchor_at,
            category_id: self.category_id,
        })
    }
}

/// DTO for creating a pattern alongside its first goal.
#[derive(Debug, Clone)]
pub struct CreatePattern {
    pub title: String,
    pub description: Option<String>,
    pub frequency: Frequency,
    pub anchor_at: Timestamp,
    pub category_id: Option<DbId>,
}

/// Template rewrite applied by an "update future occurrences" edit.
///
/// `anchor_at` of `None` keeps the current anchor.
#[derive(Debug, Clone)]
pub struct UpdatePatternTemplate {
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub anchor_at: Option<Timestamp>,
}
