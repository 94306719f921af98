//! Repository for the `recurring_patterns` table.

use sqlx::{PgConnection, PgPool};
use waypoint_core::types::DbId;

use crate::models::pattern::{CreatePattern, RecurringPattern, UpdatePatternTemplate};

pub(crate) const COLUMNS: &str = "id, user_id, title, description, frequency, anchor_at, \
     category_id, is_active, created_at, updated_at";

pub struct PatternRepo;

impl PatternRepo {
    /// Insert a pattern on the caller's connection.
    pub async fn create(
        conn: &mut PgConnection,
        user_id: DbId,
        input: &CreatePattern,
    ) -> Result<RecurringPattern, sqlx::Error> {
        let query = format!(
            "INSERT INTO recurring_patterns (user_id, title, description, frequency, anchor_at, category_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RecurringPattern>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.frequency.as_str())
            .bind(input.anchor_at)
            .bind(input.category_id)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<RecurringPattern>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM recurring_patterns WHERE id = $1");
        sqlx::query_as::<_, RecurringPattern>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a pattern and hold its row lock until the caller's transaction ends.
    ///
    /// Catch-up and completion-driven generation both take this lock, which
    /// serialises occurrence generation per pattern.
    pub async fn lock(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<RecurringPattern>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM recurring_patterns WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, RecurringPattern>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// All of a user's patterns, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<RecurringPattern>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recurring_patterns WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, RecurringPattern>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Patterns that still generate occurrences.
    pub async fn list_active_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<RecurringPattern>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recurring_patterns WHERE user_id = $1 AND is_active ORDER BY id ASC"
        );
        sqlx::query_as::<_, RecurringPattern>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Stop further generation. Existing goals are untouched.
    ///
    /// Returns `None` if no pattern with the given `id` exists.
    pub async fn deactivate(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<RecurringPattern>, sqlx::Error> {
        let query = format!(
            "UPDATE recurring_patterns SET is_active = FALSE WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RecurringPattern>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Rewrite the template used for future occurrences on the caller's connection.
    pub async fn update_template(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdatePatternTemplate,
    ) -> Result<Option<RecurringPattern>, sqlx::Error> {
        let query = format!(
            "UPDATE recurring_patterns SET
                title = $2,
                description = $3,
                category_id = $4,
                anchor_at = COALESCE($5, anchor_at)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RecurringPattern>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.category_id)
            .bind(input.anchor_at)
            .fetch_optional(conn)
            .await
    }
}
