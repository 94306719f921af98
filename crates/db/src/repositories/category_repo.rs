//! Repository for the `categories` table.

use sqlx::PgPool;
use waypoint_core::types::DbId;

use crate::models::category::{Category, CategoryWithCount, CreateCategory};

const COLUMNS: &str = "id, user_id, name, created_at, updated_at";

pub struct CategoryRepo;

impl CategoryRepo {
    /// Create a category, or return the user's existing one with the same name.
    ///
    /// The boolean is `true` when a new row was inserted.
    pub async fn create_or_get(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateCategory,
    ) -> Result<(Category, bool), sqlx::Error> {
        let insert = format!(
            "INSERT INTO categories (user_id, name)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_categories_user_name DO NOTHING
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, Category>(&insert)
            .bind(user_id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await?;

        if let Some(category) = created {
            return Ok((category, true));
        }

        let select = format!("SELECT {COLUMNS} FROM categories WHERE user_id = $1 AND name = $2");
        let existing = sqlx::query_as::<_, Category>(&select)
            .bind(user_id)
            .bind(&input.name)
            .fetch_one(pool)
            .await?;
        Ok((existing, false))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's categories by name with their live goal counts.
    pub async fn list_with_counts(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<CategoryWithCount>, sqlx::Error> {
        sqlx::query_as::<_, CategoryWithCount>(
            "SELECT c.id, c.name, COUNT(g.id)::BIGINT AS goal_count
             FROM categories c
             LEFT JOIN goals g ON g.category_id = c.id AND g.deleted_at IS NULL
             WHERE c.user_id = $1
             GROUP BY c.id, c.name
             ORDER BY c.name ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Delete a category after detaching it from every goal and pattern,
    /// all in one transaction. Returns `true` if the category existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let goals = sqlx::query("UPDATE goals SET category_id = NULL WHERE category_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let patterns =
            sqlx::query("UPDATE recurring_patterns SET category_id = NULL WHERE category_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

        let deleted = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            category_id = id,
            goals = goals.rows_affected(),
            patterns = patterns.rows_affected(),
            "Category detached and deleted"
        );
        Ok(deleted.rows_affected() > 0)
    }
}
