//! Aggregate queries over a user's live goals.

use sqlx::PgPool;
use waypoint_core::lifecycle::GoalStatus;
use waypoint_core::types::{DbId, Timestamp};

use crate::models::stats::{CategoryCount, GoalTotals, StatusCount};

pub struct StatsRepo;

impl StatsRepo {
    pub async fn totals(pool: &PgPool, user_id: DbId) -> Result<GoalTotals, sqlx::Error> {
        sqlx::query_as::<_, GoalTotals>(
            "SELECT COUNT(*)::BIGINT AS total,
                    COUNT(*) FILTER (WHERE status_id = $2)::BIGINT AS completed,
                    COUNT(*) FILTER (WHERE category_id IS NULL)::BIGINT AS uncategorized
             FROM goals
             WHERE user_id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .bind(GoalStatus::Completed.id())
        .fetch_one(pool)
        .await
    }

    /// Goal counts per category name. Categories without goals are omitted.
    pub async fn by_category(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<CategoryCount>, sqlx::Error> {
        sqlx::query_as::<_, CategoryCount>(
            "SELECT c.name, COUNT(g.id)::BIGINT AS count
             FROM goals g
             JOIN categories c ON c.id = g.category_id
             WHERE g.user_id = $1 AND g.deleted_at IS NULL
             GROUP BY c.name
             ORDER BY c.name ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn by_status(pool: &PgPool, user_id: DbId) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status_id, COUNT(*)::BIGINT AS count
             FROM goals
             WHERE user_id = $1 AND deleted_at IS NULL
             GROUP BY status_id
             ORDER BY status_id ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// `end_time` of every completed goal finished at or after `since`.
    ///
    /// Bucketing into days happens in the caller, in the user's zone.
    pub async fn completion_times_since(
        pool: &PgPool,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<Timestamp>, sqlx::Error> {
        sqlx::query_scalar::<_, Timestamp>(
            "SELECT end_time
             FROM goals
             WHERE user_id = $1
               AND deleted_at IS NULL
               AND status_id = $2
               AND end_time >= $3
             ORDER BY end_time ASC",
        )
        .bind(user_id)
        .bind(GoalStatus::Completed.id())
        .bind(since)
        .fetch_all(pool)
        .await
    }
}
