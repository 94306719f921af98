//! Repository for the `goals` table, including occurrence generation.
//!
//! Catch-up and the completion transition both generate occurrences of a
//! recurring pattern. Each runs in its own transaction that first locks the
//! pattern row, and every insert goes through `ON CONFLICT DO NOTHING` against
//! `uq_goals_pattern_deadline`, so concurrent requests cannot duplicate an
//! occurrence.

use serde::Serialize;
use sqlx::postgres::PgArguments;
use sqlx::{PgConnection, PgPool, Postgres};
use waypoint_core::lifecycle::{transition, GoalAction, GoalStatus, Transition};
use waypoint_core::listing::{PageRequest, SortKey, StatusFilter};
use waypoint_core::recurrence::{expand, next_occurrence_deadline, LatestOccurrence, NewOccurrence};
use waypoint_core::types::{DbId, Timestamp};

use crate::models::goal::{CalendarFilter, CreateGoal, DashboardFilter, Goal, GoalListRow, UpdateGoal};
use crate::models::pattern::{CreatePattern, RecurringPattern, UpdatePatternTemplate};
use crate::repositories::pattern_repo::PatternRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, description, status_id, deadline, start_time, \
     end_time, category_id, pattern_id, deleted_at, created_at, updated_at";

/// Goal columns qualified with `g.` plus the joined category name.
const LIST_COLUMNS: &str = "g.id, g.user_id, g.title, g.description, g.status_id, g.deadline, \
     g.start_time, g.end_time, g.category_id, g.pattern_id, g.deleted_at, g.created_at, \
     g.updated_at, c.name AS category_name";

const LIST_FROM: &str = "FROM goals g LEFT JOIN categories c ON c.id = g.category_id";

/// Result of an advance or reset request.
#[derive(Debug, Clone, Serialize)]
pub struct AdvanceOutcome {
    pub goal: Goal,
    /// `false` when the action was a no-op for the goal's status.
    pub changed: bool,
    /// Next occurrence created by completing a recurring goal.
    pub spawned: Option<Goal>,
}

pub struct GoalRepo;

impl GoalRepo {
    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Insert a standalone goal in `pending`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateGoal,
    ) -> Result<Goal, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::insert(&mut *conn, user_id, input, None).await
    }

    /// Create a pattern anchored at `anchor_at` and its first goal in one
    /// transaction. The goal's deadline is the anchor.
    pub async fn create_recurring(
        pool: &PgPool,
        user_id: DbId,
        input: &CreatePattern,
    ) -> Result<(Goal, RecurringPattern), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let pattern = PatternRepo::create(&mut *tx, user_id, input).await?;
        let first = CreateGoal {
            title: input.title.clone(),
            description: input.description.clone(),
            deadline: Some(input.anchor_at),
            category_id: input.category_id,
        };
        let goal = Self::insert(&mut *tx, user_id, &first, Some(pattern.id)).await?;

        tx.commit().await?;

        tracing::info!(
            user_id,
            pattern_id = pattern.id,
            goal_id = goal.id,
            frequency = %input.frequency,
            "Recurring goal created"
        );
        Ok((goal, pattern))
    }

    async fn insert(
        conn: &mut PgConnection,
        user_id: DbId,
        input: &CreateGoal,
        pattern_id: Option<DbId>,
    ) -> Result<Goal, sqlx::Error> {
        let query = format!(
            "INSERT INTO goals (user_id, title, description, status_id, deadline, category_id, pattern_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Goal>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(GoalStatus::Pending.id())
            .bind(input.deadline)
            .bind(input.category_id)
            .bind(pattern_id)
            .fetch_one(conn)
            .await
    }

    /// Find a live goal by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Goal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM goals WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Goal>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a goal by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Goal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM goals WHERE id = $1");
        sqlx::query_as::<_, Goal>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A live goal joined with its category name.
    pub async fn find_row(pool: &PgPool, id: DbId) -> Result<Option<GoalListRow>, sqlx::Error> {
        let query =
            format!("SELECT {LIST_COLUMNS} {LIST_FROM} WHERE g.id = $1 AND g.deleted_at IS NULL");
        sqlx::query_as::<_, GoalListRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the editable fields of a live goal.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGoal,
    ) -> Result<Option<Goal>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::update_on(&mut *conn, id, input).await
    }

    /// Edit a goal and rewrite its pattern's template in one transaction, so
    /// later occurrences pick up the new title, description, category and
    /// time of day.
    pub async fn update_with_pattern(
        pool: &PgPool,
        id: DbId,
        pattern_id: DbId,
        input: &UpdateGoal,
    ) -> Result<Option<Goal>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(goal) = Self::update_on(&mut *tx, id, input).await? else {
            return Ok(None);
        };

        let template = UpdatePatternTemplate {
            title: input.title.clone(),
            description: input.description.clone(),
            category_id: input.category_id,
            anchor_at: input.deadline,
        };
        PatternRepo::update_template(&mut *tx, pattern_id, &template).await?;

        tx.commit().await?;

        tracing::info!(goal_id = id, pattern_id, "Pattern template updated from goal edit");
        Ok(Some(goal))
    }

    async fn update_on(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateGoal,
    ) -> Result<Option<Goal>, sqlx::Error> {
        let query = format!(
            "UPDATE goals SET
                title = $2,
                description = $3,
                deadline = $4,
                category_id = $5
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Goal>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.deadline)
            .bind(input.category_id)
            .fetch_optional(conn)
            .await
    }

    // -----------------------------------------------------------------------
    // Trash
    // -----------------------------------------------------------------------

    /// Soft-delete a goal by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE goals SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted goal. Returns `true` if a row was restored.
    ///
    /// Fails with a unique violation on `uq_goals_pattern_deadline` when
    /// catch-up has since regenerated the same occurrence.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE goals SET deleted_at = NULL WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a goal that is already in the trash.
    /// Returns `true` if a row was removed.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND deleted_at IS NOT NULL")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// A user's soft-deleted goals, most recently deleted first.
    pub async fn list_trashed(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<GoalListRow>, sqlx::Error> {
        let query = format!(
            "SELECT {LIST_COLUMNS} {LIST_FROM}
             WHERE g.user_id = $1 AND g.deleted_at IS NOT NULL
             ORDER BY g.deleted_at DESC, g.id DESC"
        );
        sqlx::query_as::<_, GoalListRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Listings
    // -----------------------------------------------------------------------

    /// One dashboard page, filtered, sorted and sliced in SQL.
    pub async fn list_dashboard(
        pool: &PgPool,
        user_id: DbId,
        filter: &DashboardFilter,
        page: PageRequest,
        now: Timestamp,
    ) -> Result<Vec<GoalListRow>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_dashboard_filter(user_id, filter, now);
        let order_by = dashboard_order(filter.sort);

        let query = format!(
            "SELECT {LIST_COLUMNS} {LIST_FROM} {where_clause} \
             ORDER BY {order_by} \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_goal_values(sqlx::query_as::<_, GoalListRow>(&query), &bind_values);
        q.bind(page.per_page).bind(page.offset()).fetch_all(pool).await
    }

    /// Count dashboard rows matching the filter (for pagination metadata).
    pub async fn count_dashboard(
        pool: &PgPool,
        user_id: DbId,
        filter: &DashboardFilter,
        now: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_dashboard_filter(user_id, filter, now);
        let query = format!("SELECT COUNT(*)::BIGINT {LIST_FROM} {where_clause}");

        let q = bind_goal_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(pool).await
    }

    /// Calendar rows, unordered. Archived goals are excluded; the caller
    /// arranges the result into priority tiers.
    pub async fn list_calendar(
        pool: &PgPool,
        user_id: DbId,
        filter: &CalendarFilter,
        now: Timestamp,
    ) -> Result<Vec<GoalListRow>, sqlx::Error> {
        let (where_clause, bind_values) = build_calendar_filter(user_id, filter, now);
        let query = format!("SELECT {LIST_COLUMNS} {LIST_FROM} {where_clause}");

        let q = bind_goal_values(sqlx::query_as::<_, GoalListRow>(&query), &bind_values);
        q.fetch_all(pool).await
    }

    // -----------------------------------------------------------------------
    // Occurrence generation
    // -----------------------------------------------------------------------

    /// Deadline of the most recent live occurrence of a pattern.
    ///
    /// `None` when the pattern has no live goals; `Some(None)` when the most
    /// recent one has no deadline.
    pub async fn latest_deadline_for_pattern(
        conn: &mut PgConnection,
        pattern_id: DbId,
    ) -> Result<Option<Option<Timestamp>>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<Timestamp>>(
            "SELECT deadline FROM goals
             WHERE pattern_id = $1 AND deleted_at IS NULL
             ORDER BY deadline DESC NULLS LAST, id DESC
             LIMIT 1",
        )
        .bind(pattern_id)
        .fetch_optional(conn)
        .await
    }

    /// Insert generated occurrences as one statement. Occurrences that already
    /// exist for the same pattern and deadline are skipped.
    ///
    /// Returns the number of rows inserted.
    pub async fn insert_occurrences(
        conn: &mut PgConnection,
        user_id: DbId,
        occurrences: &[NewOccurrence],
    ) -> Result<u64, sqlx::Error> {
        if occurrences.is_empty() {
            return Ok(0);
        }

        let titles: Vec<&str> = occurrences.iter().map(|o| o.title.as_str()).collect();
        let descriptions: Vec<Option<&str>> =
            occurrences.iter().map(|o| o.description.as_deref()).collect();
        let deadlines: Vec<Timestamp> = occurrences.iter().map(|o| o.deadline).collect();
        let categories: Vec<Option<DbId>> = occurrences.iter().map(|o| o.category_id).collect();
        let patterns: Vec<DbId> = occurrences.iter().map(|o| o.pattern_id).collect();

        let result = sqlx::query(
            "INSERT INTO goals (user_id, title, description, status_id, deadline, category_id, pattern_id)
             SELECT $1, t.title, t.description, $2, t.deadline, t.category_id, t.pattern_id
             FROM UNNEST($3::TEXT[], $4::TEXT[], $5::TIMESTAMPTZ[], $6::BIGINT[], $7::BIGINT[])
                  AS t(title, description, deadline, category_id, pattern_id)
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(GoalStatus::Pending.id())
        .bind(&titles)
        .bind(&descriptions)
        .bind(&deadlines)
        .bind(&categories)
        .bind(&patterns)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Bring every active pattern of a user up to date with `now`.
    ///
    /// Each pattern runs in its own transaction. A failure on one pattern
    /// rolls back only that pattern and is logged; the remaining patterns
    /// still run. Returns the total number of goals created.
    pub async fn catch_up_for_user(
        pool: &PgPool,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let patterns = PatternRepo::list_active_for_user(pool, user_id).await?;

        let mut generated = 0;
        for pattern in &patterns {
            match Self::catch_up_pattern(pool, pattern.id, now).await {
                Ok(inserted) => generated += inserted,
                Err(e) => {
                    tracing::warn!(user_id, pattern_id = pattern.id, error = %e, "Pattern catch-up failed, skipping");
                }
            }
        }

        if generated > 0 {
            tracing::info!(user_id, patterns = patterns.len(), generated, "Recurring goals caught up");
        }
        Ok(generated)
    }

    /// Generate every occurrence of one pattern that is due at `now`.
    pub async fn catch_up_pattern(
        pool: &PgPool,
        pattern_id: DbId,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(pattern) = PatternRepo::lock(&mut *tx, pattern_id).await? else {
            return Ok(0);
        };
        if !pattern.is_active {
            return Ok(0);
        }

        let rule = match pattern.rule() {
            Ok(rule) => rule,
            Err(e) => {
                tracing::warn!(pattern_id, frequency = %pattern.frequency, error = %e, "Skipping pattern with unusable frequency");
                return Ok(0);
            }
        };

        let latest = LatestOccurrence::from(
            Self::latest_deadline_for_pattern(&mut *tx, pattern_id).await?,
        );
        if latest == LatestOccurrence::Undated {
            tracing::debug!(pattern_id, "Latest occurrence has no deadline, skipping");
            return Ok(0);
        }

        let occurrences = expand(&rule, latest, now);
        if occurrences.is_empty() {
            return Ok(0);
        }

        let inserted = Self::insert_occurrences(&mut *tx, pattern.user_id, &occurrences).await?;
        tx.commit().await?;

        tracing::debug!(
            pattern_id,
            due = occurrences.len(),
            inserted,
            "Pattern caught up"
        );
        Ok(inserted)
    }

    // -----------------------------------------------------------------------
    // Status transitions
    // -----------------------------------------------------------------------

    /// Persist a resolved transition on the caller's connection.
    pub async fn apply_transition(
        conn: &mut PgConnection,
        goal: &Goal,
        change: &Transition,
    ) -> Result<Goal, sqlx::Error> {
        let query = format!(
            "UPDATE goals SET status_id = $2, start_time = $3, end_time = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Goal>(&query)
            .bind(goal.id)
            .bind(change.to.id())
            .bind(change.start_time.apply(goal.start_time))
            .bind(change.end_time.apply(goal.end_time))
            .fetch_one(conn)
            .await
    }

    /// Apply `action` to a live goal under a row lock.
    ///
    /// Undefined transitions leave the goal untouched and report
    /// `changed = false`. Completing a goal that belongs to an active pattern
    /// also creates its next occurrence, one period after its deadline, unless
    /// that occurrence already exists.
    ///
    /// Returns `None` if no live goal with the given `id` exists.
    pub async fn apply_action(
        pool: &PgPool,
        id: DbId,
        action: GoalAction,
        now: Timestamp,
    ) -> Result<Option<AdvanceOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query =
            format!("SELECT {COLUMNS} FROM goals WHERE id = $1 AND deleted_at IS NULL FOR UPDATE");
        let Some(goal) = sqlx::query_as::<_, Goal>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let from = goal.status();
        let Some(change) = transition(from, action, now) else {
            tracing::debug!(goal_id = id, status = %from, ?action, "Transition is a no-op");
            return Ok(Some(AdvanceOutcome {
                goal,
                changed: false,
                spawned: None,
            }));
        };

        let updated = Self::apply_transition(&mut *tx, &goal, &change).await?;

        let spawned = if change.spawns_next_occurrence {
            Self::spawn_next_occurrence(&mut *tx, &updated).await?
        } else {
            None
        };

        tx.commit().await?;

        tracing::info!(
            goal_id = id,
            from = %change.from,
            to = %change.to,
            spawned_id = spawned.as_ref().map(|g| g.id),
            "Goal status changed"
        );
        Ok(Some(AdvanceOutcome {
            goal: updated,
            changed: true,
            spawned,
        }))
    }

    /// Create the occurrence following a just-completed goal.
    async fn spawn_next_occurrence(
        conn: &mut PgConnection,
        completed: &Goal,
    ) -> Result<Option<Goal>, sqlx::Error> {
        let (Some(pattern_id), Some(deadline)) = (completed.pattern_id, completed.deadline) else {
            return Ok(None);
        };

        let Some(pattern) = PatternRepo::lock(&mut *conn, pattern_id).await? else {
            return Ok(None);
        };
        if !pattern.is_active {
            return Ok(None);
        }
        let rule = match pattern.rule() {
            Ok(rule) => rule,
            Err(e) => {
                tracing::warn!(pattern_id, error = %e, "Not spawning from pattern with unusable frequency");
                return Ok(None);
            }
        };

        let query = format!(
            "INSERT INTO goals (user_id, title, description, status_id, deadline, category_id, pattern_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Goal>(&query)
            .bind(completed.user_id)
            .bind(&completed.title)
            .bind(&completed.description)
            .bind(GoalStatus::Pending.id())
            .bind(next_occurrence_deadline(rule.frequency, deadline))
            .bind(completed.category_id)
            .bind(pattern_id)
            .fetch_optional(conn)
            .await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built goal listing queries.
enum BindValue {
    BigInt(i64),
    SmallInt(i16),
    Text(String),
    Timestamp(Timestamp),
}

/// Append the status-filter condition shared by both listings.
fn push_status_condition(
    status: StatusFilter,
    now: Timestamp,
    conditions: &mut Vec<String>,
    bind_values: &mut Vec<BindValue>,
    bind_idx: &mut u32,
) {
    match status {
        StatusFilter::Active => {
            conditions.push(format!("g.status_id <> ${bind_idx}"));
            *bind_idx += 1;
            bind_values.push(BindValue::SmallInt(GoalStatus::Archived.id()));
        }
        StatusFilter::Exact(status) => {
            conditions.push(format!("g.status_id = ${bind_idx}"));
            *bind_idx += 1;
            bind_values.push(BindValue::SmallInt(status.id()));
        }
        StatusFilter::Overdue => {
            conditions.push(format!(
                "g.status_id = ${bind_idx} AND g.deadline < ${}",
                *bind_idx + 1
            ));
            *bind_idx += 2;
            bind_values.push(BindValue::SmallInt(GoalStatus::Pending.id()));
            bind_values.push(BindValue::Timestamp(now));
        }
    }
}

/// Build the dashboard WHERE clause.
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
fn build_dashboard_filter(
    user_id: DbId,
    filter: &DashboardFilter,
    now: Timestamp,
) -> (String, Vec<BindValue>, u32) {
    let mut conditions = vec!["g.user_id = $1".to_string(), "g.deleted_at IS NULL".to_string()];
    let mut bind_values = vec![BindValue::BigInt(user_id)];
    let mut bind_idx = 2u32;

    if let Some(category_id) = filter.category_id {
        conditions.push(format!("g.category_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(category_id));
    }

    push_status_condition(
        filter.status.unwrap_or(StatusFilter::Active),
        now,
        &mut conditions,
        &mut bind_values,
        &mut bind_idx,
    );

    if let Some(ref pattern) = filter.search {
        conditions.push(format!("g.title LIKE ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(pattern.clone()));
    }

    (format!("WHERE {}", conditions.join(" AND ")), bind_values, bind_idx)
}

/// Build the calendar WHERE clause. Returns `(where_clause, bind_values)`.
fn build_calendar_filter(
    user_id: DbId,
    filter: &CalendarFilter,
    now: Timestamp,
) -> (String, Vec<BindValue>) {
    let mut conditions = vec![
        "g.user_id = $1".to_string(),
        "g.deleted_at IS NULL".to_string(),
        "g.status_id <> $2".to_string(),
    ];
    let mut bind_values = vec![
        BindValue::BigInt(user_id),
        BindValue::SmallInt(GoalStatus::Archived.id()),
    ];
    let mut bind_idx = 3u32;

    if let Some((start, end)) = filter.deadline_window {
        conditions.push(format!(
            "g.deadline >= ${bind_idx} AND g.deadline < ${}",
            bind_idx + 1
        ));
        bind_idx += 2;
        bind_values.push(BindValue::Timestamp(start));
        bind_values.push(BindValue::Timestamp(end));
    }

    if let Some(status) = filter.status {
        push_status_condition(status, now, &mut conditions, &mut bind_values, &mut bind_idx);
    }

    if let Some(category_id) = filter.category_id {
        conditions.push(format!("g.category_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(category_id));
    }

    if let Some(ref pattern) = filter.search {
        conditions.push(format!(
            "(g.title ILIKE ${bind_idx} OR g.description ILIKE ${bind_idx})"
        ));
        bind_values.push(BindValue::Text(pattern.clone()));
    }

    (format!("WHERE {}", conditions.join(" AND ")), bind_values)
}

/// ORDER BY clause for a dashboard sort key. Ties break on `id` so pages are stable.
fn dashboard_order(sort: SortKey) -> &'static str {
    match sort {
        SortKey::DeadlineAsc => "g.deadline ASC NULLS LAST, g.id ASC",
        SortKey::DeadlineDesc => "g.deadline DESC NULLS LAST, g.id DESC",
        SortKey::CreatedAsc => "g.created_at ASC, g.id ASC",
        SortKey::CreatedDesc => "g.created_at DESC, g.id DESC",
        SortKey::TitleAsc => "g.title ASC, g.id ASC",
    }
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_goal_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::SmallInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_goal_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, Postgres, i64, PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, Postgres, i64, PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::SmallInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}
