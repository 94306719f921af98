//! Handlers for the `/goals` resource.
//!
//! Both listing endpoints run recurring-goal catch-up for the caller before
//! reading, so generated occurrences are visible on the same request.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use waypoint_core::error::CoreError;
use waypoint_core::goal::{
    normalize_title, parse_deadline, validate_deadline_not_past_day, validate_recurrence,
    UpdateMode,
};
use waypoint_core::lifecycle::GoalAction;
use waypoint_core::listing::{
    arrange_tiered, parse_day, search_pattern, Page, PageRequest, SortKey, StatusFilter,
    TieredSortKey,
};
use waypoint_core::recurrence::parse_requested_frequency;
use waypoint_core::timezone::day_bounds;
use waypoint_core::types::{DbId, Timestamp};
use waypoint_db::models::goal::{CalendarFilter, CreateGoal, DashboardFilter, Goal, GoalView, UpdateGoal};
use waypoint_db::models::pattern::{CreatePattern, RecurringPattern};
use waypoint_db::repositories::{CategoryRepo, GoalRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{CalendarParams, DashboardParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /goals`.
///
/// Titles are trimmed before the length limit applies.
#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub title: String,
    pub description: Option<String>,
    /// RFC 3339 or `YYYY-MM-DDTHH:MM` (wall-clock time in the user's zone).
    pub deadline: Option<String>,
    /// `none`, `daily`, `weekly` or `monthly`. Missing means `none`.
    pub frequency: Option<String>,
    pub category_id: Option<DbId>,
}

/// Request body for `PUT /goals/{id}`. Every field is written.
#[derive(Debug, Deserialize)]
pub struct UpdateGoalRequest {
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<String>,
    pub category_id: Option<DbId>,
    #[serde(default)]
    pub update_mode: UpdateMode,
}

#[derive(Debug, Serialize)]
pub struct CreatedGoal {
    pub goal: GoalView,
    /// Present when the goal was created with a frequency.
    pub pattern: Option<RecurringPattern>,
}

/// Result of `advance` / `reset`.
#[derive(Debug, Serialize)]
pub struct TransitionResult {
    pub goal: GoalView,
    /// `false` when the action did not apply to the goal's status.
    pub changed: bool,
    /// Next occurrence created by completing a recurring goal.
    pub spawned: Option<GoalView>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Goal", id })
}

/// Load a live goal and check the caller owns it.
async fn load_owned(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<Goal> {
    let goal = GoalRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    auth.ensure_owns("Goal", goal.id, goal.user_id)?;
    Ok(goal)
}

/// Load a goal whether or not it is trashed, and check the caller owns it.
async fn load_owned_any(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<Goal> {
    let goal = GoalRepo::find_by_id_include_deleted(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    auth.ensure_owns("Goal", goal.id, goal.user_id)?;
    Ok(goal)
}

/// Render a live goal with its category name.
async fn view(state: &AppState, id: DbId, now: Timestamp) -> AppResult<GoalView> {
    let row = GoalRepo::find_row(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(GoalView::from_row(row, now))
}

/// A category may only be attached by its owner.
async fn ensure_category_owned(
    state: &AppState,
    auth: &AuthUser,
    category_id: Option<DbId>,
) -> AppResult<()> {
    let Some(id) = category_id else {
        return Ok(());
    };
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    auth.ensure_owns("Category", category.id, category.user_id)
}

fn parse_optional_deadline(raw: Option<&str>, tz: Tz) -> AppResult<Option<Timestamp>> {
    Ok(raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_deadline(s, tz))
        .transpose()?)
}

fn clean_description(raw: Option<String>) -> Option<String> {
    raw.map(|d| d.trim().to_string()).filter(|d| !d.is_empty())
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// GET /api/v1/goals
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> AppResult<Json<DataResponse<Page<GoalView>>>> {
    let status = StatusFilter::parse(params.status.as_deref())?;
    let now = state.now();

    GoalRepo::catch_up_for_user(&state.pool, auth.user_id, now).await?;

    let filter = DashboardFilter {
        category_id: params.category_id,
        status: Some(status),
        search: search_pattern(params.q.as_deref()),
        sort: SortKey::parse(params.sort_by.as_deref()),
    };
    let request = PageRequest::new(params.page, state.config.dashboard_page_size);

    let rows = GoalRepo::list_dashboard(&state.pool, auth.user_id, &filter, request, now).await?;
    let total = GoalRepo::count_dashboard(&state.pool, auth.user_id, &filter, now).await?;

    let items = rows.into_iter().map(|row| GoalView::from_row(row, now)).collect();
    Ok(Json(DataResponse {
        data: Page::new(items, request, total),
    }))
}

/// GET /api/v1/goals/calendar
///
/// Archived goals never appear; the rest are ordered in priority tiers.
/// `date` selects one calendar day in the caller's zone.
pub async fn calendar(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CalendarParams>,
) -> AppResult<Json<DataResponse<Vec<GoalView>>>> {
    let status = match StatusFilter::parse(params.status.as_deref())? {
        StatusFilter::Active => None,
        other => Some(other),
    };
    let now = state.now();

    let tz = auth.timezone(&state).await?;

    GoalRepo::catch_up_for_user(&state.pool, auth.user_id, now).await?;

    let filter = CalendarFilter {
        deadline_window: parse_day(params.date.as_deref()).map(|day| day_bounds(day, tz)),
        status,
        category_id: params.category_id,
        search: search_pattern(params.q.as_deref()),
    };
    let rows = GoalRepo::list_calendar(&state.pool, auth.user_id, &filter, now).await?;
    let arranged = arrange_tiered(rows, TieredSortKey::parse(params.sort_by.as_deref()), now);

    Ok(Json(DataResponse {
        data: arranged
            .into_iter()
            .map(|row| GoalView::from_row(row, now))
            .collect(),
    }))
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/goals
///
/// A goal with a frequency also creates its pattern, anchored at the deadline.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateGoalRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedGoal>>)> {
    let title = normalize_title(&input.title)?;
    let tz = auth.timezone(&state).await?;
    let deadline = parse_optional_deadline(input.deadline.as_deref(), tz)?;
    let frequency = parse_requested_frequency(input.frequency.as_deref())?;
    validate_recurrence(frequency, deadline)?;
    ensure_category_owned(&state, &auth, input.category_id).await?;

    let description = clean_description(input.description);
    let now = state.now();

    let (goal, pattern) = match (frequency, deadline) {
        (Some(frequency), Some(anchor_at)) => {
            let pattern_input = CreatePattern {
                title,
                description,
                frequency,
                anchor_at,
                category_id: input.category_id,
            };
            let (goal, pattern) =
                GoalRepo::create_recurring(&state.pool, auth.user_id, &pattern_input).await?;
            (goal, Some(pattern))
        }
        _ => {
            let goal_input = CreateGoal {
                title,
                description,
                deadline,
                category_id: input.category_id,
            };
            let goal = GoalRepo::create(&state.pool, auth.user_id, &goal_input).await?;
            tracing::info!(user_id = auth.user_id, goal_id = goal.id, "Goal created");
            (goal, None)
        }
    };

    let created = CreatedGoal {
        goal: view(&state, goal.id, now).await?,
        pattern,
    };
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/goals/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<GoalView>>> {
    load_owned(&state, &auth, id).await?;
    let goal = view(&state, id, state.now()).await?;
    Ok(Json(DataResponse { data: goal }))
}

/// PUT /api/v1/goals/{id}
///
/// With `update_mode = "future"` on a generated goal, the pattern's template
/// is rewritten too. A changed deadline may not fall on a day before today
/// in the caller's zone.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateGoalRequest>,
) -> AppResult<Json<DataResponse<GoalView>>> {
    let existing = load_owned(&state, &auth, id).await?;

    let now = state.now();
    let tz = auth.timezone(&state).await?;
    let title = normalize_title(&input.title)?;
    let deadline = parse_optional_deadline(input.deadline.as_deref(), tz)?;
    if let Some(d) = deadline {
        if existing.deadline != Some(d) {
            validate_deadline_not_past_day(d, now, tz)?;
        }
    }
    ensure_category_owned(&state, &auth, input.category_id).await?;

    let changes = UpdateGoal {
        title,
        description: clean_description(input.description),
        deadline,
        category_id: input.category_id,
    };

    let updated = match (input.update_mode, existing.pattern_id) {
        (UpdateMode::Future, Some(pattern_id)) => {
            GoalRepo::update_with_pattern(&state.pool, id, pattern_id, &changes).await?
        }
        _ => GoalRepo::update(&state.pool, id, &changes).await?,
    };
    updated.ok_or_else(|| not_found(id))?;

    let goal = view(&state, id, now).await?;
    Ok(Json(DataResponse { data: goal }))
}

/// DELETE /api/v1/goals/{id}
///
/// Moves the goal to the trash.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_owned(&state, &auth, id).await?;
    if GoalRepo::soft_delete(&state.pool, id).await? {
        tracing::info!(user_id = auth.user_id, goal_id = id, "Goal moved to trash");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

async fn run_action(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
    action: GoalAction,
) -> AppResult<TransitionResult> {
    load_owned(state, auth, id).await?;
    let now = state.now();

    let outcome = GoalRepo::apply_action(&state.pool, id, action, now)
        .await?
        .ok_or_else(|| not_found(id))?;

    let spawned = match outcome.spawned {
        Some(next) => Some(view(state, next.id, now).await?),
        None => None,
    };
    Ok(TransitionResult {
        goal: view(state, outcome.goal.id, now).await?,
        changed: outcome.changed,
        spawned,
    })
}

/// POST /api/v1/goals/{id}/advance
///
/// Steps the goal forward. A goal already archived comes back unchanged.
pub async fn advance(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TransitionResult>>> {
    let result = run_action(&state, &auth, id, GoalAction::Advance).await?;
    Ok(Json(DataResponse { data: result }))
}

/// POST /api/v1/goals/{id}/reset
pub async fn reset(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TransitionResult>>> {
    let result = run_action(&state, &auth, id, GoalAction::Reset).await?;
    Ok(Json(DataResponse { data: result }))
}

// ---------------------------------------------------------------------------
// Trash
// ---------------------------------------------------------------------------

/// GET /api/v1/goals/trash
///
/// Most recently deleted first, in the same shape as the live listings.
pub async fn list_trash(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<GoalView>>>> {
    let now = state.now();
    let goals = GoalRepo::list_trashed(&state.pool, auth.user_id)
        .await?
        .into_iter()
        .map(|row| GoalView::from_row(row, now))
        .collect();
    Ok(Json(DataResponse { data: goals }))
}

/// POST /api/v1/goals/{id}/restore
///
/// 409 if catch-up has regenerated the same occurrence in the meantime.
pub async fn restore(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<GoalView>>> {
    let goal = load_owned_any(&state, &auth, id).await?;
    if goal.deleted_at.is_none() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Goal {id} is not in the trash"
        ))));
    }

    GoalRepo::restore(&state.pool, id).await?;
    tracing::info!(user_id = auth.user_id, goal_id = id, "Goal restored");

    let goal = view(&state, id, state.now()).await?;
    Ok(Json(DataResponse { data: goal }))
}

/// DELETE /api/v1/goals/{id}/purge
///
/// Only goals already in the trash can be purged.
pub async fn purge(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let goal = load_owned_any(&state, &auth, id).await?;
    if goal.deleted_at.is_none() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Goal {id} must be moved to the trash before purging"
        ))));
    }

    GoalRepo::hard_delete(&state.pool, id).await?;
    tracing::info!(user_id = auth.user_id, goal_id = id, "Goal purged");
    Ok(StatusCode::NO_CONTENT)
}
