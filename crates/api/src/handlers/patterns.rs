//! Handlers for the `/patterns` resource.

use axum::extract::{Path, State};
use axum::Json;
use waypoint_core::error::CoreError;
use waypoint_core::types::DbId;
use waypoint_db::models::pattern::RecurringPattern;
use waypoint_db::repositories::PatternRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/patterns
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<RecurringPattern>>>> {
    let patterns = PatternRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: patterns }))
}

/// POST /api/v1/patterns/{id}/deactivate
///
/// Stops catch-up and completion from generating further occurrences.
/// Goals already generated are kept.
pub async fn deactivate(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RecurringPattern>>> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "RecurringPattern",
            id,
        })
    };

    let pattern = PatternRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    auth.ensure_owns("RecurringPattern", pattern.id, pattern.user_id)?;

    let pattern = PatternRepo::deactivate(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    tracing::info!(user_id = auth.user_id, pattern_id = id, "Pattern deactivated");

    Ok(Json(DataResponse { data: pattern }))
}
