//! Handlers for the `/categories` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use waypoint_core::category::normalize_category_name;
use waypoint_core::error::CoreError;
use waypoint_core::types::DbId;
use waypoint_db::models::category::{Category, CategoryWithCount, CreateCategory};
use waypoint_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// GET /api/v1/categories
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CategoryWithCount>>>> {
    let categories = CategoryRepo::list_with_counts(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/categories
///
/// Names are trimmed and title-cased. Posting a name the user already has
/// returns the existing category with 200 instead of 201.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    let name = normalize_category_name(&input.name)?;
    let (category, created) =
        CategoryRepo::create_or_get(&state.pool, auth.user_id, &CreateCategory { name }).await?;

    let status = if created {
        tracing::info!(user_id = auth.user_id, category_id = category.id, "Category created");
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(DataResponse { data: category })))
}

/// DELETE /api/v1/categories/{id}
///
/// Goals and patterns filed under the category become uncategorised.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        })
    };

    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    auth.ensure_owns("Category", category.id, category.user_id)?;

    if CategoryRepo::delete(&state.pool, id).await? {
        tracing::info!(user_id = auth.user_id, category_id = id, "Category deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found())
    }
}
