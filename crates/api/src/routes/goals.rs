//! Route definitions for the `/goals` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::goals;
use crate::state::AppState;

/// Routes mounted at `/goals`.
///
/// ```text
/// GET    /               -> list (dashboard)
/// POST   /               -> create
/// GET    /calendar       -> calendar
/// GET    /trash          -> list_trash
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update
/// DELETE /{id}           -> delete (to trash)
/// POST   /{id}/advance   -> advance
/// POST   /{id}/reset     -> reset
/// POST   /{id}/restore   -> restore
/// DELETE /{id}/purge     -> purge
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(goals::list).post(goals::create))
        .route("/calendar", get(goals::calendar))
        .route("/trash", get(goals::list_trash))
        .route(
            "/{id}",
            get(goals::get_by_id)
                .put(goals::update)
                .delete(goals::delete),
        )
        .route("/{id}/advance", post(goals::advance))
        .route("/{id}/reset", post(goals::reset))
        .route("/{id}/restore", post(goals::restore))
        .route("/{id}/purge", delete(goals::purge))
}
