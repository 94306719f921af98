pub mod auth;
pub mod categories;
pub mod goals;
pub mod health;
pub mod patterns;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register, /auth/login                  public
/// /goals                                       dashboard list, create
/// /goals/calendar                              tiered calendar view
/// /goals/trash                                 soft-deleted goals
/// /goals/{id}                                  get, update, delete
/// /goals/{id}/advance, /goals/{id}/reset       status transitions
/// /goals/{id}/restore, /goals/{id}/purge       trash actions
/// /categories, /categories/{id}                list, create, delete
/// /patterns, /patterns/{id}/deactivate         list, deactivate
/// /stats                                       analytics
/// ```
///
/// Everything except `/auth` requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/goals", goals::router())
        .nest("/categories", categories::router())
        .nest("/patterns", patterns::router())
        .route("/stats", get(handlers::stats::get_stats))
}
