//! Route definitions for the `/patterns` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::patterns;
use crate::state::AppState;

/// Routes mounted at `/patterns`.
///
/// ```text
/// GET  /                 -> list
/// POST /{id}/deactivate  -> deactivate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(patterns::list))
        .route("/{id}/deactivate", post(patterns::deactivate))
}
