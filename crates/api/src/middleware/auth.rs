//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono_tz::Tz;
use waypoint_core::error::CoreError;
use waypoint_core::ownership::ensure_owner;
use waypoint_core::timezone::parse_timezone;
use waypoint_core::types::DbId;
use waypoint_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Authenticated user extracted from the `Authorization: Bearer` header.
///
/// Every goal, category and pattern operation receives the caller's id
/// through this extractor and passes it down explicitly.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
}

impl AuthUser {
    /// Fail with 403 unless this user owns the entity.
    pub fn ensure_owns(&self, entity: &'static str, id: DbId, owner_id: DbId) -> AppResult<()> {
        ensure_owner(entity, id, owner_id, self.user_id)?;
        Ok(())
    }

    /// The caller's zone, which decides where their calendar days begin.
    pub async fn timezone(&self, state: &AppState) -> AppResult<Tz> {
        let name = UserRepo::timezone(&state.pool, self.user_id)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Unknown user".into())))?;
        Ok(parse_timezone(Some(name.as_str())).unwrap_or_else(|e| {
            tracing::warn!(user_id = self.user_id, timezone = %name, error = %e, "Unreadable stored timezone, using UTC");
            Tz::UTC
        }))
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}
