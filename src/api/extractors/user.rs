use crate::domain::models::application::User;
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

/// Identifies the acting user from the `X-User-Id` header. Authentication
/// itself is handled upstream; this service only resolves the id.
pub struct CurrentUser(pub User);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-Id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Validation("Missing X-User-Id header".into()))?;

        state
            .user_repo
            .find_by_id(user_id)
            .await?
            .map(CurrentUser)
            .ok_or(AppError::NotFound("User not found".into()))
    }
}
