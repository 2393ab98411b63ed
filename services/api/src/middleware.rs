//! Authentication middleware
//!
//! The wire convention is a numeric user id in the `x-user-id` header, a
//! demo stand-in for a real session token. The middleware still treats it
//! as a boundary: the id must parse and resolve to a known user before any
//! protected handler runs.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::error;

use crate::{error::ApiError, state::AppState};

/// Header carrying the caller's user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated user resolved from the request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub name: String,
}

/// Resolve the `x-user-id` header against the store
///
/// Missing, non-numeric or unknown ids are rejected with 401. The resolved
/// [`AuthUser`] is inserted into the request extensions for handlers.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let user_id: i64 = header.trim().parse().map_err(|_| ApiError::Unauthorized)?;

    let user = state
        .store
        .user(user_id)
        .await
        .map_err(|e| {
            error!("Failed to resolve user {}: {}", user_id, e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(AuthUser {
        id: user.id,
        email: user.email,
        name: user.name,
    });

    Ok(next.run(req).await)
}
