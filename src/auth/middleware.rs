//! Authentication middleware for axum.

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::RosterError;
use crate::AppState;

/// Require a valid `Authorization: Bearer <token>` header.
///
/// Rejections are reported as the generic 404 so callers cannot distinguish
/// a protected route from a missing one.
pub async fn require_bearer_token(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, RosterError> {
    let verified = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| state.verifier.verify(token));

    match verified {
        Some(true) => Ok(next.run(request).await),
        Some(false) => {
            tracing::warn!(path = %request.uri().path(), "Invalid bearer token attempted");
            Err(RosterError::resource_not_found())
        }
        None => {
            tracing::debug!(path = %request.uri().path(), "Missing bearer token");
            Err(RosterError::resource_not_found())
        }
    }
}
