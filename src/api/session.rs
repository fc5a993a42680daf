//! Per-request store session extraction.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::RosterError;
use crate::storage::Repository;
use crate::AppState;

/// Handlers take a [`Repository`] argument to get a pooled connection for the
/// lifetime of the request. It is released when the handler returns, on
/// success and error alike.
#[async_trait]
impl FromRequestParts<AppState> for Repository {
    type Rejection = RosterError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state.database.acquire().await
    }
}
