//! JSON body extractor that reports rejections in the API error format.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::RosterError;

/// Field name reported when a rejection cannot be pinned to one field.
const WHOLE_BODY: &str = "body";

/// Like [`Json`], but a body that is missing, malformed or of the wrong shape
/// becomes a [`RosterError::Validation`] naming the offending field.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RosterError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(into_validation_error(rejection)),
        }
    }
}

fn into_validation_error(rejection: JsonRejection) -> RosterError {
    let message = rejection.body_text();
    let field = match rejection {
        JsonRejection::JsonDataError(_) => rejected_field(&message),
        _ => None,
    }
    .unwrap_or_else(|| WHOLE_BODY.to_string());

    tracing::debug!(field = %field, error = %message, "Rejected request body");

    RosterError::validation(&field, message)
}

/// Pull the field path out of a deserialization message such as
/// `...target type: team_id: UUID parsing failed` or
/// `...target type: missing field `employee_ids` at line 1 column 2`.
fn rejected_field(message: &str) -> Option<String> {
    let (_, detail) = message.split_once("target type: ")?;

    if let Some(rest) = detail.strip_prefix("missing field `") {
        return rest.split_once('`').map(|(name, _)| name.to_string());
    }

    let (path, _) = detail.split_once(": ")?;
    if path.is_empty() || path.contains(char::is_whitespace) {
        return None;
    }
    Some(path.to_string())
}
