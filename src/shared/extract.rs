//! Custom axum extractors that keep rejection bodies in the JSON envelope.

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::shared::error::{ApiError, FieldDetail};

/// `Json<T>` wrapper whose rejection is an [`ApiError`] validation failure
/// instead of axum's plain-text response.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(rejection) => Err(ApiError::validation(vec![FieldDetail::new(
                "body",
                rejection.body_text(),
            )])),
        }
    }
}

/// Path extractor for the `:id` ticket segment.
#[derive(Debug, Clone, Copy)]
pub struct TicketPath(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for TicketPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                ApiError::validation(vec![FieldDetail::new("id", "Ticket id is required")])
            })?;
        let id = raw.parse::<Uuid>().map_err(|_| {
            ApiError::validation(vec![FieldDetail::new(
                "id",
                "Ticket id must be a valid UUID",
            )])
        })?;
        Ok(TicketPath(id))
    }
}
