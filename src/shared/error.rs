//! Error taxonomy for the HTTP API.
//!
//! Validation failures carry per-field detail and map to 400, missing
//! entities to 404, storage uniqueness conflicts to 409, and everything
//! else falls through to a generic 500 whose detail is suppressed outside
//! development mode.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use once_cell::sync::OnceCell;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// One offending input field with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDetail {
    pub field: String,
    pub message: String,
}

impl FieldDetail {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<FieldDetail>),
    /// Carries the full user-facing message, e.g. "Ticket not found".
    #[error("{0}")]
    NotFound(&'static str),
    #[error(transparent)]
    Database(#[from] DieselError),
    #[error("connection pool exhausted: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

impl ApiError {
    pub fn validation(details: Vec<FieldDetail>) -> Self {
        Self::Validation(details)
    }

    pub fn ticket_not_found() -> Self {
        Self::NotFound("Ticket not found")
    }
}

/// Whether 500 responses include the underlying message. Set once from the
/// resolved configuration before the server starts accepting requests.
static VERBOSE_ERRORS: OnceCell<bool> = OnceCell::new();

pub fn set_verbose_errors(verbose: bool) {
    // A second call (e.g. from tests) keeps the first value.
    let _ = VERBOSE_ERRORS.set(verbose);
}

fn verbose_errors() -> bool {
    VERBOSE_ERRORS.get().copied().unwrap_or(false)
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: Option<serde_json::Value>,
) -> Response {
    let body = ErrorBody {
        success: false,
        error: error.into(),
        details,
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(details) => error_response(
                StatusCode::BAD_REQUEST,
                "Validation failed",
                serde_json::to_value(details).ok(),
            ),
            ApiError::NotFound(message) => {
                error_response(StatusCode::NOT_FOUND, message, None)
            }
            ApiError::Database(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                _,
            )) => error_response(StatusCode::CONFLICT, "Resource already exists", None),
            // Safety net: repository code surfaces missing rows via
            // Optional before this point.
            ApiError::Database(DieselError::NotFound) => {
                error_response(StatusCode::NOT_FOUND, "Resource not found", None)
            }
            ApiError::Database(err) => {
                error!("database error: {err}");
                internal_error_response(&err.to_string())
            }
            ApiError::Pool(err) => {
                error!("connection pool error: {err}");
                internal_error_response(&err.to_string())
            }
        }
    }
}

fn internal_error_response(detail: &str) -> Response {
    let details = verbose_errors().then(|| serde_json::Value::String(detail.to_string()));
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", details)
}

/// Flatten `validator` derive output into the wire `details` shape,
/// enumerating every offending field in one pass.
pub fn validation_details(errors: &validator::ValidationErrors) -> Vec<FieldDetail> {
    let mut details = Vec::new();
    for (field, errs) in errors.field_errors() {
        let field: &str = if field == "__all__" { "body" } else { field.as_ref() };
        for e in errs {
            let message = e
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value for {field}"));
            details.push(FieldDetail::new(field, message));
        }
    }
    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use validator::Validate;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_maps_to_400_with_details() {
        let err = ApiError::validation(vec![
            FieldDetail::new("title", "Title must be at least 5 characters"),
        ]);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Validation failed");
        assert_eq!(json["details"][0]["field"], "title");
    }

    #[tokio::test]
    async fn not_found_maps_to_404_without_details() {
        let response = ApiError::ticket_not_found().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Ticket not found");
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn unique_violation_maps_to_409() {
        let err = ApiError::Database(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key".to_string()),
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Resource already exists");
    }

    #[tokio::test]
    async fn unexpected_database_error_hides_detail_by_default() {
        let err = ApiError::Database(DieselError::BrokenTransactionManager);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Internal server error");
        assert!(json.get("details").is_none());
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 5, message = "Title must be at least 5 characters"))]
        title: String,
        #[validate(length(min = 1, message = "Author name is required"))]
        author: String,
    }

    #[test]
    fn validation_details_enumerates_every_field() {
        let sample = Sample {
            title: "hi".to_string(),
            author: String::new(),
        };
        let errors = sample.validate().unwrap_err();
        let details = validation_details(&errors);
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].field, "author");
        assert_eq!(details[1].field, "title");
        assert_eq!(details[1].message, "Title must be at least 5 characters");
    }
}
