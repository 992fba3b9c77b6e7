pub mod models;
pub mod repository;
pub mod service;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::shared::error::{validation_details, ApiError};
use crate::shared::extract::{TicketPath, ValidJson};
use crate::shared::response::{parse_limit, parse_page, ApiResponse};
use crate::shared::state::AppState;

use self::models::NewComment;
use self::service::CommentService;

const LIST_DEFAULT_LIMIT: i64 = 20;
const LIST_MAX_LIMIT: i64 = 50;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Author name must be between 1 and 100 characters"
    ))]
    pub author_name: String,
    #[validate(length(
        min = 1,
        max = 500,
        message = "Message must be between 1 and 500 characters"
    ))]
    pub message: String,
}

impl CreateCommentRequest {
    pub fn into_new_comment(self) -> Result<NewComment, ApiError> {
        if let Err(errors) = self.validate() {
            let mut details = validation_details(&errors);
            // Report the wire name, not the struct field name.
            for detail in &mut details {
                if detail.field == "author_name" {
                    detail.field = "authorName".to_string();
                }
            }
            return Err(ApiError::validation(details));
        }
        Ok(NewComment {
            author_name: self.author_name,
            message: self.message,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListCommentsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListCommentsQuery {
    pub fn into_paging(self) -> Result<(i64, i64), ApiError> {
        let mut details = Vec::new();
        let page = parse_page(self.page.as_deref()).unwrap_or_else(|d| {
            details.push(d);
            1
        });
        let limit = parse_limit(self.limit.as_deref(), LIST_DEFAULT_LIMIT, LIST_MAX_LIMIT)
            .unwrap_or_else(|d| {
                details.push(d);
                LIST_DEFAULT_LIMIT
            });
        if !details.is_empty() {
            return Err(ApiError::validation(details));
        }
        Ok((page, limit))
    }
}

pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    TicketPath(ticket_id): TicketPath,
    ValidJson(req): ValidJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let data = req.into_new_comment()?;
    let comment = CommentService::new(state.conn.clone()).create(ticket_id, data)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::with_data(comment))))
}

pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    TicketPath(ticket_id): TicketPath,
    Query(query): Query<ListCommentsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, limit) = query.into_paging()?;
    let (comments, pagination) =
        CommentService::new(state.conn.clone()).list(ticket_id, page, limit)?;
    Ok(Json(ApiResponse::paginated(comments, pagination)))
}

pub fn configure_comments_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/tickets/:id/comments",
        get(list_comments).post(create_comment),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_accepts_valid_input() {
        let req = CreateCommentRequest {
            author_name: "Dana".to_string(),
            message: "Reproduced on the latest build".to_string(),
        };
        let data = req.into_new_comment().unwrap();
        assert_eq!(data.author_name, "Dana");
    }

    #[test]
    fn create_rejects_empty_fields() {
        let req = CreateCommentRequest {
            author_name: String::new(),
            message: String::new(),
        };
        let Err(ApiError::Validation(details)) = req.into_new_comment() else {
            panic!("expected validation failure");
        };
        let fields: Vec<&str> = details.iter().map(|d| d.field.as_str()).collect();
        assert!(fields.contains(&"authorName"));
        assert!(fields.contains(&"message"));
    }

    #[test]
    fn create_rejects_oversized_message() {
        let req = CreateCommentRequest {
            author_name: "Dana".to_string(),
            message: "x".repeat(501),
        };
        assert!(req.into_new_comment().is_err());
    }

    #[test]
    fn list_paging_defaults() {
        let (page, limit) = ListCommentsQuery::default().into_paging().unwrap();
        assert_eq!(page, 1);
        assert_eq!(limit, 20);
    }

    #[test]
    fn list_paging_enforces_cap() {
        let query = ListCommentsQuery {
            page: Some("2".to_string()),
            limit: Some("51".to_string()),
        };
        assert!(query.into_paging().is_err());
    }
}
