pub mod models;
pub mod repository;
pub mod service;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::shared::error::{validation_details, ApiError, FieldDetail};
use crate::shared::extract::{TicketPath, ValidJson};
use crate::shared::response::{parse_limit, parse_page, ApiResponse};
use crate::shared::state::AppState;

use self::models::{NewTicket, TicketChangeset};
use self::repository::TicketQuery;
use self::service::TicketService;

const LIST_DEFAULT_LIMIT: i64 = 10;
const LIST_MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTicketRequest {
    #[validate(length(min = 5, max = 80, message = "Title must be between 5 and 80 characters"))]
    pub title: String,
    #[validate(length(
        min = 20,
        max = 2000,
        message = "Description must be between 20 and 2000 characters"
    ))]
    pub description: String,
    pub priority: Option<String>,
}

impl CreateTicketRequest {
    pub fn into_new_ticket(self) -> Result<NewTicket, ApiError> {
        let mut details = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => validation_details(&errors),
        };
        let priority = parse_enum_field(
            self.priority,
            "priority",
            "Priority must be one of LOW, MEDIUM, HIGH",
            &mut details,
        )
        .unwrap_or_default();
        if !details.is_empty() {
            return Err(ApiError::validation(details));
        }
        Ok(NewTicket {
            title: self.title,
            description: self.description,
            priority,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTicketRequest {
    #[validate(length(min = 5, max = 80, message = "Title must be between 5 and 80 characters"))]
    pub title: Option<String>,
    #[validate(length(
        min = 20,
        max = 2000,
        message = "Description must be between 20 and 2000 characters"
    ))]
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl UpdateTicketRequest {
    pub fn into_changeset(self) -> Result<TicketChangeset, ApiError> {
        let mut details = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => validation_details(&errors),
        };
        // Validation precedes any existence check: an empty payload is a
        // 400 even for an unknown ticket id.
        if self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
        {
            details.push(FieldDetail::new(
                "body",
                "At least one field must be provided for update",
            ));
        }
        let status = parse_enum_field(
            self.status,
            "status",
            "Status must be one of OPEN, IN_PROGRESS, RESOLVED",
            &mut details,
        );
        let priority = parse_enum_field(
            self.priority,
            "priority",
            "Priority must be one of LOW, MEDIUM, HIGH",
            &mut details,
        );
        if !details.is_empty() {
            return Err(ApiError::validation(details));
        }
        Ok(TicketChangeset {
            title: self.title,
            description: self.description,
            status,
            priority,
            updated_at: Utc::now(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListTicketsQuery {
    pub q: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListTicketsQuery {
    pub fn into_query(self) -> Result<TicketQuery, ApiError> {
        let mut details = Vec::new();
        let status = parse_enum_field(
            self.status,
            "status",
            "Status must be one of OPEN, IN_PROGRESS, RESOLVED",
            &mut details,
        );
        let priority = parse_enum_field(
            self.priority,
            "priority",
            "Priority must be one of LOW, MEDIUM, HIGH",
            &mut details,
        );
        let sort = parse_enum_field(
            self.sort,
            "sort",
            "Sort must be one of newest, oldest",
            &mut details,
        )
        .unwrap_or_default();
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
        Ok(TicketQuery {
            q: self.q.filter(|q| !q.is_empty()),
            status,
            priority,
            sort,
            page,
            limit,
        })
    }
}

fn parse_enum_field<T: std::str::FromStr>(
    raw: Option<String>,
    field: &'static str,
    message: &'static str,
    details: &mut Vec<FieldDetail>,
) -> Option<T> {
    let raw = raw?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            details.push(FieldDetail::new(field, message));
            None
        }
    }
}

pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateTicketRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let data = req.into_new_ticket()?;
    let ticket = TicketService::new(state.conn.clone()).create(data)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::with_data(ticket))))
}

pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListTicketsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let query = query.into_query()?;
    let (tickets, pagination) = TicketService::new(state.conn.clone()).list(&query)?;
    Ok(Json(ApiResponse::paginated(tickets, pagination)))
}

pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    TicketPath(id): TicketPath,
) -> Result<impl IntoResponse, ApiError> {
    let ticket = TicketService::new(state.conn.clone()).get(id)?;
    Ok(Json(ApiResponse::with_data(ticket)))
}

pub async fn update_ticket(
    State(state): State<Arc<AppState>>,
    TicketPath(id): TicketPath,
    ValidJson(req): ValidJson<UpdateTicketRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let changeset = req.into_changeset()?;
    let ticket = TicketService::new(state.conn.clone()).update(id, changeset)?;
    Ok(Json(ApiResponse::with_data(ticket)))
}

pub async fn delete_ticket(
    State(state): State<Arc<AppState>>,
    TicketPath(id): TicketPath,
) -> Result<StatusCode, ApiError> {
    TicketService::new(state.conn.clone()).delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn configure_tickets_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/tickets", get(list_tickets).post(create_ticket))
        .route(
            "/api/tickets/:id",
            get(get_ticket).patch(update_ticket).delete(delete_ticket),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::enums::{TicketPriority, TicketStatus};
    use super::repository::SortOrder;

    fn valid_create() -> CreateTicketRequest {
        CreateTicketRequest {
            title: "Cannot login to app".to_string(),
            description: "After entering my credentials the page refreshes".to_string(),
            priority: Some("HIGH".to_string()),
        }
    }

    #[test]
    fn create_accepts_valid_input() {
        let data = valid_create().into_new_ticket().unwrap();
        assert_eq!(data.priority, TicketPriority::High);
        assert_eq!(data.title, "Cannot login to app");
    }

    #[test]
    fn create_defaults_priority_to_medium() {
        let mut req = valid_create();
        req.priority = None;
        let data = req.into_new_ticket().unwrap();
        assert_eq!(data.priority, TicketPriority::Medium);
    }

    #[test]
    fn create_enumerates_every_offending_field() {
        let req = CreateTicketRequest {
            title: "hey".to_string(),
            description: "too short".to_string(),
            priority: Some("URGENT".to_string()),
        };
        let Err(ApiError::Validation(details)) = req.into_new_ticket() else {
            panic!("expected validation failure");
        };
        let fields: Vec<&str> = details.iter().map(|d| d.field.as_str()).collect();
        assert!(fields.contains(&"title"));
        assert!(fields.contains(&"description"));
        assert!(fields.contains(&"priority"));
    }

    #[test]
    fn update_rejects_empty_payload() {
        let Err(ApiError::Validation(details)) =
            UpdateTicketRequest::default().into_changeset()
        else {
            panic!("expected validation failure");
        };
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field, "body");
    }

    #[test]
    fn update_accepts_status_only() {
        let req = UpdateTicketRequest {
            status: Some("RESOLVED".to_string()),
            ..Default::default()
        };
        let changeset = req.into_changeset().unwrap();
        assert_eq!(changeset.status, Some(TicketStatus::Resolved));
        assert!(changeset.title.is_none());
        assert!(changeset.priority.is_none());
    }

    #[test]
    fn update_rejects_unknown_status() {
        let req = UpdateTicketRequest {
            status: Some("CLOSED".to_string()),
            ..Default::default()
        };
        let Err(ApiError::Validation(details)) = req.into_changeset() else {
            panic!("expected validation failure");
        };
        assert_eq!(details[0].field, "status");
    }

    #[test]
    fn list_query_defaults() {
        let query = ListTicketsQuery::default().into_query().unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert_eq!(query.sort, SortOrder::Newest);
        assert!(query.status.is_none());
        assert!(query.q.is_none());
    }

    #[test]
    fn list_query_parses_filters() {
        let raw = ListTicketsQuery {
            q: Some("login".to_string()),
            status: Some("OPEN".to_string()),
            priority: Some("HIGH".to_string()),
            sort: Some("oldest".to_string()),
            page: Some("2".to_string()),
            limit: Some("25".to_string()),
        };
        let query = raw.into_query().unwrap();
        assert_eq!(query.q.as_deref(), Some("login"));
        assert_eq!(query.status, Some(TicketStatus::Open));
        assert_eq!(query.priority, Some(TicketPriority::High));
        assert_eq!(query.sort, SortOrder::Oldest);
        assert_eq!(query.page, 2);
        assert_eq!(query.limit, 25);
    }

    #[test]
    fn list_query_drops_empty_search() {
        let raw = ListTicketsQuery {
            q: Some(String::new()),
            ..Default::default()
        };
        assert!(raw.into_query().unwrap().q.is_none());
    }

    #[test]
    fn list_query_rejects_out_of_range_paging() {
        let raw = ListTicketsQuery {
            page: Some("0".to_string()),
            limit: Some("101".to_string()),
            ..Default::default()
        };
        let Err(ApiError::Validation(details)) = raw.into_query() else {
            panic!("expected validation failure");
        };
        let fields: Vec<&str> = details.iter().map(|d| d.field.as_str()).collect();
        assert!(fields.contains(&"page"));
        assert!(fields.contains(&"limit"));
    }
}
