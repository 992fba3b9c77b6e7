use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::comments::models::Comment;
use crate::shared::enums::{TicketPriority, TicketStatus};
use crate::shared::schema::tickets;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Insertable)]
#[diesel(table_name = tickets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// New ticket with a server-assigned id, status OPEN, and identical
    /// creation/update timestamps.
    pub fn new(title: String, description: String, priority: TicketPriority) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            status: TicketStatus::Open,
            priority,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validated input for ticket creation.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub priority: TicketPriority,
}

/// Partial update; `None` fields are left untouched. `updated_at` is
/// always refreshed.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = tickets)]
pub struct TicketChangeset {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row: the ticket plus its read-time comment count.
#[derive(Debug, Serialize)]
pub struct TicketListItem {
    #[serde(flatten)]
    pub ticket: Ticket,
    #[serde(rename = "commentCount")]
    pub comment_count: i64,
}

/// Detail view: the ticket with its most recent comments inlined.
#[derive(Debug, Serialize)]
pub struct TicketWithComments {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub comments: Vec<Comment>,
}
