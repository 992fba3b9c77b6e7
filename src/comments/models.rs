use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::schema::comments;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Insertable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub author_name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(ticket_id: Uuid, author_name: String, message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticket_id,
            author_name,
            message,
            created_at: Utc::now(),
        }
    }
}

/// Validated input for posting a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub author_name: String,
    pub message: String,
}
