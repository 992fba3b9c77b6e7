//! Comment domain operations. Both operations verify the parent ticket
//! first so an unknown ticket id reads as a not-found failure rather
//! than a foreign-key error or an empty page.

use uuid::Uuid;

use crate::shared::error::ApiError;
use crate::shared::response::Pagination;
use crate::shared::utils::DbPool;
use crate::tickets;

use super::models::{Comment, NewComment};
use super::repository;

pub struct CommentService {
    conn: DbPool,
}

impl CommentService {
    pub fn new(conn: DbPool) -> Self {
        Self { conn }
    }

    pub fn create(&self, ticket_id: Uuid, data: NewComment) -> Result<Comment, ApiError> {
        let mut conn = self.conn.get()?;
        if !tickets::repository::exists(&mut conn, ticket_id)? {
            return Err(ApiError::ticket_not_found());
        }
        let comment = Comment::new(ticket_id, data.author_name, data.message);
        repository::insert(&mut conn, &comment)?;
        Ok(comment)
    }

    pub fn list(
        &self,
        ticket_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Comment>, Pagination), ApiError> {
        let mut conn = self.conn.get()?;
        if !tickets::repository::exists(&mut conn, ticket_id)? {
            return Err(ApiError::ticket_not_found());
        }
        let comments = repository::page_for_ticket(&mut conn, ticket_id, page, limit)?;
        let total = repository::count_for_ticket(&mut conn, ticket_id)?;
        Ok((comments, Pagination::new(total, page, limit)))
    }
}
