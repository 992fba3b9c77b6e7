//! Ticket domain operations: translate missing rows into the not-found
//! failure and sequence the existence-check-then-mutate pattern.
//!
//! No transaction spans the check and the write; concurrent deletes can
//! race the check. Single-row writes are atomic in Postgres, so the worst
//! case is a lost update, which is the accepted consistency model.

use uuid::Uuid;

use crate::comments;
use crate::shared::error::ApiError;
use crate::shared::response::Pagination;
use crate::shared::utils::DbPool;

use super::models::{NewTicket, Ticket, TicketChangeset, TicketListItem, TicketWithComments};
use super::repository;
use super::repository::TicketQuery;

/// Number of recent comments inlined in the ticket detail view.
const RECENT_COMMENTS: i64 = 5;

pub struct TicketService {
    conn: DbPool,
}

impl TicketService {
    pub fn new(conn: DbPool) -> Self {
        Self { conn }
    }

    pub fn create(&self, data: NewTicket) -> Result<Ticket, ApiError> {
        let mut conn = self.conn.get()?;
        let ticket = Ticket::new(data.title, data.description, data.priority);
        repository::insert(&mut conn, &ticket)?;
        Ok(ticket)
    }

    pub fn get(&self, id: Uuid) -> Result<TicketWithComments, ApiError> {
        let mut conn = self.conn.get()?;
        let ticket =
            repository::find_by_id(&mut conn, id)?.ok_or_else(ApiError::ticket_not_found)?;
        let comments =
            comments::repository::recent_for_ticket(&mut conn, id, RECENT_COMMENTS)?;
        Ok(TicketWithComments { ticket, comments })
    }

    /// Page of tickets plus the pagination envelope. The page and count
    /// reads are independent; a page past the end yields an empty list
    /// with an accurate total.
    pub fn list(
        &self,
        query: &TicketQuery,
    ) -> Result<(Vec<TicketListItem>, Pagination), ApiError> {
        let mut conn = self.conn.get()?;
        let rows = repository::search_page(&mut conn, query)?;
        let total = repository::count_matching(&mut conn, query)?;
        let items = rows
            .into_iter()
            .map(|(ticket, comment_count)| TicketListItem {
                ticket,
                comment_count,
            })
            .collect();
        Ok((items, Pagination::new(total, query.page, query.limit)))
    }

    pub fn update(&self, id: Uuid, changeset: TicketChangeset) -> Result<Ticket, ApiError> {
        let mut conn = self.conn.get()?;
        if !repository::exists(&mut conn, id)? {
            return Err(ApiError::ticket_not_found());
        }
        Ok(repository::update(&mut conn, id, &changeset)?)
    }

    /// Removes the ticket; its comments go with it via the cascade FK.
    pub fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let mut conn = self.conn.get()?;
        if !repository::exists(&mut conn, id)? {
            return Err(ApiError::ticket_not_found());
        }
        repository::delete(&mut conn, id)?;
        Ok(())
    }
}
