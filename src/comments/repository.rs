//! Diesel queries for the comments table. Every read is scoped to a
//! single ticket and ordered newest-first.

use diesel::prelude::*;
use uuid::Uuid;

use crate::shared::response::page_offset;
use crate::shared::schema::comments;

use super::models::Comment;

pub fn insert(conn: &mut PgConnection, comment: &Comment) -> QueryResult<()> {
    diesel::insert_into(comments::table)
        .values(comment)
        .execute(conn)?;
    Ok(())
}

/// Most recent `n` comments on a ticket, for the detail view.
pub fn recent_for_ticket(
    conn: &mut PgConnection,
    ticket_id: Uuid,
    n: i64,
) -> QueryResult<Vec<Comment>> {
    comments::table
        .filter(comments::ticket_id.eq(ticket_id))
        .order((comments::created_at.desc(), comments::id.desc()))
        .limit(n)
        .select(Comment::as_select())
        .load(conn)
}

/// One page of a ticket's comments, newest first.
pub fn page_for_ticket(
    conn: &mut PgConnection,
    ticket_id: Uuid,
    page: i64,
    limit: i64,
) -> QueryResult<Vec<Comment>> {
    comments::table
        .filter(comments::ticket_id.eq(ticket_id))
        .order((comments::created_at.desc(), comments::id.desc()))
        .offset(page_offset(page, limit))
        .limit(limit)
        .select(Comment::as_select())
        .load(conn)
}

pub fn count_for_ticket(conn: &mut PgConnection, ticket_id: Uuid) -> QueryResult<i64> {
    comments::table
        .filter(comments::ticket_id.eq(ticket_id))
        .count()
        .get_result(conn)
}
