//! Diesel queries for the tickets table.
//!
//! The listing queries share one conditional-filter shape: optional status
//! and priority equality plus a case-insensitive substring match against
//! title or description, AND-combined. The page query joins comments to
//! compute the per-ticket comment count at read time; the count query runs
//! against the bare table. Both are assembled by macros because the boxed
//! query types are not nameable, which also lets the tests render the
//! exact SQL the handlers execute.

use diesel::dsl::count;
use diesel::prelude::*;
use uuid::Uuid;

use crate::shared::enums::{TicketPriority, TicketStatus};
use crate::shared::response::page_offset;
use crate::shared::schema::{comments, tickets};

use super::models::{Ticket, TicketChangeset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Newest,
    Oldest,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::Newest
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            _ => Err(format!("Unknown sort order: {s}")),
        }
    }
}

/// Validated listing parameters. `q` is always non-empty when present.
#[derive(Debug, Clone)]
pub struct TicketQuery {
    pub q: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub sort: SortOrder,
    pub page: i64,
    pub limit: i64,
}

impl Default for TicketQuery {
    fn default() -> Self {
        Self {
            q: None,
            status: None,
            priority: None,
            sort: SortOrder::Newest,
            page: 1,
            limit: 10,
        }
    }
}

macro_rules! apply_filters {
    ($query:expr, $params:expr) => {{
        let mut filtered = $query;
        if let Some(status) = $params.status {
            filtered = filtered.filter(tickets::status.eq(status));
        }
        if let Some(priority) = $params.priority {
            filtered = filtered.filter(tickets::priority.eq(priority));
        }
        if let Some(term) = &$params.q {
            let pattern = format!("%{term}%");
            filtered = filtered.filter(
                tickets::title
                    .ilike(pattern.clone())
                    .or(tickets::description.ilike(pattern)),
            );
        }
        filtered
    }};
}

macro_rules! page_query {
    ($params:expr) => {{
        let params = $params;
        let base = tickets::table
            .left_join(comments::table)
            .group_by(tickets::id)
            .select((Ticket::as_select(), count(comments::id.nullable())))
            .into_boxed();
        let filtered = apply_filters!(base, params);
        // Tie-break on id so pagination is reproducible for equal timestamps.
        let ordered = match params.sort {
            SortOrder::Newest => {
                filtered.order((tickets::created_at.desc(), tickets::id.desc()))
            }
            SortOrder::Oldest => {
                filtered.order((tickets::created_at.asc(), tickets::id.asc()))
            }
        };
        ordered
            .offset(page_offset(params.page, params.limit))
            .limit(params.limit)
    }};
}

macro_rules! count_query {
    ($params:expr) => {{
        let base = tickets::table
            .select(diesel::dsl::count_star())
            .into_boxed();
        apply_filters!(base, $params)
    }};
}

pub fn insert(conn: &mut PgConnection, ticket: &Ticket) -> QueryResult<()> {
    diesel::insert_into(tickets::table)
        .values(ticket)
        .execute(conn)?;
    Ok(())
}

pub fn find_by_id(conn: &mut PgConnection, id: Uuid) -> QueryResult<Option<Ticket>> {
    tickets::table
        .find(id)
        .select(Ticket::as_select())
        .first(conn)
        .optional()
}

pub fn exists(conn: &mut PgConnection, id: Uuid) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(tickets::table.find(id))).get_result(conn)
}

/// One page of tickets matching the query, each with its comment count.
pub fn search_page(
    conn: &mut PgConnection,
    query: &TicketQuery,
) -> QueryResult<Vec<(Ticket, i64)>> {
    page_query!(query).load(conn)
}

/// Count of all tickets matching the query's filters, independent of
/// page and limit.
pub fn count_matching(conn: &mut PgConnection, query: &TicketQuery) -> QueryResult<i64> {
    count_query!(query).get_result(conn)
}

pub fn update(
    conn: &mut PgConnection,
    id: Uuid,
    changeset: &TicketChangeset,
) -> QueryResult<Ticket> {
    diesel::update(tickets::table.find(id))
        .set(changeset)
        .get_result(conn)
}

pub fn delete(conn: &mut PgConnection, id: Uuid) -> QueryResult<usize> {
    diesel::delete(tickets::table.find(id)).execute(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::pg::Pg;
    use diesel::query_builder::QueryFragment;

    fn sql_of<T: QueryFragment<Pg>>(query: &T) -> String {
        diesel::debug_query::<Pg, _>(query).to_string()
    }

    #[test]
    fn sort_order_parses_known_values() {
        assert_eq!("newest".parse(), Ok(SortOrder::Newest));
        assert_eq!("oldest".parse(), Ok(SortOrder::Oldest));
        assert!("latest".parse::<SortOrder>().is_err());
    }

    #[test]
    fn default_query_matches_endpoint_defaults() {
        let query = TicketQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert_eq!(query.sort, SortOrder::Newest);
        assert!(query.q.is_none());
    }

    #[test]
    fn unfiltered_count_has_no_where_clause() {
        let sql = sql_of(&count_query!(&TicketQuery::default()));
        assert!(sql.contains("COUNT(*)"));
        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn filters_are_and_combined() {
        let params = TicketQuery {
            status: Some(TicketStatus::Open),
            priority: Some(TicketPriority::High),
            q: Some("login".to_string()),
            ..Default::default()
        };
        let sql = sql_of(&count_query!(&params));
        assert!(sql.contains("\"tickets\".\"status\" = $"));
        assert!(sql.contains("\"tickets\".\"priority\" = $"));
        assert_eq!(sql.matches(" AND ").count(), 2);
    }

    #[test]
    fn search_term_matches_title_or_description_case_insensitively() {
        let params = TicketQuery {
            q: Some("login".to_string()),
            ..Default::default()
        };
        let sql = sql_of(&count_query!(&params));
        assert_eq!(sql.matches("ILIKE").count(), 2);
        assert!(sql.contains("\"tickets\".\"title\""));
        assert!(sql.contains("\"tickets\".\"description\""));
        assert!(sql.contains(" OR "));
        // Substring match: the bind is wrapped in wildcards.
        assert!(sql.contains("%login%"));
    }

    #[test]
    fn page_query_joins_comments_and_groups_by_ticket() {
        let sql = sql_of(&page_query!(&TicketQuery::default()));
        assert!(sql.contains("LEFT OUTER JOIN \"comments\""));
        assert!(sql.contains("GROUP BY \"tickets\".\"id\""));
        assert!(sql.contains("LIMIT $"));
        assert!(sql.contains("OFFSET $"));
    }

    #[test]
    fn newest_sort_descends_with_id_tie_break() {
        let sql = sql_of(&page_query!(&TicketQuery::default()));
        assert!(sql.contains(
            "ORDER BY \"tickets\".\"created_at\" DESC, \"tickets\".\"id\" DESC"
        ));
    }

    #[test]
    fn oldest_sort_ascends_with_id_tie_break() {
        let params = TicketQuery {
            sort: SortOrder::Oldest,
            ..Default::default()
        };
        let sql = sql_of(&page_query!(&params));
        assert!(sql.contains(
            "ORDER BY \"tickets\".\"created_at\" ASC, \"tickets\".\"id\" ASC"
        ));
    }

    #[test]
    fn page_query_carries_the_same_filters_as_the_count() {
        let params = TicketQuery {
            status: Some(TicketStatus::Resolved),
            q: Some("export".to_string()),
            ..Default::default()
        };
        let sql = sql_of(&page_query!(&params));
        assert!(sql.contains("\"tickets\".\"status\" = $"));
        assert_eq!(sql.matches("ILIKE").count(), 2);
    }
}
