//! Response envelope and offset-pagination arithmetic shared by every
//! list endpoint.

use serde::Serialize;

use crate::shared::error::FieldDetail;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn with_data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            pagination: None,
        }
    }

    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            success: true,
            data: Some(data),
            pagination: Some(pagination),
        }
    }
}

/// Envelope accompanying list responses. `total` counts every record
/// matching the filter predicate, independent of the requested page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        // integer ceil; limit is validated >= 1 upstream
        let total_pages = (total + limit - 1) / limit;
        Self {
            total,
            page,
            limit,
            total_pages,
        }
    }
}

/// Zero-indexed offset for the given one-indexed page.
pub fn page_offset(page: i64, limit: i64) -> i64 {
    (page - 1) * limit
}

/// Parse a raw `page` query value: positive integer, default 1.
pub fn parse_page(raw: Option<&str>) -> Result<i64, FieldDetail> {
    parse_positive(raw, 1, i64::MAX)
        .map_err(|_| FieldDetail::new("page", "Page must be a positive integer"))
}

/// Parse a raw `limit` query value: positive integer capped per endpoint.
pub fn parse_limit(raw: Option<&str>, default: i64, max: i64) -> Result<i64, FieldDetail> {
    parse_positive(raw, default, max).map_err(|_| {
        FieldDetail::new(
            "limit",
            format!("Limit must be a positive integer no greater than {max}"),
        )
    })
}

fn parse_positive(raw: Option<&str>, default: i64, max: i64) -> Result<i64, ()> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value: i64 = raw.parse().map_err(|_| ())?;
    if value < 1 || value > max {
        return Err(());
    }
    Ok(value)
}
