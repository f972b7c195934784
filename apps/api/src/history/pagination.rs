//! Page arithmetic for the history listing. Out-of-range input is clamped,
//! never rejected.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: i64 = 10;
/// Used when a caller asks for a page size below one.
pub const FALLBACK_PER_PAGE: i64 = 20;
/// Largest page size served in one request.
pub const MAX_PER_PAGE: i64 = 100;

/// Raw query parameters. Kept as strings so malformed values fall back to
/// defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

fn parse_param(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse().ok())
}

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        let page = parse_param(query.page.as_deref()).unwrap_or(1).max(1);
        let per_page = match parse_param(query.per_page.as_deref()).unwrap_or(DEFAULT_PER_PAGE) {
            n if n < 1 => FALLBACK_PER_PAGE,
            n => n.min(MAX_PER_PAGE),
        };
        Self { page, per_page }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageMeta {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let pages = if total <= 0 {
            0
        } else {
            (total - 1) / request.per_page + 1
        };
        Self {
            total,
            page: request.page,
            pages,
            has_next: request.page < pages,
            has_prev: request.page > 1,
        }
    }
}
