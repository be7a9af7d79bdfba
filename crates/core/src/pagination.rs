//! Page-number pagination used by the access-history endpoints.
//!
//! Callers send a 1-based `page` and a `limit`. Results come back wrapped in
//! [`Paginated`], whose `pages` field is `ceil(total / limit)`.

use serde::Serialize;

/// Page size used when the caller does not send `limit`.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Upper bound for a caller-supplied `limit`.
pub const MAX_PAGE_SIZE: i64 = 500;

/// A normalized page request. `page >= 1` and `1 <= limit <= MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Build a page request from raw query values, clamping both to valid bounds.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Number of rows to skip before this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Number of pages needed to hold `total` rows at `limit` rows per page.
pub fn page_count(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

/// Paginated response envelope: `{ data, total, page, pages }`.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T: Serialize> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

impl<T: Serialize> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            data,
            total,
            page: request.page,
            pages: page_count(total, request.limit),
        }
    }
}
