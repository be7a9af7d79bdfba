//! Shared query parameter types for API handlers.

use doorctl_core::pagination::PageRequest;
use serde::Deserialize;

/// Page-number pagination parameters (`?page=&limit=`).
///
/// Out-of-range values are clamped by [`PageRequest::new`] rather than rejected.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    pub fn to_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

/// Query parameters for `GET /alarm/tamper`.
#[derive(Debug, Default, Deserialize)]
pub struct TamperListParams {
    /// Only unresolved logs when `true`.
    #[serde(default)]
    pub unresolved: bool,
}
