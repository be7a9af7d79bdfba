//! Aggregate counters reported by the statistics endpoints.

use serde::Serialize;

/// Access-attempt totals plus the share of granted attempts, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessStats {
    pub total_access: i64,
    pub successful_access: i64,
    pub failed_access: i64,
    pub success_rate: f64,
}

impl AccessStats {
    pub fn from_counts(total: i64, successful: i64, failed: i64) -> Self {
        let success_rate = if total > 0 {
            successful as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        Self {
            total_access: total,
            successful_access: successful,
            failed_access: failed,
            success_rate,
        }
    }
}

/// Tamper-log totals split by resolution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TamperStats {
    pub total: i64,
    pub unresolved: i64,
    pub resolved: i64,
}
