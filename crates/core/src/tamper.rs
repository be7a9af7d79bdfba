//! Tamper-log resolution state.
//!
//! A tamper log starts `Unresolved` when an edge device reports it and can
//! only move to `Resolved` through an operator action. Nothing reopens it.

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TamperStatus {
    Unresolved,
    Resolved,
}

impl TamperStatus {
    /// Map the stored `resolved` column onto a status.
    pub fn from_resolved(resolved: bool) -> Self {
        if resolved {
            Self::Resolved
        } else {
            Self::Unresolved
        }
    }

    pub fn is_resolved(self) -> bool {
        matches!(self, Self::Resolved)
    }

    /// Explicit resolve action. Idempotent.
    pub fn resolve(self) -> Self {
        Self::Resolved
    }

    /// Apply an operator-requested `resolved` flag from a patch.
    ///
    /// `None` keeps the current state. Asking to un-resolve a resolved log
    /// is rejected.
    pub fn apply(self, requested: Option<bool>) -> Result<Self, CoreError> {
        match (self, requested) {
            (current, None) => Ok(current),
            (_, Some(true)) => Ok(Self::Resolved),
            (Self::Unresolved, Some(false)) => Ok(Self::Unresolved),
            (Self::Resolved, Some(false)) => Err(CoreError::Validation(
                "A resolved tamper log cannot be reopened".into(),
            )),
        }
    }
}

/// Resolve the event time of a tamper report.
///
/// Devices send Unix epoch milliseconds; reports without a timestamp are
/// stamped with `now`.
pub fn report_time(epoch_millis: Option<i64>, now: Timestamp) -> Result<Timestamp, CoreError> {
    match epoch_millis {
        None => Ok(now),
        Some(millis) => Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
            CoreError::Validation(format!("timestamp {millis} is out of range"))
        }),
    }
}
