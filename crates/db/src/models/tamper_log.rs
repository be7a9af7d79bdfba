//! Tamper-log model and DTOs.

use doorctl_core::tamper::TamperStatus;
use doorctl_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `tamper_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TamperLog {
    pub id: DbId,
    pub client_id: String,
    pub timestamp: Timestamp,
    pub image: Option<String>,
    pub resolved: bool,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TamperLog {
    pub fn status(&self) -> TamperStatus {
        TamperStatus::from_resolved(self.resolved)
    }
}

/// Body of an unauthenticated tamper report from an edge device.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReportTamper {
    #[validate(length(min = 1, max = 128, message = "must be 1-128 characters"))]
    pub client_id: String,
    /// Event kind reported by the device (e.g. `"tamper"`). Logged, not stored.
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub event_type: String,
    /// Unix epoch milliseconds.
    pub timestamp: Option<i64>,
    /// Base64 encoded camera snapshot.
    pub image: Option<String>,
}

/// Insert DTO built from a [`ReportTamper`].
#[derive(Debug, Clone)]
pub struct CreateTamperLog {
    pub client_id: String,
    pub timestamp: Timestamp,
    pub image: Option<String>,
}

/// Operator patch. `notes: null` clears the notes.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTamperLog {
    pub resolved: Option<bool>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub notes: Option<Option<String>>,
}

/// Body of the explicit resolve action.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResolveTamperLog {
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub notes: Option<String>,
}
