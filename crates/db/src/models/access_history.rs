//! Access-history (audit trail) models.

use doorctl_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `access_history` table. Append-only apart from operator
/// deletion. `tag_id` is the presented tag string and may name a tag that
/// was never registered.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessHistory {
    pub id: DbId,
    pub door_id: DbId,
    pub tag_id: String,
    pub access_granted: bool,
    pub timestamp: Timestamp,
    pub client_ip: Option<String>,
    pub image: Option<String>,
}

/// History row joined with the door it was recorded against.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessHistoryEntry {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub entry: AccessHistory,
    pub door_name: String,
    pub door_client_id: String,
}

/// Insert DTO. Only the access validator creates rows.
#[derive(Debug, Clone)]
pub struct CreateAccessHistory {
    pub door_id: DbId,
    pub tag_id: String,
    pub access_granted: bool,
    pub client_ip: Option<String>,
    pub image: Option<String>,
}
