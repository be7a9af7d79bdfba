//! Door entity model and DTOs.

use doorctl_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::access_history::AccessHistory;
use crate::models::door_permission::PermissionWithTag;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `doors` table. `client_id` identifies the edge device
/// mounted at the door and is unique.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Door {
    pub id: DbId,
    pub name: String,
    pub location: Option<String>,
    pub client_id: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Door as listed on `GET /doors`: the row, its permissions and the number
/// of audited access attempts.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoorListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub door: Door,
    pub access_count: i64,
    #[sqlx(skip)]
    pub permissions: Vec<PermissionWithTag>,
}

/// Door detail: the row, its permissions and its most recent access history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoorDetail {
    #[serde(flatten)]
    pub door: Door,
    pub permissions: Vec<PermissionWithTag>,
    pub access_history: Vec<AccessHistory>,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a door.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateDoor {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub name: String,
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub location: Option<String>,
    #[validate(length(min = 1, max = 128, message = "must be 1-128 characters"))]
    pub client_id: String,
}

/// DTO for patching a door. Only non-`None` fields are applied;
/// `location: null` clears the location.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateDoor {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub location: Option<Option<String>>,
    #[validate(length(min = 1, max = 128, message = "must be 1-128 characters"))]
    pub client_id: Option<String>,
    pub is_active: Option<bool>,
}
