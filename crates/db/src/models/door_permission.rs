//! Door permission (door <-> tag join) models and DTOs.

use doorctl_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `door_permissions` table. `tag_id` references
/// `nfc_tags.id`, not the printed tag string.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoorPermission {
    pub id: DbId,
    pub door_id: DbId,
    pub tag_id: DbId,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// Permission joined with a summary of its tag, as shown on a door.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionWithTag {
    pub id: DbId,
    pub door_id: DbId,
    pub tag_id: DbId,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub tag_uid: String,
    pub tag_name: Option<String>,
    pub tag_owner_name: Option<String>,
    pub tag_is_active: bool,
}

/// Permission joined with a summary of its door, as shown on a tag.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionWithDoor {
    pub id: DbId,
    pub door_id: DbId,
    pub tag_id: DbId,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub door_name: String,
    pub door_client_id: String,
    pub door_is_active: bool,
}

/// Body for `PATCH /tags/{tag_id}/doors/{door_id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SetPermissionActive {
    pub is_active: bool,
}
