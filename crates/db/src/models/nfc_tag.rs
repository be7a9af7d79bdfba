//! NFC tag entity model and DTOs.

use doorctl_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::door_permission::PermissionWithDoor;

/// A row from the `nfc_tags` table. `tag_id` is the id encoded on the
/// physical token and is unique; `id` is the internal key.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NfcTag {
    pub id: DbId,
    pub tag_id: String,
    pub name: Option<String>,
    pub owner_name: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Tag together with the doors it is linked to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NfcTagWithPermissions {
    #[serde(flatten)]
    pub tag: NfcTag,
    pub permissions: Vec<PermissionWithDoor>,
}

/// DTO for registering a tag.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateNfcTag {
    #[validate(length(min = 1, max = 128, message = "must be 1-128 characters"))]
    pub tag_id: String,
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub owner_name: Option<String>,
}

/// DTO for patching a tag. The printed `tagId` is immutable; `name` and
/// `ownerName` are cleared by an explicit `null`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateNfcTag {
    #[serde(default, deserialize_with = "crate::models::double_option")]
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub owner_name: Option<Option<String>>,
    pub is_active: Option<bool>,
}
