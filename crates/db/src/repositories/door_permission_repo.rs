//! Repository for the `door_permissions` join table.

use doorctl_core::types::DbId;
use sqlx::PgPool;

use crate::models::door_permission::{DoorPermission, PermissionWithDoor, PermissionWithTag};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, door_id, tag_id, is_active, created_at";

/// Permission columns joined with the tag summary (`t` alias).
const WITH_TAG: &str = "p.id, p.door_id, p.tag_id, p.is_active, p.created_at, \
                        t.tag_id AS tag_uid, t.name AS tag_name, \
                        t.owner_name AS tag_owner_name, t.is_active AS tag_is_active";

/// Permission columns joined with the door summary (`d` alias).
const WITH_DOOR: &str = "p.id, p.door_id, p.tag_id, p.is_active, p.created_at, \
                         d.name AS door_name, d.client_id AS door_client_id, \
                         d.is_active AS door_is_active";

/// Provides operations on door/tag permission links.
pub struct DoorPermissionRepo;

impl DoorPermissionRepo {
    /// Link a tag to a door. Existing links for the pair are not checked, so
    /// repeated assignment adds another row.
    pub async fn assign(
        pool: &PgPool,
        tag_id: DbId,
        door_id: DbId,
    ) -> Result<DoorPermission, sqlx::Error> {
        let query = format!(
            "INSERT INTO door_permissions (door_id, tag_id) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DoorPermission>(&query)
            .bind(door_id)
            .bind(tag_id)
            .fetch_one(pool)
            .await
    }

    /// Delete every link between the pair. Returns the number of rows removed.
    pub async fn remove(pool: &PgPool, tag_id: DbId, door_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM door_permissions WHERE tag_id = $1 AND door_id = $2")
            .bind(tag_id)
            .bind(door_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Set `is_active` on every link between the pair, returning the updated rows.
    pub async fn set_active(
        pool: &PgPool,
        tag_id: DbId,
        door_id: DbId,
        is_active: bool,
    ) -> Result<Vec<DoorPermission>, sqlx::Error> {
        let query = format!(
            "UPDATE door_permissions SET is_active = $3 \
             WHERE tag_id = $1 AND door_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DoorPermission>(&query)
            .bind(tag_id)
            .bind(door_id)
            .bind(is_active)
            .fetch_all(pool)
            .await
    }

    /// All links for the pair, oldest first.
    pub async fn list_for_pair(
        pool: &PgPool,
        tag_id: DbId,
        door_id: DbId,
    ) -> Result<Vec<DoorPermission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM door_permissions \
             WHERE tag_id = $1 AND door_id = $2 ORDER BY id"
        );
        sqlx::query_as::<_, DoorPermission>(&query)
            .bind(tag_id)
            .bind(door_id)
            .fetch_all(pool)
            .await
    }

    /// Every link with its tag summary, ordered by door then id.
    pub async fn list_with_tags(pool: &PgPool) -> Result<Vec<PermissionWithTag>, sqlx::Error> {
        let query = format!(
            "SELECT {WITH_TAG} FROM door_permissions p \
             JOIN nfc_tags t ON t.id = p.tag_id \
             ORDER BY p.door_id, p.id"
        );
        sqlx::query_as::<_, PermissionWithTag>(&query)
            .fetch_all(pool)
            .await
    }

    /// Links of one door with their tag summaries.
    pub async fn list_for_door(
        pool: &PgPool,
        door_id: DbId,
    ) -> Result<Vec<PermissionWithTag>, sqlx::Error> {
        let query = format!(
            "SELECT {WITH_TAG} FROM door_permissions p \
             JOIN nfc_tags t ON t.id = p.tag_id \
             WHERE p.door_id = $1 \
             ORDER BY p.id"
        );
        sqlx::query_as::<_, PermissionWithTag>(&query)
            .bind(door_id)
            .fetch_all(pool)
            .await
    }

    /// Every link with its door summary, ordered by tag then id.
    pub async fn list_with_doors(pool: &PgPool) -> Result<Vec<PermissionWithDoor>, sqlx::Error> {
        let query = format!(
            "SELECT {WITH_DOOR} FROM door_permissions p \
             JOIN doors d ON d.id = p.door_id \
             ORDER BY p.tag_id, p.id"
        );
        sqlx::query_as::<_, PermissionWithDoor>(&query)
            .fetch_all(pool)
            .await
    }

    /// Links of one tag with their door summaries.
    pub async fn list_for_tag(
        pool: &PgPool,
        tag_id: DbId,
    ) -> Result<Vec<PermissionWithDoor>, sqlx::Error> {
        let query = format!(
            "SELECT {WITH_DOOR} FROM door_permissions p \
             JOIN doors d ON d.id = p.door_id \
             WHERE p.tag_id = $1 \
             ORDER BY p.id"
        );
        sqlx::query_as::<_, PermissionWithDoor>(&query)
            .bind(tag_id)
            .fetch_all(pool)
            .await
    }
}
