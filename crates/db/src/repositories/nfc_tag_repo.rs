//! Repository for the `nfc_tags` table.

use doorctl_core::access::TagGrants;
use doorctl_core::types::DbId;
use sqlx::PgPool;

use crate::models::nfc_tag::{CreateNfcTag, NfcTag, UpdateNfcTag};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, tag_id, name, owner_name, is_active, created_at, updated_at";

/// Provides CRUD operations for NFC tags.
pub struct NfcTagRepo;

impl NfcTagRepo {
    /// Insert a new tag, returning the created row.
    ///
    /// A duplicate `tag_id` fails with the `uq_nfc_tags_tag_id` violation.
    pub async fn create(pool: &PgPool, input: &CreateNfcTag) -> Result<NfcTag, sqlx::Error> {
        let query = format!(
            "INSERT INTO nfc_tags (tag_id, name, owner_name) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NfcTag>(&query)
            .bind(&input.tag_id)
            .bind(&input.name)
            .bind(&input.owner_name)
            .fetch_one(pool)
            .await
    }

    /// Find a tag by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<NfcTag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM nfc_tags WHERE id = $1");
        sqlx::query_as::<_, NfcTag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all tags, ordered by printed tag id.
    pub async fn list(pool: &PgPool) -> Result<Vec<NfcTag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM nfc_tags ORDER BY tag_id");
        sqlx::query_as::<_, NfcTag>(&query).fetch_all(pool).await
    }

    /// Find an active tag by its printed id and count its active permissions
    /// on one door.
    ///
    /// Returns `None` when the tag is unknown or deactivated.
    pub async fn find_active_grants(
        pool: &PgPool,
        tag_id: &str,
        door_id: DbId,
    ) -> Result<Option<TagGrants>, sqlx::Error> {
        let row: Option<(DbId, i64)> = sqlx::query_as(
            "SELECT t.id, \
                    (SELECT COUNT(*) FROM door_permissions p \
                     WHERE p.tag_id = t.id AND p.door_id = $2 AND p.is_active = true) \
             FROM nfc_tags t \
             WHERE t.tag_id = $1 AND t.is_active = true",
        )
        .bind(tag_id)
        .bind(door_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|(tag_pk, active_permissions)| TagGrants {
            tag_pk,
            active_permissions,
        }))
    }

    /// Update a tag. Only non-`None` fields are applied; an inner `None`
    /// clears `name` or `owner_name`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNfcTag,
    ) -> Result<Option<NfcTag>, sqlx::Error> {
        let query = format!(
            "UPDATE nfc_tags SET \
                name = CASE WHEN $2 THEN $3 ELSE name END, \
                owner_name = CASE WHEN $4 THEN $5 ELSE owner_name END, \
                is_active = COALESCE($6, is_active) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NfcTag>(&query)
            .bind(id)
            .bind(input.name.is_some())
            .bind(input.name.as_ref().and_then(|v| v.as_deref()))
            .bind(input.owner_name.is_some())
            .bind(input.owner_name.as_ref().and_then(|v| v.as_deref()))
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a tag. Its permissions cascade; history rows keep the
    /// printed tag id.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM nfc_tags WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
