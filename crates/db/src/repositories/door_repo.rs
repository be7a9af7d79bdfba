//! Repository for the `doors` table.

use doorctl_core::types::DbId;
use sqlx::PgPool;

use crate::models::door::{CreateDoor, Door, DoorListItem, UpdateDoor};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, location, client_id, is_active, created_at, updated_at";

/// Provides CRUD operations for doors.
pub struct DoorRepo;

impl DoorRepo {
    /// Insert a new door, returning the created row.
    ///
    /// A duplicate `client_id` fails with the `uq_doors_client_id` violation.
    pub async fn create(pool: &PgPool, input: &CreateDoor) -> Result<Door, sqlx::Error> {
        let query = format!(
            "INSERT INTO doors (name, location, client_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Door>(&query)
            .bind(&input.name)
            .bind(&input.location)
            .bind(&input.client_id)
            .fetch_one(pool)
            .await
    }

    /// Find a door by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Door>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM doors WHERE id = $1");
        sqlx::query_as::<_, Door>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the door bound to an edge-device client id.
    ///
    /// With `active_only`, a deactivated door is reported as absent.
    pub async fn find_by_client_id(
        pool: &PgPool,
        client_id: &str,
        active_only: bool,
    ) -> Result<Option<Door>, sqlx::Error> {
        let query = if active_only {
            format!("SELECT {COLUMNS} FROM doors WHERE client_id = $1 AND is_active = true")
        } else {
            format!("SELECT {COLUMNS} FROM doors WHERE client_id = $1")
        };
        sqlx::query_as::<_, Door>(&query)
            .bind(client_id)
            .fetch_optional(pool)
            .await
    }

    /// List all doors with their access-history row counts, ordered by name.
    ///
    /// `permissions` is left empty; callers attach it.
    pub async fn list_with_counts(pool: &PgPool) -> Result<Vec<DoorListItem>, sqlx::Error> {
        let query = "SELECT d.id, d.name, d.location, d.client_id, d.is_active, \
                    d.created_at, d.updated_at, \
                    (SELECT COUNT(*) FROM access_history h WHERE h.door_id = d.id) AS access_count \
             FROM doors d \
             ORDER BY d.name, d.id";
        sqlx::query_as::<_, DoorListItem>(query)
            .fetch_all(pool)
            .await
    }

    /// Update a door. Only non-`None` fields are applied.
    ///
    /// `location` uses `Option<Option<String>>` so it can be cleared.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDoor,
    ) -> Result<Option<Door>, sqlx::Error> {
        let location_provided = input.location.is_some();
        let location_value = input.location.as_ref().and_then(|v| v.as_deref());

        let query = format!(
            "UPDATE doors SET \
                name = COALESCE($2, name), \
                location = CASE WHEN $3 THEN $4 ELSE location END, \
                client_id = COALESCE($5, client_id), \
                is_active = COALESCE($6, is_active) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Door>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(location_provided)
            .bind(location_value)
            .bind(&input.client_id)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a door. Its permissions cascade.
    ///
    /// A door with access history is kept and the call fails with a
    /// `fk_access_history_door` violation. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM doors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
