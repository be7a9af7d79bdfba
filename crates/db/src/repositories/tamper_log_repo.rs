//! Repository for the `tamper_logs` table.

use doorctl_core::stats::TamperStats;
use doorctl_core::types::DbId;
use sqlx::PgPool;

use crate::models::tamper_log::{CreateTamperLog, TamperLog};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, client_id, \"timestamp\", image, resolved, notes, created_at, updated_at";

/// Provides ingestion and operator operations for tamper logs.
pub struct TamperLogRepo;

impl TamperLogRepo {
    /// Insert a new, unresolved tamper log.
    pub async fn create(pool: &PgPool, input: &CreateTamperLog) -> Result<TamperLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO tamper_logs (client_id, \"timestamp\", image) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TamperLog>(&query)
            .bind(&input.client_id)
            .bind(input.timestamp)
            .bind(&input.image)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TamperLog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tamper_logs WHERE id = $1");
        sqlx::query_as::<_, TamperLog>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tamper logs newest first, optionally only the unresolved ones.
    pub async fn list(pool: &PgPool, unresolved_only: bool) -> Result<Vec<TamperLog>, sqlx::Error> {
        let query = if unresolved_only {
            format!(
                "SELECT {COLUMNS} FROM tamper_logs WHERE resolved = false \
                 ORDER BY \"timestamp\" DESC, id DESC"
            )
        } else {
            format!("SELECT {COLUMNS} FROM tamper_logs ORDER BY \"timestamp\" DESC, id DESC")
        };
        sqlx::query_as::<_, TamperLog>(&query).fetch_all(pool).await
    }

    /// Logs reported by one edge device, newest first.
    pub async fn list_by_client_id(
        pool: &PgPool,
        client_id: &str,
    ) -> Result<Vec<TamperLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tamper_logs WHERE client_id = $1 \
             ORDER BY \"timestamp\" DESC, id DESC"
        );
        sqlx::query_as::<_, TamperLog>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Patch `resolved` and/or `notes`. Only non-`None` fields are applied;
    /// `Some(None)` clears the notes.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        resolved: Option<bool>,
        notes: Option<Option<&str>>,
    ) -> Result<Option<TamperLog>, sqlx::Error> {
        let query = format!(
            "UPDATE tamper_logs SET \
                resolved = COALESCE($2, resolved), \
                notes = CASE WHEN $3 THEN $4 ELSE notes END \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TamperLog>(&query)
            .bind(id)
            .bind(resolved)
            .bind(notes.is_some())
            .bind(notes.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a log. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tamper_logs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn statistics(pool: &PgPool) -> Result<TamperStats, sqlx::Error> {
        let (total, unresolved, resolved): (i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), \
                    COUNT(*) FILTER (WHERE NOT resolved), \
                    COUNT(*) FILTER (WHERE resolved) \
             FROM tamper_logs",
        )
        .fetch_one(pool)
        .await?;
        Ok(TamperStats {
            total,
            unresolved,
            resolved,
        })
    }
}
