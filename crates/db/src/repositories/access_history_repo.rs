//! Repository for the `access_history` audit table.

use doorctl_core::pagination::PageRequest;
use doorctl_core::types::DbId;
use sqlx::PgPool;

use crate::models::access_history::{AccessHistory, AccessHistoryEntry, CreateAccessHistory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, door_id, tag_id, access_granted, \"timestamp\", client_ip, image";

/// History columns joined with the door summary (`h` and `d` aliases).
const ENTRY_COLUMNS: &str = "h.id, h.door_id, h.tag_id, h.access_granted, h.\"timestamp\", \
                             h.client_ip, h.image, \
                             d.name AS door_name, d.client_id AS door_client_id";

/// Row filter for paginated listings.
#[derive(Debug, Clone, Copy)]
pub enum HistoryFilter<'a> {
    All,
    Door(DbId),
    Tag(&'a str),
}

/// Provides append, read and delete operations on the audit trail.
pub struct AccessHistoryRepo;

impl AccessHistoryRepo {
    /// Append one audit row stamped with the current time.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAccessHistory,
    ) -> Result<AccessHistory, sqlx::Error> {
        let query = format!(
            "INSERT INTO access_history (door_id, tag_id, access_granted, client_ip, image) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AccessHistory>(&query)
            .bind(input.door_id)
            .bind(&input.tag_id)
            .bind(input.access_granted)
            .bind(&input.client_ip)
            .bind(&input.image)
            .fetch_one(pool)
            .await
    }

    /// One page of history, newest first, plus the total matching row count.
    pub async fn list_page(
        pool: &PgPool,
        filter: HistoryFilter<'_>,
        page: PageRequest,
    ) -> Result<(Vec<AccessHistoryEntry>, i64), sqlx::Error> {
        let where_clause = match filter {
            HistoryFilter::All => "",
            HistoryFilter::Door(_) => "WHERE h.door_id = $3",
            HistoryFilter::Tag(_) => "WHERE h.tag_id = $3",
        };
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM access_history h \
             JOIN doors d ON d.id = h.door_id \
             {where_clause} \
             ORDER BY h.\"timestamp\" DESC, h.id DESC \
             LIMIT $1 OFFSET $2"
        );
        let count_query = format!(
            "SELECT COUNT(*) FROM access_history h {}",
            where_clause.replace("$3", "$1")
        );

        let rows = sqlx::query_as::<_, AccessHistoryEntry>(&query)
            .bind(page.limit)
            .bind(page.offset());
        let count = sqlx::query_scalar::<_, i64>(&count_query);

        let (rows, count) = match filter {
            HistoryFilter::All => (rows, count),
            HistoryFilter::Door(door_id) => (rows.bind(door_id), count.bind(door_id)),
            HistoryFilter::Tag(tag_id) => (rows.bind(tag_id), count.bind(tag_id)),
        };

        let data = rows.fetch_all(pool).await?;
        let total = count.fetch_one(pool).await?;
        Ok((data, total))
    }

    /// The most recent rows recorded against one door.
    pub async fn recent_for_door(
        pool: &PgPool,
        door_id: DbId,
        limit: i64,
    ) -> Result<Vec<AccessHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM access_history \
             WHERE door_id = $1 \
             ORDER BY \"timestamp\" DESC, id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, AccessHistory>(&query)
            .bind(door_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Total, granted and denied attempt counts.
    pub async fn counts(pool: &PgPool) -> Result<(i64, i64, i64), sqlx::Error> {
        sqlx::query_as(
            "SELECT COUNT(*), \
                    COUNT(*) FILTER (WHERE access_granted), \
                    COUNT(*) FILTER (WHERE NOT access_granted) \
             FROM access_history",
        )
        .fetch_one(pool)
        .await
    }

    /// Hard-delete one row. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM access_history WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
