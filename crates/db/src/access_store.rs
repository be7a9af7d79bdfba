//! PostgreSQL implementation of the access validator's storage seam.

use async_trait::async_trait;
use doorctl_core::access::{AccessAttempt, AccessStore, DoorRef, TagGrants};
use doorctl_core::types::DbId;

use crate::models::access_history::CreateAccessHistory;
use crate::repositories::{AccessHistoryRepo, DoorRepo, NfcTagRepo};
use crate::DbPool;

/// [`AccessStore`] backed by the repositories. Each call is its own round
/// trip on the pool.
#[derive(Debug, Clone)]
pub struct PgAccessStore {
    pool: DbPool,
}

impl PgAccessStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessStore for PgAccessStore {
    type Error = sqlx::Error;

    async fn find_door(
        &self,
        client_id: &str,
        active_only: bool,
    ) -> Result<Option<DoorRef>, sqlx::Error> {
        let door = DoorRepo::find_by_client_id(&self.pool, client_id, active_only).await?;
        Ok(door.map(|d| DoorRef {
            id: d.id,
            name: d.name,
            client_id: d.client_id,
            is_active: d.is_active,
        }))
    }

    async fn find_active_tag(
        &self,
        tag_id: &str,
        door_id: DbId,
    ) -> Result<Option<TagGrants>, sqlx::Error> {
        NfcTagRepo::find_active_grants(&self.pool, tag_id, door_id).await
    }

    async fn record_attempt(&self, attempt: &AccessAttempt) -> Result<(), sqlx::Error> {
        let input = CreateAccessHistory {
            door_id: attempt.door_id,
            tag_id: attempt.tag_id.clone(),
            access_granted: attempt.access_granted,
            client_ip: attempt.client_ip.clone(),
            image: attempt.image.clone(),
        };
        AccessHistoryRepo::create(&self.pool, &input).await?;
        Ok(())
    }
}
