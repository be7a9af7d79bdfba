use std::sync::Arc;

use doorctl_db::access_store::PgAccessStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: doorctl_db::DbPool,
    /// Server configuration (JWT settings, audit policy).
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(pool: doorctl_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }

    /// Storage seam for the access validator, sharing this state's pool.
    pub fn access_store(&self) -> PgAccessStore {
        PgAccessStore::new(self.pool.clone())
    }
}
