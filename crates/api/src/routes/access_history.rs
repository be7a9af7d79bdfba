use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::access_history;
use crate::state::AppState;

/// Routes mounted at `/access-history`.
///
/// ```text
/// GET    /                  -> list_history
/// GET    /stats             -> history_stats
/// GET    /door/{door_id}    -> history_by_door
/// GET    /tag/{tag_id}      -> history_by_tag
/// DELETE /{id}              -> delete_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(access_history::list_history))
        .route("/stats", get(access_history::history_stats))
        .route("/door/{door_id}", get(access_history::history_by_door))
        .route("/tag/{tag_id}", get(access_history::history_by_tag))
        .route("/{id}", delete(access_history::delete_history))
}
