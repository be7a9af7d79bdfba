use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::alarm;
use crate::state::AppState;

/// Routes mounted at `/alarm/tamper`.
///
/// ```text
/// POST   /                       -> report_tamper (public)
/// GET    /                       -> list_tamper_logs
/// GET    /statistics             -> tamper_statistics
/// GET    /client/{client_id}     -> tamper_logs_by_client
/// GET    /{id}                   -> get_tamper_log
/// PATCH  /{id}                   -> update_tamper_log
/// DELETE /{id}                   -> delete_tamper_log
/// PATCH  /{id}/resolve           -> resolve_tamper_log
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(alarm::list_tamper_logs).post(alarm::report_tamper),
        )
        .route("/statistics", get(alarm::tamper_statistics))
        .route("/client/{client_id}", get(alarm::tamper_logs_by_client))
        .route(
            "/{id}",
            get(alarm::get_tamper_log)
                .patch(alarm::update_tamper_log)
                .delete(alarm::delete_tamper_log),
        )
        .route("/{id}/resolve", patch(alarm::resolve_tamper_log))
}
