pub mod access_history;
pub mod alarm;
pub mod auth;
pub mod doors;
pub mod health;
pub mod tags;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/profile                                    current operator
///
/// /doors                                           list, create
/// /doors/{id}                                      get, update, delete
///
/// /tags/validate                                   access decision (public, edge devices)
/// /tags                                            list, create
/// /tags/{id}                                       get, update, delete
/// /tags/{id}/doors/{door_id}                       assign, toggle, remove permission
///
/// /access-history                                  paginated list
/// /access-history/stats                            totals and success rate
/// /access-history/door/{door_id}                   paginated, one door
/// /access-history/tag/{tag_id}                     paginated, one presented tag
/// /access-history/{id}                             delete
///
/// /alarm/tamper                                    report (public), list
/// /alarm/tamper/statistics                         counts by state
/// /alarm/tamper/client/{client_id}                 logs of one device
/// /alarm/tamper/{id}                               get, update, delete
/// /alarm/tamper/{id}/resolve                       resolve with notes
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/doors", doors::router())
        .nest("/tags", tags::router())
        .nest("/access-history", access_history::router())
        .nest("/alarm/tamper", alarm::router())
}
