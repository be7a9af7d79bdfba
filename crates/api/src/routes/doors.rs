use axum::routing::get;
use axum::Router;

use crate::handlers::doors;
use crate::state::AppState;

/// Routes mounted at `/doors`.
///
/// ```text
/// GET    /                  -> list_doors
/// POST   /                  -> create_door
/// GET    /{id}              -> get_door
/// PATCH  /{id}              -> update_door
/// DELETE /{id}              -> delete_door
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(doors::list_doors).post(doors::create_door))
        .route(
            "/{id}",
            get(doors::get_door)
                .patch(doors::update_door)
                .delete(doors::delete_door),
        )
}
