use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tags;
use crate::state::AppState;

/// Routes mounted at `/tags`.
///
/// ```text
/// POST   /validate                       -> validate_tag (public)
/// GET    /                               -> list_tags
/// POST   /                               -> create_tag
/// GET    /{id}                           -> get_tag
/// PATCH  /{id}                           -> update_tag
/// DELETE /{id}                           -> delete_tag
/// POST   /{id}/doors/{door_id}           -> assign_door
/// PATCH  /{id}/doors/{door_id}           -> set_door_permission_active
/// DELETE /{id}/doors/{door_id}           -> remove_door
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/validate", post(tags::validate_tag))
        .route("/", get(tags::list_tags).post(tags::create_tag))
        .route(
            "/{id}",
            get(tags::get_tag)
                .patch(tags::update_tag)
                .delete(tags::delete_tag),
        )
        .route(
            "/{id}/doors/{door_id}",
            post(tags::assign_door)
                .patch(tags::set_door_permission_active)
                .delete(tags::remove_door),
        )
}
