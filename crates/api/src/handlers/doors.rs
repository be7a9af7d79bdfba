//! Handlers for the `/doors` resource.
//!
//! All endpoints require authentication via [`AuthUser`].

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use doorctl_core::error::CoreError;
use doorctl_core::types::DbId;
use doorctl_db::models::door::{CreateDoor, DoorDetail, UpdateDoor};
use doorctl_db::models::door_permission::PermissionWithTag;
use doorctl_db::repositories::{AccessHistoryRepo, DoorPermissionRepo, DoorRepo};

use crate::error::{is_foreign_key_violation, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::extract::Path;
use crate::middleware::validated_json::ValidatedJson;
use crate::response::DataResponse;
use crate::state::AppState;

/// Number of history rows embedded in a door detail.
const RECENT_HISTORY_LIMIT: i64 = 10;

/// GET /api/v1/doors
///
/// Every door with its permissions and access-attempt count, ordered by name.
pub async fn list_doors(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let mut doors = DoorRepo::list_with_counts(&state.pool).await?;
    let permissions = DoorPermissionRepo::list_with_tags(&state.pool).await?;

    let mut by_door: HashMap<DbId, Vec<PermissionWithTag>> = HashMap::new();
    for permission in permissions {
        by_door.entry(permission.door_id).or_default().push(permission);
    }
    for item in &mut doors {
        item.permissions = by_door.remove(&item.door.id).unwrap_or_default();
    }

    Ok(Json(DataResponse { data: doors }))
}

/// GET /api/v1/doors/{id}
pub async fn get_door(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let door = DoorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Door", id))?;
    let permissions = DoorPermissionRepo::list_for_door(&state.pool, id).await?;
    let access_history =
        AccessHistoryRepo::recent_for_door(&state.pool, id, RECENT_HISTORY_LIMIT).await?;

    Ok(Json(DataResponse {
        data: DoorDetail {
            door,
            permissions,
            access_history,
        },
    }))
}

/// POST /api/v1/doors
///
/// A duplicate `clientId` is rejected with 409.
pub async fn create_door(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateDoor>,
) -> AppResult<impl IntoResponse> {
    let door = DoorRepo::create(&state.pool, &input).await?;

    tracing::info!(
        door_id = door.id,
        client_id = %door.client_id,
        user_id = auth.user_id,
        "Door created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: door })))
}

/// PATCH /api/v1/doors/{id}
pub async fn update_door(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateDoor>,
) -> AppResult<impl IntoResponse> {
    let door = DoorRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Door", id))?;

    tracing::info!(door_id = id, user_id = auth.user_id, "Door updated");

    Ok(Json(DataResponse { data: door }))
}

/// DELETE /api/v1/doors/{id}
///
/// Permissions of the door are removed with it. A door that has access
/// history is refused with 409 so the audit trail stays intact.
pub async fn delete_door(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = DoorRepo::delete(&state.pool, id).await.map_err(|err| {
        if is_foreign_key_violation(&err) {
            AppError::Core(CoreError::Conflict(format!(
                "Door with id {id} has access history and cannot be deleted"
            )))
        } else {
            AppError::Database(err)
        }
    })?;
    if !deleted {
        return Err(AppError::not_found("Door", id));
    }

    tracing::info!(
        door_id = id,
        user_id = auth.user_id,
        username = %auth.username,
        "Door deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}
