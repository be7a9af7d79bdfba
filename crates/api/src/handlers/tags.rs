//! Handlers for the `/tags` resource.
//!
//! `POST /tags/validate` is called by edge devices and is unauthenticated.
//! Every other endpoint requires an operator token via [`AuthUser`].

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use doorctl_core::access::{validate_access, AccessRequest};
use doorctl_core::error::CoreError;
use doorctl_core::types::DbId;
use doorctl_db::models::door_permission::{PermissionWithDoor, SetPermissionActive};
use doorctl_db::models::nfc_tag::{CreateNfcTag, NfcTagWithPermissions, UpdateNfcTag};
use doorctl_db::repositories::{DoorPermissionRepo, DoorRepo, NfcTagRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::extract::Path;
use crate::middleware::validated_json::ValidatedJson;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Access validation
// ---------------------------------------------------------------------------

/// Body of `POST /tags/validate`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ValidateTagRequest {
    #[validate(length(min = 1, max = 128, message = "must be 1-128 characters"))]
    pub tag_id: String,
    #[validate(length(min = 1, max = 128, message = "must be 1-128 characters"))]
    pub client_id: String,
    /// Base64 encoded camera snapshot.
    pub image: Option<String>,
}

/// Decision returned to the edge device.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateTagResponse {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub door_id: Option<DbId>,
}

/// POST /api/v1/tags/validate
///
/// Decide whether the tag may open the door bound to `clientId`. The attempt
/// is audited whenever a door can be attributed; the reason for a denial is
/// only logged.
pub async fn validate_tag(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ValidateTagRequest>,
) -> AppResult<Json<ValidateTagResponse>> {
    let store = state.access_store();
    let request = AccessRequest {
        tag_id: &input.tag_id,
        client_id: &input.client_id,
        image: input.image.as_deref(),
    };

    let decision = validate_access(&store, &request, state.config.audit_failure_policy).await?;

    Ok(Json(ValidateTagResponse {
        allowed: decision.allowed,
        door_id: decision.door_id,
    }))
}

// ---------------------------------------------------------------------------
// Tag CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/tags
///
/// Every tag with the doors it is linked to.
pub async fn list_tags(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tags = NfcTagRepo::list(&state.pool).await?;
    let permissions = DoorPermissionRepo::list_with_doors(&state.pool).await?;

    let mut by_tag: HashMap<DbId, Vec<PermissionWithDoor>> = HashMap::new();
    for permission in permissions {
        by_tag.entry(permission.tag_id).or_default().push(permission);
    }

    let data: Vec<NfcTagWithPermissions> = tags
        .into_iter()
        .map(|tag| {
            let permissions = by_tag.remove(&tag.id).unwrap_or_default();
            NfcTagWithPermissions { tag, permissions }
        })
        .collect();

    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/tags/{id}
pub async fn get_tag(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tag = NfcTagRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("NfcTag", id))?;
    let permissions = DoorPermissionRepo::list_for_tag(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: NfcTagWithPermissions { tag, permissions },
    }))
}

/// POST /api/v1/tags
///
/// A duplicate `tagId` is rejected with 409.
pub async fn create_tag(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateNfcTag>,
) -> AppResult<impl IntoResponse> {
    let tag = NfcTagRepo::create(&state.pool, &input).await?;

    tracing::info!(tag_pk = tag.id, user_id = auth.user_id, "NFC tag registered");

    Ok((StatusCode::CREATED, Json(DataResponse { data: tag })))
}

/// PATCH /api/v1/tags/{id}
pub async fn update_tag(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateNfcTag>,
) -> AppResult<impl IntoResponse> {
    let tag = NfcTagRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("NfcTag", id))?;

    tracing::info!(tag_pk = id, user_id = auth.user_id, "NFC tag updated");

    Ok(Json(DataResponse { data: tag }))
}

/// DELETE /api/v1/tags/{id}
///
/// The tag's permissions are removed with it. Access history keeps the
/// presented tag string.
pub async fn delete_tag(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !NfcTagRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("NfcTag", id));
    }

    tracing::info!(
        tag_pk = id,
        user_id = auth.user_id,
        username = %auth.username,
        "NFC tag deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Door permissions
// ---------------------------------------------------------------------------

/// Ensure both ends of a permission link exist.
async fn ensure_pair_exists(state: &AppState, tag_id: DbId, door_id: DbId) -> AppResult<()> {
    if NfcTagRepo::find_by_id(&state.pool, tag_id).await?.is_none() {
        return Err(AppError::not_found("NfcTag", tag_id));
    }
    if DoorRepo::find_by_id(&state.pool, door_id).await?.is_none() {
        return Err(AppError::not_found("Door", door_id));
    }
    Ok(())
}

/// POST /api/v1/tags/{tag_id}/doors/{door_id}
///
/// Grant the tag access to the door. Repeating the call adds another link.
pub async fn assign_door(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((tag_id, door_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    ensure_pair_exists(&state, tag_id, door_id).await?;

    let permission = DoorPermissionRepo::assign(&state.pool, tag_id, door_id).await?;

    tracing::info!(
        permission_id = permission.id,
        tag_pk = tag_id,
        door_id,
        user_id = auth.user_id,
        "Door permission assigned",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: permission })))
}

/// DELETE /api/v1/tags/{tag_id}/doors/{door_id}
///
/// Remove every link between the tag and the door.
pub async fn remove_door(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((tag_id, door_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    ensure_pair_exists(&state, tag_id, door_id).await?;

    let removed = DoorPermissionRepo::remove(&state.pool, tag_id, door_id).await?;

    tracing::info!(
        tag_pk = tag_id,
        door_id,
        removed,
        user_id = auth.user_id,
        "Door permissions removed",
    );

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/tags/{tag_id}/doors/{door_id}
///
/// Activate or deactivate every link between the tag and the door.
pub async fn set_door_permission_active(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((tag_id, door_id)): Path<(DbId, DbId)>,
    ValidatedJson(input): ValidatedJson<SetPermissionActive>,
) -> AppResult<impl IntoResponse> {
    let permissions =
        DoorPermissionRepo::set_active(&state.pool, tag_id, door_id, input.is_active).await?;

    if permissions.is_empty() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Door permission for tag",
            id: tag_id,
        }));
    }

    tracing::info!(
        tag_pk = tag_id,
        door_id,
        is_active = input.is_active,
        user_id = auth.user_id,
        "Door permissions toggled",
    );

    Ok(Json(DataResponse { data: permissions }))
}
