//! Handlers for the `/alarm/tamper` resource.
//!
//! Edge devices report tamper events without credentials. Reading,
//! resolving and deleting logs requires an operator token.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use doorctl_core::tamper::report_time;
use doorctl_core::types::DbId;
use doorctl_db::models::tamper_log::{
    CreateTamperLog, ReportTamper, ResolveTamperLog, UpdateTamperLog,
};
use doorctl_db::repositories::TamperLogRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::extract::{Path, Query};
use crate::middleware::validated_json::ValidatedJson;
use crate::query::TamperListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Acknowledgement sent back to the reporting device.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTamperResponse {
    pub success: bool,
    pub message: &'static str,
    pub log_id: DbId,
}

/// POST /api/v1/alarm/tamper
pub async fn report_tamper(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ReportTamper>,
) -> AppResult<impl IntoResponse> {
    let timestamp = report_time(input.timestamp, Utc::now())?;

    let log = TamperLogRepo::create(
        &state.pool,
        &CreateTamperLog {
            client_id: input.client_id,
            timestamp,
            image: input.image,
        },
    )
    .await?;

    tracing::warn!(
        log_id = log.id,
        client_id = %log.client_id,
        event_type = %input.event_type,
        has_image = log.image.is_some(),
        "Tamper event reported",
    );

    Ok((
        StatusCode::CREATED,
        Json(ReportTamperResponse {
            success: true,
            message: "Tamper event logged",
            log_id: log.id,
        }),
    ))
}

/// GET /api/v1/alarm/tamper?unresolved=
pub async fn list_tamper_logs(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TamperListParams>,
) -> AppResult<impl IntoResponse> {
    let logs = TamperLogRepo::list(&state.pool, params.unresolved).await?;
    Ok(Json(DataResponse { data: logs }))
}

/// GET /api/v1/alarm/tamper/statistics
pub async fn tamper_statistics(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stats = TamperLogRepo::statistics(&state.pool).await?;
    Ok(Json(stats))
}

/// GET /api/v1/alarm/tamper/client/{client_id}
pub async fn tamper_logs_by_client(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let logs = TamperLogRepo::list_by_client_id(&state.pool, &client_id).await?;
    Ok(Json(DataResponse { data: logs }))
}

/// GET /api/v1/alarm/tamper/{id}
pub async fn get_tamper_log(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let log = TamperLogRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("TamperLog", id))?;
    Ok(Json(DataResponse { data: log }))
}

/// PATCH /api/v1/alarm/tamper/{id}
///
/// Patch `resolved` and/or `notes`. A resolved log cannot be reopened.
pub async fn update_tamper_log(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateTamperLog>,
) -> AppResult<impl IntoResponse> {
    let current = TamperLogRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("TamperLog", id))?;
    let next = current.status().apply(input.resolved)?;

    let log = TamperLogRepo::update(
        &state.pool,
        id,
        Some(next.is_resolved()),
        input.notes.as_ref().map(|n| n.as_deref()),
    )
    .await?
    .ok_or(AppError::not_found("TamperLog", id))?;

    tracing::info!(
        log_id = id,
        resolved = log.resolved,
        user_id = auth.user_id,
        "Tamper log updated",
    );

    Ok(Json(DataResponse { data: log }))
}

/// PATCH /api/v1/alarm/tamper/{id}/resolve
///
/// Resolve the log and replace its notes. Repeating the call on a resolved
/// log only rewrites the notes.
pub async fn resolve_tamper_log(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<ResolveTamperLog>,
) -> AppResult<impl IntoResponse> {
    let current = TamperLogRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("TamperLog", id))?;
    let next = current.status().resolve();

    let log = TamperLogRepo::update(
        &state.pool,
        id,
        Some(next.is_resolved()),
        Some(input.notes.as_deref()),
    )
    .await?
    .ok_or(AppError::not_found("TamperLog", id))?;

    tracing::info!(
        log_id = id,
        was_resolved = current.resolved,
        user_id = auth.user_id,
        username = %auth.username,
        "Tamper log resolved",
    );

    Ok(Json(DataResponse { data: log }))
}

/// DELETE /api/v1/alarm/tamper/{id}
pub async fn delete_tamper_log(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !TamperLogRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("TamperLog", id));
    }

    tracing::info!(
        log_id = id,
        user_id = auth.user_id,
        username = %auth.username,
        "Tamper log deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}
