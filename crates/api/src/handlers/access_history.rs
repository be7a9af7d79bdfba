//! Handlers for the `/access-history` audit trail.
//!
//! Rows are written only by the access validator; operators can read,
//! aggregate and delete them. All endpoints require authentication.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use doorctl_core::pagination::Paginated;
use doorctl_core::stats::AccessStats;
use doorctl_core::types::DbId;
use doorctl_db::models::access_history::AccessHistoryEntry;
use doorctl_db::repositories::access_history_repo::HistoryFilter;
use doorctl_db::repositories::{AccessHistoryRepo, DoorRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::extract::{Path, Query};
use crate::query::PageParams;
use crate::state::AppState;

async fn page(
    state: &AppState,
    filter: HistoryFilter<'_>,
    params: &PageParams,
) -> AppResult<Json<Paginated<AccessHistoryEntry>>> {
    let request = params.to_request();
    let (rows, total) = AccessHistoryRepo::list_page(&state.pool, filter, request).await?;
    Ok(Json(Paginated::new(rows, total, request)))
}

/// GET /api/v1/access-history?page=&limit=
///
/// Newest first.
pub async fn list_history(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Paginated<AccessHistoryEntry>>> {
    page(&state, HistoryFilter::All, &params).await
}

/// GET /api/v1/access-history/stats
pub async fn history_stats(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<AccessStats>> {
    let (total, successful, failed) = AccessHistoryRepo::counts(&state.pool).await?;
    Ok(Json(AccessStats::from_counts(total, successful, failed)))
}

/// GET /api/v1/access-history/door/{door_id}
pub async fn history_by_door(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(door_id): Path<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Paginated<AccessHistoryEntry>>> {
    if DoorRepo::find_by_id(&state.pool, door_id).await?.is_none() {
        return Err(AppError::not_found("Door", door_id));
    }
    page(&state, HistoryFilter::Door(door_id), &params).await
}

/// GET /api/v1/access-history/tag/{tag_id}
///
/// `tag_id` is the presented tag string, so attempts with unregistered tags
/// can be looked up too.
pub async fn history_by_tag(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(tag_id): Path<String>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Paginated<AccessHistoryEntry>>> {
    page(&state, HistoryFilter::Tag(&tag_id), &params).await
}

/// DELETE /api/v1/access-history/{id}
pub async fn delete_history(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !AccessHistoryRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("AccessHistory", id));
    }

    tracing::info!(
        history_id = id,
        user_id = auth.user_id,
        username = %auth.username,
        "Access history row deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}
