//! `Path` and `Query` extractors whose rejections use the `{ error, code }`
//! envelope instead of axum's plain-text bodies.

use axum::extract::FromRequestParts;

use crate::error::AppError;

/// Drop-in for [`axum::extract::Path`]. A segment that does not parse
/// (e.g. `/doors/abc`) is a 400 `BAD_REQUEST`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

/// Drop-in for [`axum::extract::Query`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);
