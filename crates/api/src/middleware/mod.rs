//! Request extractors shared by the handlers.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated operator from a JWT Bearer token.
//! - [`validated_json::ValidatedJson`] -- JSON body that has passed field validation.
//! - [`extract::Path`], [`extract::Query`] -- URL extractors with enveloped rejections.

pub mod auth;
pub mod extract;
pub mod validated_json;
