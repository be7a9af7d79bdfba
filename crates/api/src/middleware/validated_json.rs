//! JSON body extractor that runs `validator` rules before the handler.
//!
//! Malformed JSON, wrong types and unknown fields are rejected with
//! `400 BAD_REQUEST`; a missing JSON content type with 415 and an oversized
//! body with 413. Bodies that parse but break a field rule are rejected
//! with `400 VALIDATION_ERROR` and one `details` entry per violation.

use axum::extract::{FromRequest, Request};
use axum::Json;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

/// A `Json<T>` whose payload has passed [`Validate::validate`].
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: serde::de::DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value
            .validate()
            .map_err(|errors| AppError::InvalidInput(flatten_errors(&errors)))?;
        Ok(ValidatedJson(value))
    }
}

/// Rust field names whose JSON name is not their camelCase form.
const RENAMED_FIELDS: &[(&str, &str)] = &[("event_type", "type")];

/// Turn nested validator output into sorted `"<field>: <message>"` lines.
/// Field names are reported in their wire form.
fn flatten_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut details: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = wire_name(&field);
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{field}: {message}")
            })
        })
        .collect();
    details.sort();
    details
}

fn wire_name(field: &str) -> String {
    RENAMED_FIELDS
        .iter()
        .find(|(rust, _)| *rust == field)
        .map(|(_, wire)| wire.to_string())
        .unwrap_or_else(|| to_camel_case(field))
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
