//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Wire names are camelCase; unknown request fields are rejected. Nullable
//! columns are patched through `Option<Option<T>>`: an omitted field is
//! `None` (keep), an explicit `null` is `Some(None)` (clear).

use serde::{Deserialize, Deserializer};

pub mod access_history;
pub mod door;
pub mod door_permission;
pub mod nfc_tag;
pub mod tamper_log;
pub mod user;

/// Deserialize a present field into `Some(value)`, keeping `null` as
/// `Some(None)`. Pair with `#[serde(default)]` so an omitted field is `None`.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
