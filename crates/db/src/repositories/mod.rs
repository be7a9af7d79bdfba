//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod access_history_repo;
pub mod door_permission_repo;
pub mod door_repo;
pub mod nfc_tag_repo;
pub mod tamper_log_repo;
pub mod user_repo;

pub use access_history_repo::AccessHistoryRepo;
pub use door_permission_repo::DoorPermissionRepo;
pub use door_repo::DoorRepo;
pub use nfc_tag_repo::NfcTagRepo;
pub use tamper_log_repo::TamperLogRepo;
pub use user_repo::UserRepo;
