pub mod access_history;
pub mod alarm;
pub mod auth;
pub mod doors;
pub mod tags;
