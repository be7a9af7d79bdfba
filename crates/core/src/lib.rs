//! Domain types and pure logic for the door access service.
//!
//! Nothing in this crate talks to a database or an HTTP stack; storage is
//! reached through the [`access::AccessStore`] trait so the validator can be
//! exercised with in-memory fakes.

pub mod access;
pub mod error;
pub mod pagination;
pub mod roles;
pub mod stats;
pub mod tamper;
pub mod types;
