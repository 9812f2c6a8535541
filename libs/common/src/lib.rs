//! Common library for the Rently backend
//!
//! This crate provides shared infrastructure used by the API service:
//! database connectivity, migrations, and the database error types.

pub mod database;
pub mod error;
