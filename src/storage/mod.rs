//! Storage layer for Roster Core.
//!
//! Provides database access via SQLx with SQLite.

mod models;
mod repository;

pub use repository::{Database, Repository};
