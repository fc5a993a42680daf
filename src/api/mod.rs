//! HTTP API layer for Roster Core.
//!
//! Provides REST endpoints for employees, teams and the team hierarchy.

pub mod handlers;
mod json;
mod routes;
mod session;
mod types;

pub use routes::build_router;
