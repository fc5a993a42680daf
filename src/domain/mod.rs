//! Domain types for Roster Core.
//!
//! This module contains the core business entities and the team hierarchy
//! builder.

mod employee;
mod hierarchy;
mod team;

pub use employee::*;
pub use hierarchy::*;
pub use team::*;
