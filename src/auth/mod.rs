//! Authentication module for Roster Core.
//!
//! Every route except the health check and the API docs requires a bearer
//! token accepted by the configured [`TokenVerifier`].

mod middleware;
mod token;

pub use middleware::*;
pub use token::*;
