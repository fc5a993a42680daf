//! Team domain models.
//!
//! Teams form a tree through the optional `parent_team_id` reference.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// An organizational unit, optionally nested under a parent team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Team {
    /// Unique identifier.
    pub id: Uuid,
    /// Team name.
    pub name: String,
    /// Parent team; `None` for a root team.
    pub parent_team_id: Option<Uuid>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct TeamPatch {
    pub name: Option<String>,
    pub parent_team_id: Option<Uuid>,
}

impl Team {
    /// Create a new team with a fresh id.
    pub fn new(name: String, parent_team_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            parent_team_id,
        }
    }
}
