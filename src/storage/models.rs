//! Database models for Roster Core.
//!
//! These are the row types returned by SQLx queries.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::{Employee, Team};
use crate::error::RosterError;

/// Database row for employees table.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeRow {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub position: String,
    pub team_id: String,
    pub created_at: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = RosterError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(Employee {
            id: parse_uuid(&row.id)?,
            name: row.name,
            surname: row.surname,
            position: row.position,
            team_id: parse_uuid(&row.team_id)?,
            created_at: parse_datetime(&row.created_at)?,
            start_date: row.start_date.as_deref().map(parse_datetime).transpose()?,
            end_date: row.end_date.as_deref().map(parse_datetime).transpose()?,
        })
    }
}

/// Database row for teams table.
#[derive(Debug, Clone, FromRow)]
pub struct TeamRow {
    pub id: String,
    pub name: String,
    pub parent_team_id: Option<String>,
}

impl TryFrom<TeamRow> for Team {
    type Error = RosterError;

    fn try_from(row: TeamRow) -> Result<Self, Self::Error> {
        Ok(Team {
            id: parse_uuid(&row.id)?,
            name: row.name,
            parent_team_id: row.parent_team_id.as_deref().map(parse_uuid).transpose()?,
        })
    }
}

fn parse_uuid(s: &str) -> Result<Uuid, RosterError> {
    Uuid::parse_str(s).map_err(|e| RosterError::Internal(e.to_string()))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RosterError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RosterError::Internal(e.to_string()))
}
