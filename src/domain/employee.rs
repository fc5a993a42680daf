//! Employee domain models.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A person working in exactly one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Employee {
    /// Unique identifier.
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub position: String,
    /// Owning team.
    pub team_id: Uuid,
    /// Stamped by the server on creation, never changed afterwards.
    pub created_at: DateTime<Utc>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Validated fields for a new employee.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub surname: String,
    pub position: String,
    pub team_id: Uuid,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub position: Option<String>,
    pub team_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl Employee {
    /// Create a new employee with a fresh id and creation timestamp.
    pub fn new(fields: NewEmployee) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            surname: fields.surname,
            position: fields.position,
            team_id: fields.team_id,
            created_at: Utc::now(),
            start_date: fields.start_date,
            end_date: fields.end_date,
        }
    }
}

/// Parse an ISO-8601 date or date-time into a UTC timestamp.
///
/// Accepts RFC 3339 (`2024-03-01T09:00:00+02:00`), a naive date-time which is
/// taken as UTC (`2024-03-01T09:00:00`), or a bare date at midnight UTC
/// (`2024-03-01`).
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("'{}' is not an ISO-8601 date or date-time", value))
}
