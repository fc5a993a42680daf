//! API request and response types.
//!
//! Request bodies are deserialized leniently and then checked by their
//! `validate` methods, so a missing or blank field is reported as a
//! field-level validation error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{parse_timestamp, EmployeePatch, NewEmployee, TeamPatch};
use crate::error::{RosterError, RosterResult};

// ==================== Employees ====================

/// Query parameters for listing employees.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListEmployeesQuery {
    /// Only return employees of this team.
    #[serde(default)]
    pub team_id: Option<Uuid>,
}

/// Request to create an employee.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEmployeeRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub position: String,
    pub team_id: Option<Uuid>,
    /// ISO-8601 date or date-time.
    #[serde(default)]
    pub start_date: Option<String>,
    /// ISO-8601 date or date-time.
    #[serde(default)]
    pub end_date: Option<String>,
}

impl CreateEmployeeRequest {
    pub fn validate(self) -> RosterResult<NewEmployee> {
        Ok(NewEmployee {
            name: required_text("name", self.name)?,
            surname: required_text("surname", self.surname)?,
            position: required_text("position", self.position)?,
            team_id: self
                .team_id
                .ok_or_else(|| RosterError::validation("team_id", "team_id is required"))?,
            start_date: optional_date("start_date", self.start_date)?,
            end_date: optional_date("end_date", self.end_date)?,
        })
    }
}

/// Request to update an employee. Omitted or null fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEmployeeRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub team_id: Option<Uuid>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl UpdateEmployeeRequest {
    pub fn validate(self) -> RosterResult<EmployeePatch> {
        Ok(EmployeePatch {
            name: optional_text("name", self.name)?,
            surname: optional_text("surname", self.surname)?,
            position: optional_text("position", self.position)?,
            team_id: self.team_id,
            start_date: optional_date("start_date", self.start_date)?,
            end_date: optional_date("end_date", self.end_date)?,
        })
    }
}

/// Request to delete several employees at once.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteEmployeesRequest {
    pub employee_ids: Vec<Uuid>,
}

// ==================== Teams ====================

/// Request to create a team.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTeamRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parent_team_id: Option<Uuid>,
}

impl CreateTeamRequest {
    pub fn validate(self) -> RosterResult<(String, Option<Uuid>)> {
        Ok((required_text("name", self.name)?, self.parent_team_id))
    }
}

/// Request to update a team. Omitted or null fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTeamRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent_team_id: Option<Uuid>,
}

impl UpdateTeamRequest {
    pub fn validate(self) -> RosterResult<TeamPatch> {
        Ok(TeamPatch {
            name: optional_text("name", self.name)?,
            parent_team_id: self.parent_team_id,
        })
    }
}

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "ok" while the process is serving.
    pub status: String,
}

// ==================== Validation helpers ====================

fn required_text(field: &str, value: String) -> RosterResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RosterError::validation(field, format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn optional_text(field: &str, value: Option<String>) -> RosterResult<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => Err(RosterError::validation(
            field,
            format!("{} must not be empty", field),
        )),
        Some(v) => Ok(Some(v.trim().to_string())),
        None => Ok(None),
    }
}

fn optional_date(field: &str, value: Option<String>) -> RosterResult<Option<DateTime<Utc>>> {
    value
        .map(|v| parse_timestamp(&v).map_err(|e| RosterError::validation(field, e)))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateEmployeeRequest {
        CreateEmployeeRequest {
            name: " Ada ".to_string(),
            surname: "Lovelace".to_string(),
            position: "Analyst".to_string(),
            team_id: Some(Uuid::new_v4()),
            start_date: Some("1843-07-01".to_string()),
            end_date: None,
        }
    }

    fn field_of(err: RosterError) -> String {
        match err {
            RosterError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_create_request_trims_and_parses() {
        let fields = create_request().validate().unwrap();
        assert_eq!(fields.name, "Ada");
        assert!(fields.start_date.is_some());
        assert!(fields.end_date.is_none());
    }

    #[test]
    fn test_create_request_reports_failing_field() {
        let mut request = create_request();
        request.surname = "   ".to_string();
        assert_eq!(field_of(request.validate().unwrap_err()), "surname");

        let mut request = create_request();
        request.team_id = None;
        assert_eq!(field_of(request.validate().unwrap_err()), "team_id");

        let mut request = create_request();
        request.end_date = Some("soon".to_string());
        assert_eq!(field_of(request.validate().unwrap_err()), "end_date");
    }

    #[test]
    fn test_update_request_keeps_omitted_fields_unset() {
        let patch = UpdateEmployeeRequest {
            position: Some("Lead".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert_eq!(patch.position.as_deref(), Some("Lead"));
        assert!(patch.name.is_none());
        assert!(patch.team_id.is_none());
    }

    #[test]
    fn test_update_request_rejects_blank_name() {
        let err = UpdateTeamRequest {
            name: Some("".to_string()),
            parent_team_id: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(field_of(err), "name");
    }
}
