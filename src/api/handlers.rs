//! HTTP request handlers.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::json::JsonBody;
use crate::api::types::*;
use crate::domain::{build_forest, Employee, Team, TeamNode};
use crate::error::{RosterError, RosterResult};
use crate::storage::Repository;

// ==================== Employee Endpoints ====================

/// List employees, optionally restricted to one team.
///
/// GET /employees
#[utoipa::path(
    get,
    path = "/employees",
    params(ListEmployeesQuery),
    responses(
        (status = 200, description = "List of employees", body = Vec<Employee>),
        (status = 404, description = "Not found or not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn list_employees(
    mut repo: Repository,
    Query(query): Query<ListEmployeesQuery>,
) -> RosterResult<Json<Vec<Employee>>> {
    let employees = match query.team_id {
        Some(team_id) => repo.list_employees_by_team(team_id).await?,
        None => repo.list_employees().await?,
    };

    Ok(Json(employees))
}

/// Create an employee.
///
/// POST /employees
#[utoipa::path(
    post,
    path = "/employees",
    request_body = CreateEmployeeRequest,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 409, description = "Team does not exist"),
        (status = 422, description = "Invalid field")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn create_employee(
    mut repo: Repository,
    JsonBody(request): JsonBody<CreateEmployeeRequest>,
) -> RosterResult<(StatusCode, Json<Employee>)> {
    let fields = request.validate()?;
    ensure_team_exists(&mut repo, fields.team_id).await?;

    let employee = repo.create_employee(fields).await?;

    tracing::info!(
        employee_id = %employee.id,
        team_id = %employee.team_id,
        "Employee created"
    );

    Ok((StatusCode::CREATED, Json(employee)))
}

/// Get an employee by ID.
///
/// GET /employees/{id}
#[utoipa::path(
    get,
    path = "/employees/{id}",
    params(("id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee details", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn get_employee(
    mut repo: Repository,
    Path(id): Path<Uuid>,
) -> RosterResult<Json<Employee>> {
    repo.get_employee(id)
        .await?
        .map(Json)
        .ok_or_else(|| employee_not_found(id))
}

/// Update the supplied fields of an employee.
///
/// PUT /employees/{id}
#[utoipa::path(
    put,
    path = "/employees/{id}",
    params(("id" = Uuid, Path, description = "Employee ID")),
    request_body = UpdateEmployeeRequest,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Team does not exist"),
        (status = 422, description = "Invalid field")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn update_employee(
    mut repo: Repository,
    Path(id): Path<Uuid>,
    JsonBody(request): JsonBody<UpdateEmployeeRequest>,
) -> RosterResult<Json<Employee>> {
    let patch = request.validate()?;

    if repo.get_employee(id).await?.is_none() {
        return Err(employee_not_found(id));
    }
    if let Some(team_id) = patch.team_id {
        ensure_team_exists(&mut repo, team_id).await?;
    }

    let employee = repo
        .update_employee(id, patch)
        .await?
        .ok_or_else(|| employee_not_found(id))?;

    tracing::info!(employee_id = %id, "Employee updated");

    Ok(Json(employee))
}

/// Delete an employee.
///
/// DELETE /employees/{id}
#[utoipa::path(
    delete,
    path = "/employees/{id}",
    params(("id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn delete_employee(
    mut repo: Repository,
    Path(id): Path<Uuid>,
) -> RosterResult<StatusCode> {
    if !repo.delete_employee(id).await? {
        return Err(employee_not_found(id));
    }

    tracing::info!(employee_id = %id, "Employee deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Delete several employees. Unknown ids are ignored.
///
/// POST /employees/delete-many
#[utoipa::path(
    post,
    path = "/employees/delete-many",
    request_body = DeleteEmployeesRequest,
    responses(
        (status = 204, description = "Employees deleted")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn delete_many_employees(
    mut repo: Repository,
    JsonBody(request): JsonBody<DeleteEmployeesRequest>,
) -> RosterResult<StatusCode> {
    let removed = repo.delete_employees(&request.employee_ids).await?;

    tracing::info!(
        requested = request.employee_ids.len(),
        removed,
        "Employees deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

// ==================== Team Endpoints ====================

/// List all teams.
///
/// GET /teams
#[utoipa::path(
    get,
    path = "/teams",
    responses(
        (status = 200, description = "List of teams", body = Vec<Team>),
        (status = 404, description = "Not found or not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "teams"
)]
pub async fn list_teams(mut repo: Repository) -> RosterResult<Json<Vec<Team>>> {
    Ok(Json(repo.list_teams().await?))
}

/// Create a team.
///
/// POST /teams
#[utoipa::path(
    post,
    path = "/teams",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created", body = Team),
        (status = 409, description = "Parent team does not exist"),
        (status = 422, description = "Invalid field")
    ),
    security(("bearer_auth" = [])),
    tag = "teams"
)]
pub async fn create_team(
    mut repo: Repository,
    JsonBody(request): JsonBody<CreateTeamRequest>,
) -> RosterResult<(StatusCode, Json<Team>)> {
    let (name, parent_team_id) = request.validate()?;
    if let Some(parent_id) = parent_team_id {
        ensure_team_exists(&mut repo, parent_id).await?;
    }

    let team = repo.create_team(name, parent_team_id).await?;

    tracing::info!(
        team_id = %team.id,
        parent_team_id = ?team.parent_team_id,
        "Team created"
    );

    Ok((StatusCode::CREATED, Json(team)))
}

/// Get a team by ID.
///
/// GET /teams/{id}
#[utoipa::path(
    get,
    path = "/teams/{id}",
    params(("id" = Uuid, Path, description = "Team ID")),
    responses(
        (status = 200, description = "Team details", body = Team),
        (status = 404, description = "Team not found")
    ),
    security(("bearer_auth" = [])),
    tag = "teams"
)]
pub async fn get_team(mut repo: Repository, Path(id): Path<Uuid>) -> RosterResult<Json<Team>> {
    repo.get_team(id)
        .await?
        .map(Json)
        .ok_or_else(|| team_not_found(id))
}

/// Rename or reparent a team.
///
/// PUT /teams/{id}
#[utoipa::path(
    put,
    path = "/teams/{id}",
    params(("id" = Uuid, Path, description = "Team ID")),
    request_body = UpdateTeamRequest,
    responses(
        (status = 200, description = "Team updated", body = Team),
        (status = 404, description = "Team not found"),
        (status = 409, description = "Parent missing or move would create a cycle"),
        (status = 422, description = "Invalid field")
    ),
    security(("bearer_auth" = [])),
    tag = "teams"
)]
pub async fn update_team(
    mut repo: Repository,
    Path(id): Path<Uuid>,
    JsonBody(request): JsonBody<UpdateTeamRequest>,
) -> RosterResult<Json<Team>> {
    let patch = request.validate()?;

    if repo.get_team(id).await?.is_none() {
        return Err(team_not_found(id));
    }

    if let Some(parent_id) = patch.parent_team_id {
        if parent_id == id {
            return Err(RosterError::validation(
                "parent_team_id",
                "A team cannot be its own parent",
            ));
        }
        ensure_team_exists(&mut repo, parent_id).await?;
        // Checked outside a transaction: two concurrent moves can still close
        // a cycle (last write wins). The tree builder drops such teams.
        if repo.team_ancestor_ids(parent_id).await?.contains(&id) {
            return Err(RosterError::Conflict(format!(
                "Moving team {} under {} would create a cycle",
                id, parent_id
            )));
        }
    }

    let team = repo
        .update_team(id, patch)
        .await?
        .ok_or_else(|| team_not_found(id))?;

    tracing::info!(
        team_id = %id,
        parent_team_id = ?team.parent_team_id,
        "Team updated"
    );

    Ok(Json(team))
}

/// Delete a team that has no child teams and no employees.
///
/// DELETE /teams/{id}
#[utoipa::path(
    delete,
    path = "/teams/{id}",
    params(("id" = Uuid, Path, description = "Team ID")),
    responses(
        (status = 204, description = "Team deleted"),
        (status = 404, description = "Team not found"),
        (status = 409, description = "Team still has child teams or employees")
    ),
    security(("bearer_auth" = [])),
    tag = "teams"
)]
pub async fn delete_team(mut repo: Repository, Path(id): Path<Uuid>) -> RosterResult<StatusCode> {
    if repo.get_team(id).await?.is_none() {
        return Err(team_not_found(id));
    }

    if repo.team_has_dependents(id).await? {
        return Err(RosterError::Conflict(format!(
            "Team {} still has child teams or employees",
            id
        )));
    }

    if !repo.delete_team(id).await? {
        return Err(team_not_found(id));
    }

    tracing::info!(team_id = %id, "Team deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Get the team hierarchy with employees attached to their teams.
///
/// GET /teams/tree
#[utoipa::path(
    get,
    path = "/teams/tree",
    responses(
        (status = 200, description = "Forest of root teams", body = Vec<TeamNode>),
        (status = 404, description = "Not found or not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "teams"
)]
pub async fn get_team_tree(mut repo: Repository) -> RosterResult<Json<Vec<TeamNode>>> {
    let teams = repo.list_teams().await?;

    let mut employees_by_team = HashMap::with_capacity(teams.len());
    for team in &teams {
        let employees = repo.list_employees_by_team(team.id).await?;
        employees_by_team.insert(team.id, employees);
    }

    Ok(Json(build_forest(teams, employees_by_team)))
}

// ==================== Health ====================

/// Health check endpoint.
///
/// GET /
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Fallback for unmatched routes.
pub async fn route_not_found() -> RosterError {
    RosterError::resource_not_found()
}

// ==================== Helpers ====================

async fn ensure_team_exists(repo: &mut Repository, team_id: Uuid) -> RosterResult<()> {
    if repo.get_team(team_id).await?.is_none() {
        return Err(RosterError::Conflict(format!(
            "Team {} does not exist",
            team_id
        )));
    }
    Ok(())
}

fn employee_not_found(id: Uuid) -> RosterError {
    RosterError::NotFound(format!("Employee {} not found", id))
}

fn team_not_found(id: Uuid) -> RosterError {
    RosterError::NotFound(format!("Team {} not found", id))
}
