//! Repository layer for database operations.
//!
//! [`Database`] owns the pool and the schema. A [`Repository`] is a store
//! session holding one pooled connection; the connection returns to the pool
//! when the session is dropped.

use std::str::FromStr;

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::domain::{Employee, EmployeePatch, NewEmployee, Team, TeamPatch};
use crate::error::{RosterError, RosterResult};
use crate::storage::models::{EmployeeRow, TeamRow};

/// Ids bound per `DELETE ... IN (...)` statement. SQLite caps a statement at
/// 32766 bound variables.
const DELETE_BATCH_SIZE: usize = 500;

/// Connection pool and schema owner.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database handle with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for the configured URL, creating the file if needed.
    pub async fn connect(config: &DatabaseConfig) -> RosterResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        Ok(Self::new(pool))
    }

    /// Initialize the database schema.
    pub async fn init_schema(&self) -> RosterResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS teams (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                parent_team_id TEXT,
                FOREIGN KEY (parent_team_id) REFERENCES teams(id)
            );

            CREATE INDEX IF NOT EXISTS idx_teams_parent ON teams(parent_team_id);
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS employees (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                surname TEXT NOT NULL,
                position TEXT NOT NULL,
                team_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                start_date TEXT,
                end_date TEXT,
                FOREIGN KEY (team_id) REFERENCES teams(id)
            );

            CREATE INDEX IF NOT EXISTS idx_employees_team ON employees(team_id);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Check out a connection for one unit of work.
    pub async fn acquire(&self) -> RosterResult<Repository> {
        let conn = self.pool.acquire().await?;
        Ok(Repository { conn })
    }

    /// Single-connection in-memory database with the schema applied.
    #[cfg(test)]
    pub async fn in_memory() -> Database {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        let database = Database::new(pool);
        database
            .init_schema()
            .await
            .expect("Failed to init schema");
        database
    }
}

/// Store session bound to a single pooled connection.
pub struct Repository {
    conn: PoolConnection<Sqlite>,
}

impl Repository {
    // ==================== Employees ====================

    /// Insert a new employee, stamping its id and creation time.
    pub async fn create_employee(&mut self, fields: NewEmployee) -> RosterResult<Employee> {
        let employee = Employee::new(fields);

        sqlx::query(
            r#"
            INSERT INTO employees (
                id, name, surname, position, team_id, created_at, start_date, end_date
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(employee.id.to_string())
        .bind(&employee.name)
        .bind(&employee.surname)
        .bind(&employee.position)
        .bind(employee.team_id.to_string())
        .bind(employee.created_at.to_rfc3339())
        .bind(employee.start_date.map(|d| d.to_rfc3339()))
        .bind(employee.end_date.map(|d| d.to_rfc3339()))
        .execute(&mut *self.conn)
        .await?;

        Ok(employee)
    }

    /// Get an employee by ID.
    pub async fn get_employee(&mut self, id: Uuid) -> RosterResult<Option<Employee>> {
        let row: Option<EmployeeRow> = sqlx::query_as("SELECT * FROM employees WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&mut *self.conn)
            .await?;

        row.map(Employee::try_from).transpose()
    }

    /// List all employees in insertion order.
    pub async fn list_employees(&mut self) -> RosterResult<Vec<Employee>> {
        let rows: Vec<EmployeeRow> = sqlx::query_as("SELECT * FROM employees ORDER BY rowid")
            .fetch_all(&mut *self.conn)
            .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// List the employees of one team in insertion order.
    pub async fn list_employees_by_team(&mut self, team_id: Uuid) -> RosterResult<Vec<Employee>> {
        let rows: Vec<EmployeeRow> =
            sqlx::query_as("SELECT * FROM employees WHERE team_id = ? ORDER BY rowid")
                .bind(team_id.to_string())
                .fetch_all(&mut *self.conn)
                .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Apply the supplied fields of `patch`. Returns `None` if the employee
    /// does not exist.
    pub async fn update_employee(
        &mut self,
        id: Uuid,
        patch: EmployeePatch,
    ) -> RosterResult<Option<Employee>> {
        let result = sqlx::query(
            r#"
            UPDATE employees SET
                name = COALESCE(?, name),
                surname = COALESCE(?, surname),
                position = COALESCE(?, position),
                team_id = COALESCE(?, team_id),
                start_date = COALESCE(?, start_date),
                end_date = COALESCE(?, end_date)
            WHERE id = ?
            "#,
        )
        .bind(patch.name)
        .bind(patch.surname)
        .bind(patch.position)
        .bind(patch.team_id.map(|t| t.to_string()))
        .bind(patch.start_date.map(|d| d.to_rfc3339()))
        .bind(patch.end_date.map(|d| d.to_rfc3339()))
        .bind(id.to_string())
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_employee(id).await
    }

    /// Delete an employee. Returns `false` if it did not exist.
    pub async fn delete_employee(&mut self, id: Uuid) -> RosterResult<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *self.conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every listed employee that exists. Returns how many were removed.
    pub async fn delete_employees(&mut self, ids: &[Uuid]) -> RosterResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut removed = 0;
        for chunk in ids.chunks(DELETE_BATCH_SIZE) {
            let mut builder = QueryBuilder::<Sqlite>::new("DELETE FROM employees WHERE id IN (");
            let mut separated = builder.separated(", ");
            for id in chunk {
                separated.push_bind(id.to_string());
            }
            separated.push_unseparated(")");

            removed += builder.build().execute(&mut *self.conn).await?.rows_affected();
        }

        Ok(removed)
    }

    // ==================== Teams ====================

    /// Insert a new team.
    pub async fn create_team(
        &mut self,
        name: String,
        parent_team_id: Option<Uuid>,
    ) -> RosterResult<Team> {
        let team = Team::new(name, parent_team_id);

        sqlx::query("INSERT INTO teams (id, name, parent_team_id) VALUES (?, ?, ?)")
            .bind(team.id.to_string())
            .bind(&team.name)
            .bind(team.parent_team_id.map(|p| p.to_string()))
            .execute(&mut *self.conn)
            .await?;

        Ok(team)
    }

    /// Get a team by ID.
    pub async fn get_team(&mut self, id: Uuid) -> RosterResult<Option<Team>> {
        let row: Option<TeamRow> = sqlx::query_as("SELECT * FROM teams WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&mut *self.conn)
            .await?;

        row.map(Team::try_from).transpose()
    }

    /// List all teams in insertion order.
    pub async fn list_teams(&mut self) -> RosterResult<Vec<Team>> {
        let rows: Vec<TeamRow> = sqlx::query_as("SELECT * FROM teams ORDER BY rowid")
            .fetch_all(&mut *self.conn)
            .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Apply the supplied fields of `patch`. Returns `None` if the team does
    /// not exist.
    pub async fn update_team(&mut self, id: Uuid, patch: TeamPatch) -> RosterResult<Option<Team>> {
        let result = sqlx::query(
            r#"
            UPDATE teams SET
                name = COALESCE(?, name),
                parent_team_id = COALESCE(?, parent_team_id)
            WHERE id = ?
            "#,
        )
        .bind(patch.name)
        .bind(patch.parent_team_id.map(|p| p.to_string()))
        .bind(id.to_string())
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_team(id).await
    }

    /// Delete a team. Returns `false` if it did not exist.
    pub async fn delete_team(&mut self, id: Uuid) -> RosterResult<bool> {
        let result = sqlx::query("DELETE FROM teams WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *self.conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether any team or employee still references this team.
    pub async fn team_has_dependents(&mut self, id: Uuid) -> RosterResult<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT
                (SELECT COUNT(*) FROM teams WHERE parent_team_id = ?1)
                + (SELECT COUNT(*) FROM employees WHERE team_id = ?1)
            "#,
        )
        .bind(id.to_string())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(count > 0)
    }

    /// The team itself followed by its ancestors, nearest first.
    ///
    /// Each hop is bounded by the number of teams, so the walk terminates
    /// even if the stored parent chain already contains a cycle.
    pub async fn team_ancestor_ids(&mut self, id: Uuid) -> RosterResult<Vec<Uuid>> {
        let ids: Vec<String> = sqlx::query_scalar(
            r#"
            WITH RECURSIVE chain(id, parent_team_id, depth) AS (
                SELECT id, parent_team_id, 0 FROM teams WHERE id = ?1
                UNION ALL
                SELECT t.id, t.parent_team_id, c.depth + 1 FROM teams t
                JOIN chain c ON t.id = c.parent_team_id
                WHERE c.depth < (SELECT COUNT(*) FROM teams)
            )
            SELECT id FROM chain
            GROUP BY id
            ORDER BY MIN(depth)
            "#,
        )
        .bind(id.to_string())
        .fetch_all(&mut *self.conn)
        .await?;

        ids.iter()
            .map(|s| Uuid::parse_str(s).map_err(|e| RosterError::Internal(e.to_string())))
            .collect()
    }
}
