//! Project repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide project persistence including the team link table.
//! - Keep project row and team writes atomic.
//!
//! # Invariants
//! - Create/update replace the full team set in one transaction.
//! - `status` round-trips through its canonical string value.
//! - Team ids are returned sorted ascending.

use crate::model::project::{NewProject, Project, ProjectId, ProjectStatus};
use crate::model::team::TeamId;
use crate::repo::predicate::Predicate;
use crate::repo::{ensure_schema_ready, parse_uuid, RepoError, RepoResult, TableSpec};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const PROJECT_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    status
FROM projects";

/// Columns scanned by project keyword search.
pub const SEARCH_COLUMNS: &[&str] = &["name"];

const REQUIRED_TABLES: &[TableSpec] = &[
    TableSpec {
        table: "projects",
        columns: &["uuid", "name", "status"],
    },
    TableSpec {
        table: "project_teams",
        columns: &["project_uuid", "team_uuid"],
    },
];

/// Repository interface for projects.
pub trait ProjectRepository {
    /// Creates one project with its teams and returns its stable id.
    fn create_project(&self, project: &NewProject) -> RepoResult<ProjectId>;
    /// Replaces all fields and teams of an existing project.
    fn update_project(&self, id: ProjectId, project: &NewProject) -> RepoResult<()>;
    /// Gets one project by id.
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    /// Lists projects, optionally filtered, ordered by name.
    fn list_projects(&self, filter: Option<&Predicate>) -> RepoResult<Vec<Project>>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, project: &NewProject) -> RepoResult<ProjectId> {
        let uuid = Uuid::new_v4();
        let uuid_text = uuid.to_string();

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO projects (uuid, name, status) VALUES (?1, ?2, ?3);",
            params![
                uuid_text.as_str(),
                project.name.as_str(),
                project.status.as_str(),
            ],
        )?;
        replace_teams(&tx, uuid_text.as_str(), &project.teams)?;
        tx.commit()?;

        Ok(uuid)
    }

    fn update_project(&self, id: ProjectId, project: &NewProject) -> RepoResult<()> {
        let uuid_text = id.to_string();

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE projects
             SET
                name = ?2,
                status = ?3
             WHERE uuid = ?1;",
            params![
                uuid_text.as_str(),
                project.name.as_str(),
                project.status.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "project",
                id,
            });
        }
        replace_teams(&tx, uuid_text.as_str(), &project.teams)?;
        tx.commit()?;

        Ok(())
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(self.conn, row)?));
        }
        Ok(None)
    }

    fn list_projects(&self, filter: Option<&Predicate>) -> RepoResult<Vec<Project>> {
        let mut sql = format!("{PROJECT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(filter) = filter {
            sql.push_str(" AND ");
            filter.append_sql(&mut sql, &mut bind_values);
        }

        sql.push_str(" ORDER BY name ASC, uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(self.conn, row)?);
        }
        Ok(projects)
    }
}

fn replace_teams(tx: &Transaction<'_>, project_uuid: &str, teams: &[TeamId]) -> RepoResult<()> {
    tx.execute(
        "DELETE FROM project_teams WHERE project_uuid = ?1;",
        [project_uuid],
    )?;
    for team in teams {
        tx.execute(
            "INSERT INTO project_teams (project_uuid, team_uuid) VALUES (?1, ?2);",
            params![project_uuid, team.to_string()],
        )?;
    }
    Ok(())
}

fn load_teams(conn: &Connection, project_uuid: &str) -> RepoResult<Vec<TeamId>> {
    let mut stmt = conn.prepare(
        "SELECT team_uuid
         FROM project_teams
         WHERE project_uuid = ?1
         ORDER BY team_uuid ASC;",
    )?;
    let mut rows = stmt.query([project_uuid])?;
    let mut teams = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get("team_uuid")?;
        teams.push(parse_uuid(&value, "project_teams.team_uuid")?);
    }
    Ok(teams)
}

fn parse_project_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Project> {
    let uuid_text: String = row.get("uuid")?;
    let status_text: String = row.get("status")?;
    let status = ProjectStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in projects.status"))
    })?;
    let teams = load_teams(conn, &uuid_text)?;

    Ok(Project {
        uuid: parse_uuid(&uuid_text, "projects.uuid")?,
        name: row.get("name")?,
        status,
        teams,
    })
}
