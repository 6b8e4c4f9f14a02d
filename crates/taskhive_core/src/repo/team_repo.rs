//! Team repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide team persistence including the member link table.
//!
//! # Invariants
//! - Team row and member writes happen in one transaction.
//! - Member ids are returned sorted ascending.

use crate::model::team::{NewTeam, Team, TeamId};
use crate::model::worker::WorkerId;
use crate::repo::predicate::Predicate;
use crate::repo::{ensure_schema_ready, parse_uuid, RepoResult, TableSpec};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const TEAM_SELECT_SQL: &str = "SELECT
    uuid,
    name
FROM teams";

/// Columns scanned by team keyword search.
pub const SEARCH_COLUMNS: &[&str] = &["name"];

const REQUIRED_TABLES: &[TableSpec] = &[
    TableSpec {
        table: "teams",
        columns: &["uuid", "name"],
    },
    TableSpec {
        table: "team_members",
        columns: &["team_uuid", "worker_uuid"],
    },
];

/// Repository interface for teams.
pub trait TeamRepository {
    /// Creates one team with its members and returns its stable id.
    fn create_team(&self, team: &NewTeam) -> RepoResult<TeamId>;
    /// Gets one team by id.
    fn get_team(&self, id: TeamId) -> RepoResult<Option<Team>>;
    /// Lists teams, optionally filtered, ordered by name.
    fn list_teams(&self, filter: Option<&Predicate>) -> RepoResult<Vec<Team>>;
    /// Returns whether a team with this id exists.
    fn team_exists(&self, id: TeamId) -> RepoResult<bool>;
}

/// SQLite-backed team repository.
pub struct SqliteTeamRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTeamRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl TeamRepository for SqliteTeamRepository<'_> {
    fn create_team(&self, team: &NewTeam) -> RepoResult<TeamId> {
        let uuid = Uuid::new_v4();
        let uuid_text = uuid.to_string();

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO teams (uuid, name) VALUES (?1, ?2);",
            params![uuid_text.as_str(), team.name.as_str()],
        )?;
        for member in &team.members {
            tx.execute(
                "INSERT INTO team_members (team_uuid, worker_uuid) VALUES (?1, ?2);",
                params![uuid_text.as_str(), member.to_string()],
            )?;
        }
        tx.commit()?;

        Ok(uuid)
    }

    fn get_team(&self, id: TeamId) -> RepoResult<Option<Team>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TEAM_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_team_row(self.conn, row)?));
        }
        Ok(None)
    }

    fn list_teams(&self, filter: Option<&Predicate>) -> RepoResult<Vec<Team>> {
        let mut sql = format!("{TEAM_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(filter) = filter {
            sql.push_str(" AND ");
            filter.append_sql(&mut sql, &mut bind_values);
        }

        sql.push_str(" ORDER BY name ASC, uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut teams = Vec::new();
        while let Some(row) = rows.next()? {
            teams.push(parse_team_row(self.conn, row)?);
        }
        Ok(teams)
    }

    fn team_exists(&self, id: TeamId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM teams WHERE uuid = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn load_members(conn: &Connection, team_uuid: &str) -> RepoResult<Vec<WorkerId>> {
    let mut stmt = conn.prepare(
        "SELECT worker_uuid
         FROM team_members
         WHERE team_uuid = ?1
         ORDER BY worker_uuid ASC;",
    )?;
    let mut rows = stmt.query([team_uuid])?;
    let mut members = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get("worker_uuid")?;
        members.push(parse_uuid(&value, "team_members.worker_uuid")?);
    }
    Ok(members)
}

fn parse_team_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Team> {
    let uuid_text: String = row.get("uuid")?;
    let members = load_members(conn, &uuid_text)?;

    Ok(Team {
        uuid: parse_uuid(&uuid_text, "teams.uuid")?,
        name: row.get("name")?,
        members,
    })
}
