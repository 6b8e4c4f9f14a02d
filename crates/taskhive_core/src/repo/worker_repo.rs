//! Worker repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide account persistence and keyword lookup over `workers`.
//! - Keep password material write-only at the SQL boundary.
//!
//! # Invariants
//! - `username` uniqueness is enforced by the schema and pre-checked by
//!   forms through [`WorkerRepository::username_exists`].
//! - Read paths never select the password column.

use crate::model::worker::{NewWorker, Worker, WorkerId};
use crate::repo::predicate::Predicate;
use crate::repo::{ensure_schema_ready, parse_uuid, RepoResult, TableSpec};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const WORKER_SELECT_SQL: &str = "SELECT
    uuid,
    username,
    first_name,
    last_name,
    position_uuid
FROM workers";

/// Columns scanned by worker keyword search.
pub const SEARCH_COLUMNS: &[&str] = &["username", "first_name", "last_name"];

const REQUIRED_TABLES: &[TableSpec] = &[
    TableSpec {
        table: "workers",
        columns: &[
            "uuid",
            "username",
            "first_name",
            "last_name",
            "password",
            "position_uuid",
        ],
    },
    TableSpec {
        table: "positions",
        columns: &["uuid", "name"],
    },
];

/// Repository interface for worker accounts.
pub trait WorkerRepository {
    /// Creates one worker account and returns its stable id.
    fn create_worker(&self, worker: &NewWorker) -> RepoResult<WorkerId>;
    /// Gets one worker by id.
    fn get_worker(&self, id: WorkerId) -> RepoResult<Option<Worker>>;
    /// Lists workers, optionally filtered, ordered by username.
    fn list_workers(&self, filter: Option<&Predicate>) -> RepoResult<Vec<Worker>>;
    /// Returns whether a worker with this id exists.
    fn worker_exists(&self, id: WorkerId) -> RepoResult<bool>;
    /// Returns whether a worker with exactly this username exists.
    fn username_exists(&self, username: &str) -> RepoResult<bool>;
}

/// SQLite-backed worker repository.
pub struct SqliteWorkerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWorkerRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl WorkerRepository for SqliteWorkerRepository<'_> {
    fn create_worker(&self, worker: &NewWorker) -> RepoResult<WorkerId> {
        let uuid = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO workers (
                uuid,
                username,
                first_name,
                last_name,
                password,
                position_uuid
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                uuid.to_string(),
                worker.username.as_str(),
                worker.first_name.as_str(),
                worker.last_name.as_str(),
                worker.password.as_str(),
                worker.position.to_string(),
            ],
        )?;
        Ok(uuid)
    }

    fn get_worker(&self, id: WorkerId) -> RepoResult<Option<Worker>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{WORKER_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_worker_row(row)?));
        }
        Ok(None)
    }

    fn list_workers(&self, filter: Option<&Predicate>) -> RepoResult<Vec<Worker>> {
        let mut sql = format!("{WORKER_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(filter) = filter {
            sql.push_str(" AND ");
            filter.append_sql(&mut sql, &mut bind_values);
        }

        sql.push_str(" ORDER BY username ASC, uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut workers = Vec::new();
        while let Some(row) = rows.next()? {
            workers.push(parse_worker_row(row)?);
        }
        Ok(workers)
    }

    fn worker_exists(&self, id: WorkerId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM workers WHERE uuid = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn username_exists(&self, username: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM workers WHERE username = ?1);",
            [username],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_worker_row(row: &Row<'_>) -> RepoResult<Worker> {
    let uuid_text: String = row.get("uuid")?;
    let position_text: String = row.get("position_uuid")?;

    Ok(Worker {
        uuid: parse_uuid(&uuid_text, "workers.uuid")?,
        username: row.get("username")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        position: parse_uuid(&position_text, "workers.position_uuid")?,
    })
}
