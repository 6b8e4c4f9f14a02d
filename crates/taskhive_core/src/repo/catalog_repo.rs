//! Catalog repository for positions and task types.
//!
//! # Responsibility
//! - Provide CRUD and existence checks over the two catalog tables.
//!
//! # Invariants
//! - Catalog names are unique per table, enforced by the schema.
//! - List queries are ordered by name for stable presentation.

use crate::model::catalog::{Position, PositionId, TaskType, TaskTypeId};
use crate::repo::predicate::Predicate;
use crate::repo::{ensure_schema_ready, parse_uuid, RepoResult, TableSpec};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

/// Columns scanned by position and task type keyword search.
pub const SEARCH_COLUMNS: &[&str] = &["name"];

const REQUIRED_TABLES: &[TableSpec] = &[
    TableSpec {
        table: "positions",
        columns: &["uuid", "name"],
    },
    TableSpec {
        table: "task_types",
        columns: &["uuid", "name"],
    },
];

/// Repository interface for catalog records.
pub trait CatalogRepository {
    /// Creates one position and returns its stable id.
    fn create_position(&self, name: &str) -> RepoResult<PositionId>;
    /// Lists positions, optionally filtered, ordered by name.
    fn list_positions(&self, filter: Option<&Predicate>) -> RepoResult<Vec<Position>>;
    /// Returns whether a position with this id exists.
    fn position_exists(&self, id: PositionId) -> RepoResult<bool>;
    /// Creates one task type and returns its stable id.
    fn create_task_type(&self, name: &str) -> RepoResult<TaskTypeId>;
    /// Lists task types, optionally filtered, ordered by name.
    fn list_task_types(&self, filter: Option<&Predicate>) -> RepoResult<Vec<TaskType>>;
    /// Returns whether a task type with this id exists.
    fn task_type_exists(&self, id: TaskTypeId) -> RepoResult<bool>;
}

/// SQLite-backed catalog repository.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }

    fn create_named(&self, table: &str, name: &str) -> RepoResult<Uuid> {
        let uuid = Uuid::new_v4();
        self.conn.execute(
            &format!("INSERT INTO {table} (uuid, name) VALUES (?1, ?2);"),
            params![uuid.to_string(), name],
        )?;
        Ok(uuid)
    }

    fn list_named(
        &self,
        table: &str,
        filter: Option<&Predicate>,
    ) -> RepoResult<Vec<(Uuid, String)>> {
        let mut sql = format!("SELECT uuid, name FROM {table} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(filter) = filter {
            sql.push_str(" AND ");
            filter.append_sql(&mut sql, &mut bind_values);
        }

        sql.push_str(" ORDER BY name ASC, uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_named_row(row, table)?);
        }
        Ok(records)
    }

    fn named_exists(&self, table: &str, id: Uuid) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE uuid = ?1);"),
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn create_position(&self, name: &str) -> RepoResult<PositionId> {
        self.create_named("positions", name)
    }

    fn list_positions(&self, filter: Option<&Predicate>) -> RepoResult<Vec<Position>> {
        let records = self.list_named("positions", filter)?;
        Ok(records
            .into_iter()
            .map(|(uuid, name)| Position { uuid, name })
            .collect())
    }

    fn position_exists(&self, id: PositionId) -> RepoResult<bool> {
        self.named_exists("positions", id)
    }

    fn create_task_type(&self, name: &str) -> RepoResult<TaskTypeId> {
        self.create_named("task_types", name)
    }

    fn list_task_types(&self, filter: Option<&Predicate>) -> RepoResult<Vec<TaskType>> {
        let records = self.list_named("task_types", filter)?;
        Ok(records
            .into_iter()
            .map(|(uuid, name)| TaskType { uuid, name })
            .collect())
    }

    fn task_type_exists(&self, id: TaskTypeId) -> RepoResult<bool> {
        self.named_exists("task_types", id)
    }
}

fn parse_named_row(row: &Row<'_>, table: &str) -> RepoResult<(Uuid, String)> {
    let uuid_text: String = row.get("uuid")?;
    let column = match table {
        "positions" => "positions.uuid",
        _ => "task_types.uuid",
    };
    Ok((parse_uuid(&uuid_text, column)?, row.get("name")?))
}
