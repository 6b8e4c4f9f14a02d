//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide task persistence including the assignee link table.
//! - Keep task row and assignee writes atomic.
//!
//! # Invariants
//! - Create/update replace the full assignee set in one transaction.
//! - `deadline` round-trips through epoch milliseconds in UTC.
//! - Assignee ids are returned sorted ascending.

use crate::model::task::{NewTask, Task, TaskId};
use crate::model::worker::WorkerId;
use crate::repo::predicate::Predicate;
use crate::repo::{
    bool_to_int, ensure_schema_ready, parse_bool, parse_uuid, RepoError, RepoResult, TableSpec,
};
use chrono::DateTime;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    deadline_ms,
    is_completed,
    task_type_uuid
FROM tasks";

/// Columns scanned by task keyword search.
pub const SEARCH_COLUMNS: &[&str] = &["name"];

const REQUIRED_TABLES: &[TableSpec] = &[
    TableSpec {
        table: "tasks",
        columns: &["uuid", "name", "deadline_ms", "is_completed", "task_type_uuid"],
    },
    TableSpec {
        table: "task_assignees",
        columns: &["task_uuid", "worker_uuid"],
    },
];

/// Repository interface for tasks.
pub trait TaskRepository {
    /// Creates one task with its assignees and returns its stable id.
    fn create_task(&self, task: &NewTask) -> RepoResult<TaskId>;
    /// Replaces all fields and assignees of an existing task.
    fn update_task(&self, id: TaskId, task: &NewTask) -> RepoResult<()>;
    /// Gets one task by id.
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Lists tasks, optionally filtered, ordered by name.
    fn list_tasks(&self, filter: Option<&Predicate>) -> RepoResult<Vec<Task>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &NewTask) -> RepoResult<TaskId> {
        let uuid = Uuid::new_v4();
        let uuid_text = uuid.to_string();

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO tasks (
                uuid,
                name,
                deadline_ms,
                is_completed,
                task_type_uuid
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                uuid_text.as_str(),
                task.name.as_str(),
                task.deadline.timestamp_millis(),
                bool_to_int(task.is_completed),
                task.task_type.to_string(),
            ],
        )?;
        replace_assignees(&tx, uuid_text.as_str(), &task.assignees)?;
        tx.commit()?;

        Ok(uuid)
    }

    fn update_task(&self, id: TaskId, task: &NewTask) -> RepoResult<()> {
        let uuid_text = id.to_string();

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE tasks
             SET
                name = ?2,
                deadline_ms = ?3,
                is_completed = ?4,
                task_type_uuid = ?5
             WHERE uuid = ?1;",
            params![
                uuid_text.as_str(),
                task.name.as_str(),
                task.deadline.timestamp_millis(),
                bool_to_int(task.is_completed),
                task.task_type.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "task", id });
        }
        replace_assignees(&tx, uuid_text.as_str(), &task.assignees)?;
        tx.commit()?;

        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(self.conn, row)?));
        }
        Ok(None)
    }

    fn list_tasks(&self, filter: Option<&Predicate>) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(filter) = filter {
            sql.push_str(" AND ");
            filter.append_sql(&mut sql, &mut bind_values);
        }

        sql.push_str(" ORDER BY name ASC, uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(self.conn, row)?);
        }
        Ok(tasks)
    }
}

fn replace_assignees(
    tx: &Transaction<'_>,
    task_uuid: &str,
    assignees: &[WorkerId],
) -> RepoResult<()> {
    tx.execute(
        "DELETE FROM task_assignees WHERE task_uuid = ?1;",
        [task_uuid],
    )?;
    for worker in assignees {
        tx.execute(
            "INSERT INTO task_assignees (task_uuid, worker_uuid) VALUES (?1, ?2);",
            params![task_uuid, worker.to_string()],
        )?;
    }
    Ok(())
}

fn load_assignees(conn: &Connection, task_uuid: &str) -> RepoResult<Vec<WorkerId>> {
    let mut stmt = conn.prepare(
        "SELECT worker_uuid
         FROM task_assignees
         WHERE task_uuid = ?1
         ORDER BY worker_uuid ASC;",
    )?;
    let mut rows = stmt.query([task_uuid])?;
    let mut assignees = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get("worker_uuid")?;
        assignees.push(parse_uuid(&value, "task_assignees.worker_uuid")?);
    }
    Ok(assignees)
}

fn parse_task_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let task_type_text: String = row.get("task_type_uuid")?;
    let deadline_ms: i64 = row.get("deadline_ms")?;
    let deadline = DateTime::from_timestamp_millis(deadline_ms).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid deadline `{deadline_ms}` in tasks.deadline_ms"
        ))
    })?;
    let assignees = load_assignees(conn, &uuid_text)?;

    Ok(Task {
        uuid: parse_uuid(&uuid_text, "tasks.uuid")?,
        name: row.get("name")?,
        deadline,
        is_completed: parse_bool(row.get("is_completed")?, "tasks.is_completed")?,
        task_type: parse_uuid(&task_type_text, "tasks.task_type_uuid")?,
        assignees,
    })
}
