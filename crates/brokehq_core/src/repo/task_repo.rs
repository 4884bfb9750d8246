//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the task filter predicates the dashboard aggregators need:
//!   assignee, priority, overdue cutoff, and forward due-date window.
//!
//! # Invariants
//! - List results are ordered by due date ascending with undated tasks
//!   last, then by uuid for determinism.
//! - Date filters compare ISO-8601 text, which matches calendar order.

use crate::model::project::ProjectId;
use crate::model::task::{Priority, Task, TaskId};
use crate::model::user::UserId;
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    assigned_to,
    parent_project,
    priority,
    due_date,
    status_slug
FROM tasks";

const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Query options for listing tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskListQuery {
    /// Tasks assigned to this user.
    pub assigned_to: Option<UserId>,
    /// Exact priority match.
    pub priority: Option<Priority>,
    /// Tasks strictly overdue relative to this date.
    pub due_before: Option<NaiveDate>,
    /// Tasks due inside this inclusive window.
    pub due_within: Option<(NaiveDate, NaiveDate)>,
}

/// Repository interface for task reads and admin-side writes.
pub trait TaskRepository {
    /// Persists one task.
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    /// Gets one task by ID.
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Lists tasks matching all set query filters, due date ascending.
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        self.conn.execute(
            "INSERT INTO tasks (
                uuid,
                title,
                assigned_to,
                parent_project,
                priority,
                due_date,
                status_slug
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                task.id.to_string(),
                task.title.as_str(),
                task.assigned_to.map(|id| id.to_string()),
                task.parent_project.map(|id| id.to_string()),
                task.priority.as_str(),
                task.due_date.map(|due| due.format(DUE_DATE_FORMAT).to_string()),
                task.status.as_deref(),
            ],
        )?;

        Ok(task.id)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(user) = query.assigned_to {
            sql.push_str(" AND assigned_to = ?");
            bind_values.push(Value::Text(user.to_string()));
        }

        if let Some(priority) = query.priority {
            sql.push_str(" AND priority = ?");
            bind_values.push(Value::Text(priority.as_str().to_string()));
        }

        if let Some(cutoff) = query.due_before {
            sql.push_str(" AND due_date < ?");
            bind_values.push(Value::Text(cutoff.format(DUE_DATE_FORMAT).to_string()));
        }

        if let Some((from, until)) = query.due_within {
            sql.push_str(" AND due_date BETWEEN ? AND ?");
            bind_values.push(Value::Text(from.format(DUE_DATE_FORMAT).to_string()));
            bind_values.push(Value::Text(until.format(DUE_DATE_FORMAT).to_string()));
        }

        sql.push_str(" ORDER BY due_date IS NULL, due_date ASC, uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let id = TaskId::parse(&uuid_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in tasks.uuid"))
    })?;

    let assigned_to = match row.get::<_, Option<String>>("assigned_to")? {
        Some(value) => Some(UserId::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid user id `{value}` in tasks.assigned_to"))
        })?),
        None => None,
    };

    let parent_project = match row.get::<_, Option<String>>("parent_project")? {
        Some(value) => Some(ProjectId::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid project id `{value}` in tasks.parent_project"
            ))
        })?),
        None => None,
    };

    let priority_text: String = row.get("priority")?;
    let priority = Priority::parse(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in tasks.priority"
        ))
    })?;

    let due_date = match row.get::<_, Option<String>>("due_date")? {
        Some(value) => Some(
            NaiveDate::parse_from_str(&value, DUE_DATE_FORMAT).map_err(|_| {
                RepoError::InvalidData(format!("invalid due date `{value}` in tasks.due_date"))
            })?,
        ),
        None => None,
    };

    Ok(Task {
        id,
        title: row.get("title")?,
        assigned_to,
        parent_project,
        priority,
        due_date,
        status: row.get("status_slug")?,
    })
}
