//! Project repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Load projects with their assigned-user set in one read model.
//! - Provide the filter predicates the dashboard aggregators need:
//!   visibility, company, status term, and involving-user.
//!
//! # Invariants
//! - `assigned_users` is always populated on returned records.
//! - Unknown stored visibility values load as `None`; every other invalid
//!   column value is an `InvalidData` error.

use crate::model::company::CompanyId;
use crate::model::project::{Project, ProjectId, Visibility};
use crate::model::user::UserId;
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const PROJECT_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    visibility,
    company_uuid,
    project_manager,
    status_slug
FROM projects";

/// Query options for listing projects.
#[derive(Debug, Clone, Default)]
pub struct ProjectListQuery {
    /// Exact visibility match.
    pub visibility: Option<Visibility>,
    /// Projects owned by this company.
    pub company: Option<CompanyId>,
    /// Projects carrying this status term slug.
    pub status: Option<String>,
    /// Projects this user manages or is assigned to.
    pub involving: Option<UserId>,
}

/// Repository interface for project reads and admin-side writes.
pub trait ProjectRepository {
    /// Persists one project together with its assignee set.
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId>;
    /// Gets one project by ID, assignees included.
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    /// Lists projects matching all set query filters.
    fn list_projects(&self, query: &ProjectListQuery) -> RepoResult<Vec<Project>>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        self.conn.execute(
            "INSERT INTO projects (
                uuid,
                title,
                visibility,
                company_uuid,
                project_manager,
                status_slug
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                project.id.to_string(),
                project.title.as_str(),
                project.visibility.map(Visibility::as_str),
                project.company.map(|id| id.to_string()),
                project.project_manager.map(|id| id.to_string()),
                project.status.as_deref(),
            ],
        )?;

        for user in &project.assigned_users {
            self.conn.execute(
                "INSERT OR IGNORE INTO project_assignees (project_uuid, user_uuid)
                 VALUES (?1, ?2);",
                params![project.id.to_string(), user.to_string()],
            )?;
        }

        Ok(project.id)
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let mut project = parse_project_row(row)?;
            project.assigned_users = load_assignees(self.conn, project.id)?;
            return Ok(Some(project));
        }

        Ok(None)
    }

    fn list_projects(&self, query: &ProjectListQuery) -> RepoResult<Vec<Project>> {
        let mut sql = format!("{PROJECT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(visibility) = query.visibility {
            sql.push_str(" AND visibility = ?");
            bind_values.push(Value::Text(visibility.as_str().to_string()));
        }

        if let Some(company) = query.company {
            sql.push_str(" AND company_uuid = ?");
            bind_values.push(Value::Text(company.to_string()));
        }

        if let Some(status) = &query.status {
            sql.push_str(" AND status_slug = ?");
            bind_values.push(Value::Text(status.clone()));
        }

        if let Some(user) = query.involving {
            sql.push_str(
                " AND (project_manager = ?
                   OR EXISTS (
                       SELECT 1 FROM project_assignees
                       WHERE project_assignees.project_uuid = projects.uuid
                         AND project_assignees.user_uuid = ?))",
            );
            bind_values.push(Value::Text(user.to_string()));
            bind_values.push(Value::Text(user.to_string()));
        }

        sql.push_str(" ORDER BY title ASC, uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut projects = Vec::new();

        while let Some(row) = rows.next()? {
            let mut project = parse_project_row(row)?;
            project.assigned_users = load_assignees(self.conn, project.id)?;
            projects.push(project);
        }

        Ok(projects)
    }
}

fn load_assignees(conn: &Connection, project: ProjectId) -> RepoResult<Vec<UserId>> {
    let mut stmt = conn.prepare(
        "SELECT user_uuid FROM project_assignees
         WHERE project_uuid = ?1
         ORDER BY user_uuid ASC;",
    )?;

    let mut rows = stmt.query([project.to_string()])?;
    let mut assignees = Vec::new();

    while let Some(row) = rows.next()? {
        let user_text: String = row.get("user_uuid")?;
        let user = UserId::parse(&user_text).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid user id `{user_text}` in project_assignees.user_uuid"
            ))
        })?;
        assignees.push(user);
    }

    Ok(assignees)
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let uuid_text: String = row.get("uuid")?;
    let id = ProjectId::parse(&uuid_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in projects.uuid"))
    })?;

    // Unknown policy strings load as "no policy" and deny downstream; this
    // is the documented fail-closed behavior, not a data fault.
    let visibility = row
        .get::<_, Option<String>>("visibility")?
        .as_deref()
        .and_then(Visibility::parse);

    let company = match row.get::<_, Option<String>>("company_uuid")? {
        Some(value) => Some(CompanyId::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid company id `{value}` in projects.company_uuid"
            ))
        })?),
        None => None,
    };

    let project_manager = match row.get::<_, Option<String>>("project_manager")? {
        Some(value) => Some(UserId::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid user id `{value}` in projects.project_manager"
            ))
        })?),
        None => None,
    };

    Ok(Project {
        id,
        title: row.get("title")?,
        visibility,
        company,
        project_manager,
        assigned_users: Vec::new(),
        status: row.get("status_slug")?,
    })
}
