//! Dashboard context pipeline.
//!
//! # Responsibility
//! - Aggregate the per-request data the template renderer consumes: the
//!   requester's company profile, their projects and tasks, and the
//!   visibility-filtered project list.
//!
//! # Invariants
//! - Stages run in fixed dependency order: user, projects, tasks, access.
//!   Each stage takes the prior context value and returns an updated one;
//!   no stage mutates shared state behind another's back.
//! - Every stage is a read-only, idempotent function of the request
//!   snapshot. There is no cross-stage transaction guarantee.
//! - The access stage owns the final `accessible_projects` value.

use crate::model::company::{Company, CompanyId};
use crate::model::project::Project;
use crate::model::task::{Priority, Task};
use crate::model::term::{StatusTerm, STATUS_IN_PROGRESS};
use crate::model::user::User;
use crate::repo::project_repo::{ProjectListQuery, ProjectRepository};
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use crate::repo::term_repo::TermRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoResult;
use crate::service::access_service::can_view_project;
use chrono::{Days, Local, NaiveDate};
use serde::Serialize;

/// Number of days the "upcoming" window looks ahead, inclusive.
const UPCOMING_WINDOW_DAYS: u64 = 7;

/// Kind of page being rendered, used to gate which stages load data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    ProjectArchive,
    ProjectDetail,
    TaskArchive,
    TaskDetail,
    Other,
}

impl Page {
    /// Returns whether project collections should load for this page.
    pub fn wants_project_data(self) -> bool {
        matches!(self, Self::Dashboard | Self::ProjectArchive | Self::ProjectDetail)
    }

    /// Returns whether task collections should load for this page.
    pub fn wants_task_data(self) -> bool {
        matches!(self, Self::Dashboard | Self::TaskArchive | Self::TaskDetail)
    }
}

/// Immutable per-request inputs to the context pipeline.
#[derive(Debug, Clone)]
pub struct RequestState {
    /// Authenticated requester; `None` for guests.
    pub user: Option<User>,
    pub page: Page,
    /// Reference date for overdue/upcoming windows. Injected so tests can
    /// pin the clock.
    pub today: NaiveDate,
}

impl RequestState {
    /// Builds a request state using the local calendar date.
    pub fn new(user: Option<User>, page: Page) -> Self {
        Self {
            user,
            page,
            today: Local::now().date_naive(),
        }
    }
}

/// Tasks grouped into the four fixed priority buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriorityBuckets {
    pub urgent: Vec<Task>,
    pub high: Vec<Task>,
    pub medium: Vec<Task>,
    pub low: Vec<Task>,
}

impl PriorityBuckets {
    /// Returns the bucket for one priority.
    pub fn bucket(&self, priority: Priority) -> &[Task] {
        match priority {
            Priority::Urgent => &self.urgent,
            Priority::High => &self.high,
            Priority::Medium => &self.medium,
            Priority::Low => &self.low,
        }
    }

    fn bucket_mut(&mut self, priority: Priority) -> &mut Vec<Task> {
        match priority {
            Priority::Urgent => &mut self.urgent,
            Priority::High => &mut self.high,
            Priority::Medium => &mut self.medium,
            Priority::Low => &mut self.low,
        }
    }
}

/// Request-scoped context value handed to the template renderer.
///
/// Collections default to empty; a stage that is gated off for the current
/// page leaves its fields untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardContext {
    /// All projects the requester may view, per the visibility policy.
    pub accessible_projects: Vec<Project>,
    /// Projects the requester manages or is assigned to.
    pub my_projects: Vec<Project>,
    /// Projects owned by the requester's company.
    pub company_projects: Vec<Project>,
    /// Projects carrying the in-progress status term.
    pub active_projects: Vec<Project>,
    pub project_statuses: Vec<StatusTerm>,
    /// Tasks assigned to the requester, due date ascending, undated last.
    pub my_tasks: Vec<Task>,
    pub my_tasks_by_priority: PriorityBuckets,
    /// Assigned tasks strictly past their due date.
    pub overdue_tasks: Vec<Task>,
    /// Assigned tasks due today through seven days out, inclusive.
    pub upcoming_tasks: Vec<Task>,
    pub task_statuses: Vec<StatusTerm>,
    pub user_company: Option<Company>,
    pub user_company_id: Option<CompanyId>,
    pub is_company_member: bool,
    pub user_job_title: String,
}

/// Builds the dashboard context by running the stage pipeline.
pub struct ContextService<P, T, U, S>
where
    P: ProjectRepository,
    T: TaskRepository,
    U: UserRepository,
    S: TermRepository,
{
    projects: P,
    tasks: T,
    users: U,
    terms: S,
}

impl<P, T, U, S> ContextService<P, T, U, S>
where
    P: ProjectRepository,
    T: TaskRepository,
    U: UserRepository,
    S: TermRepository,
{
    pub fn new(projects: P, tasks: T, users: U, terms: S) -> Self {
        Self {
            projects,
            tasks,
            users,
            terms,
        }
    }

    /// Runs all stages in dependency order and returns the final context.
    pub fn build(&self, request: &RequestState) -> RepoResult<DashboardContext> {
        let context = DashboardContext::default();
        let context = self.user_stage(context, request)?;
        let context = self.project_stage(context, request)?;
        let context = self.task_stage(context, request)?;
        let context = self.access_stage(context, request)?;
        Ok(context)
    }

    /// Resolves the requester's company profile and job title.
    ///
    /// Runs on every page. `is_company_member` follows the membership
    /// reference even when the company record itself cannot be loaded.
    fn user_stage(
        &self,
        mut context: DashboardContext,
        request: &RequestState,
    ) -> RepoResult<DashboardContext> {
        let Some(user) = &request.user else {
            return Ok(context);
        };

        if let Some(company_id) = user.company {
            context.user_company = self.users.get_company(company_id)?;
            context.user_company_id = Some(company_id);
            context.is_company_member = true;
        }
        context.user_job_title = user.job_title.clone();

        Ok(context)
    }

    /// Loads the project collections for project-related pages.
    fn project_stage(
        &self,
        mut context: DashboardContext,
        request: &RequestState,
    ) -> RepoResult<DashboardContext> {
        if !request.page.wants_project_data() {
            return Ok(context);
        }

        context.project_statuses = self.terms.list_terms()?;

        let Some(user) = &request.user else {
            return Ok(context);
        };

        context.my_projects = self.projects.list_projects(&ProjectListQuery {
            involving: Some(user.id),
            ..ProjectListQuery::default()
        })?;

        context.company_projects = match user.company {
            Some(company) => self.projects.list_projects(&ProjectListQuery {
                company: Some(company),
                ..ProjectListQuery::default()
            })?,
            None => Vec::new(),
        };

        // Skip the status filter entirely when the term was never defined.
        context.active_projects = match self.terms.get_term(STATUS_IN_PROGRESS)? {
            Some(term) => self.projects.list_projects(&ProjectListQuery {
                status: Some(term.slug),
                ..ProjectListQuery::default()
            })?,
            None => Vec::new(),
        };

        Ok(context)
    }

    /// Loads the task collections for task-related pages.
    ///
    /// Each collection is an independent query against the same request
    /// snapshot, one per priority bucket included.
    fn task_stage(
        &self,
        mut context: DashboardContext,
        request: &RequestState,
    ) -> RepoResult<DashboardContext> {
        if !request.page.wants_task_data() {
            return Ok(context);
        }

        context.task_statuses = self.terms.list_terms()?;

        let Some(user) = &request.user else {
            return Ok(context);
        };

        context.my_tasks = self.tasks.list_tasks(&TaskListQuery {
            assigned_to: Some(user.id),
            ..TaskListQuery::default()
        })?;

        let mut buckets = PriorityBuckets::default();
        for priority in Priority::ALL {
            *buckets.bucket_mut(priority) = self.tasks.list_tasks(&TaskListQuery {
                assigned_to: Some(user.id),
                priority: Some(priority),
                ..TaskListQuery::default()
            })?;
        }
        context.my_tasks_by_priority = buckets;

        context.overdue_tasks = self.tasks.list_tasks(&TaskListQuery {
            assigned_to: Some(user.id),
            due_before: Some(request.today),
            ..TaskListQuery::default()
        })?;

        let window_end = request
            .today
            .checked_add_days(Days::new(UPCOMING_WINDOW_DAYS))
            .unwrap_or(request.today);
        context.upcoming_tasks = self.tasks.list_tasks(&TaskListQuery {
            assigned_to: Some(user.id),
            due_within: Some((request.today, window_end)),
            ..TaskListQuery::default()
        })?;

        Ok(context)
    }

    /// Filters all projects through the visibility policy.
    ///
    /// Runs last so it owns `accessible_projects` for guests and members
    /// alike; for a guest this reduces to the public set.
    fn access_stage(
        &self,
        mut context: DashboardContext,
        request: &RequestState,
    ) -> RepoResult<DashboardContext> {
        if !request.page.wants_project_data() {
            return Ok(context);
        }

        let mut accessible = self.projects.list_projects(&ProjectListQuery::default())?;
        accessible.retain(|project| can_view_project(project, request.user.as_ref()));
        context.accessible_projects = accessible;

        Ok(context)
    }
}
