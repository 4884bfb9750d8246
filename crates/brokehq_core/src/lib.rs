//! Core domain logic for BrokeHQ.
//! This crate is the single source of truth for project/task access policy
//! and dashboard context aggregation.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::company::{Company, CompanyId};
pub use model::project::{Project, ProjectId, Visibility};
pub use model::task::{Priority, Task, TaskId};
pub use model::term::{StatusTerm, STATUS_IN_PROGRESS};
pub use model::user::{Capability, User, UserId};
pub use repo::project_repo::{ProjectListQuery, ProjectRepository, SqliteProjectRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
pub use repo::term_repo::{SqliteTermRepository, TermRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::access_service::{
    can_edit_project, can_view_project, can_view_task, AccessService,
};
pub use service::context_service::{
    ContextService, DashboardContext, Page, PriorityBuckets, RequestState,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
