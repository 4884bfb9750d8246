//! Project and task access policy.
//!
//! # Responsibility
//! - Decide view access to projects from visibility, company membership
//!   and assignment.
//! - Decide edit access to projects from the elevated capability and
//!   project-manager identity.
//! - Decide view access to tasks from direct assignment, falling back to
//!   the parent project's visibility rule.
//!
//! # Invariants
//! - Every check fails closed: missing records, absent relations and
//!   anonymous requests all produce a plain deny, never an error.
//! - `Err` is reserved for storage faults and never encodes a denial.
//! - Edit access never consults visibility: an assigned viewer who is not
//!   manager or elevated can view but not edit.

use crate::model::project::{Project, ProjectId, Visibility};
use crate::model::task::{Task, TaskId};
use crate::model::user::User;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoResult;

/// Decides whether the requester may view the given project.
///
/// Pure function of the loaded record plus the requester.
///
/// # Policy
/// - `public` allows everyone, anonymous requests included.
/// - Anonymous requests are denied for every other policy.
/// - `company` allows exactly the users whose company matches the
///   project's; this branch is terminal and does not fall through to the
///   elevated-capability override.
/// - `assigned` allows the project manager and assigned users.
/// - The elevated capability allows whatever the branches above did not
///   decide, including projects with a missing or unrecognized policy.
/// - Everything else is denied. An absent policy value denies by choice,
///   not by accident.
pub fn can_view_project(project: &Project, requester: Option<&User>) -> bool {
    if project.visibility == Some(Visibility::Public) {
        return true;
    }

    let Some(user) = requester else {
        return false;
    };

    match project.visibility {
        Some(Visibility::Company) => {
            return match (user.company, project.company) {
                (Some(mine), Some(theirs)) => mine == theirs,
                _ => false,
            };
        }
        Some(Visibility::Assigned) => {
            if project.is_managed_by(user.id) || project.has_assignee(user.id) {
                return true;
            }
        }
        _ => {}
    }

    user.is_elevated()
}

/// Decides whether the requester may edit the given project.
///
/// Allows the elevated capability and the project manager; everyone else
/// is denied regardless of what `can_view_project` would say.
pub fn can_edit_project(project: &Project, requester: Option<&User>) -> bool {
    let Some(user) = requester else {
        return false;
    };

    user.is_elevated() || project.is_managed_by(user.id)
}

/// Decides whether the requester may view the given task.
///
/// The assignee can always view their task; the elevated capability views
/// everything; otherwise visibility is inherited from the parent project.
/// A task without a loadable parent is denied.
pub fn can_view_task(task: &Task, parent: Option<&Project>, requester: Option<&User>) -> bool {
    if let Some(user) = requester {
        if task.is_assigned_to(user.id) {
            return true;
        }
        if user.is_elevated() {
            return true;
        }
    }

    match parent {
        Some(project) => can_view_project(project, requester),
        None => false,
    }
}

/// By-ID access checks over the content store.
///
/// Loads records through the repositories and applies the pure policy
/// functions above. Exists so template-level callers can ask about IDs they
/// hold without touching the repository layer themselves.
pub struct AccessService<P: ProjectRepository, T: TaskRepository> {
    projects: P,
    tasks: T,
}

impl<P: ProjectRepository, T: TaskRepository> AccessService<P, T> {
    pub fn new(projects: P, tasks: T) -> Self {
        Self { projects, tasks }
    }

    /// Checks view access to the project with the given ID.
    ///
    /// Returns `Ok(false)` when the project does not exist.
    pub fn can_view_project(
        &self,
        id: ProjectId,
        requester: Option<&User>,
    ) -> RepoResult<bool> {
        let Some(project) = self.projects.get_project(id)? else {
            return Ok(false);
        };

        Ok(can_view_project(&project, requester))
    }

    /// Checks edit access to the project with the given ID.
    ///
    /// The elevated capability short-circuits before the record is loaded,
    /// mirroring the view that an elevated user may edit anything the admin
    /// surface lets them address.
    pub fn can_edit_project(
        &self,
        id: ProjectId,
        requester: Option<&User>,
    ) -> RepoResult<bool> {
        let Some(user) = requester else {
            return Ok(false);
        };

        if user.is_elevated() {
            return Ok(true);
        }

        let Some(project) = self.projects.get_project(id)? else {
            return Ok(false);
        };

        Ok(project.is_managed_by(user.id))
    }

    /// Checks view access to the task with the given ID.
    ///
    /// Returns `Ok(false)` when the task does not exist, and when its
    /// parent project is unset or cannot be loaded.
    pub fn can_view_task(&self, id: TaskId, requester: Option<&User>) -> RepoResult<bool> {
        let Some(task) = self.tasks.get_task(id)? else {
            return Ok(false);
        };

        if let Some(user) = requester {
            if task.is_assigned_to(user.id) || user.is_elevated() {
                return Ok(true);
            }
        }

        let Some(parent_id) = task.parent_project else {
            return Ok(false);
        };

        let parent = self.projects.get_project(parent_id)?;
        Ok(can_view_task(&task, parent.as_ref(), requester))
    }
}
