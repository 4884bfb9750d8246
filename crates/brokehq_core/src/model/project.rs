//! Project record and visibility policy vocabulary.
//!
//! # Responsibility
//! - Define the project shape consumed by the visibility resolver and the
//!   dashboard aggregation queries.
//!
//! # Invariants
//! - `visibility` is one of three enumerated policies; a missing or
//!   unrecognized stored value is carried as `None` and always denies
//!   non-elevated access (explicit fail-closed policy, not a parse error).
//! - `assigned_users` is loaded together with the record so the visibility
//!   check is a pure function of the record plus the requester.

use crate::model::company::CompanyId;
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a project record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub Uuid);

impl ProjectId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier from its stored text form.
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(Self)
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ProjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Enumerated access policy on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Visible to everyone, including anonymous requests.
    Public,
    /// Visible to users sharing the project's company.
    Company,
    /// Visible to the project manager and assigned users only.
    Assigned,
}

impl Visibility {
    /// Stable string value used in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Company => "company",
            Self::Assigned => "assigned",
        }
    }

    /// Parses a visibility policy from its stored string value.
    ///
    /// Returns `None` for unknown values. Callers must treat `None` as deny,
    /// never as an error.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "public" => Some(Self::Public),
            "company" => Some(Self::Company),
            "assigned" => Some(Self::Assigned),
            _ => None,
        }
    }
}

/// Project as loaded from the content store, assignees included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Stable global ID.
    pub id: ProjectId,
    pub title: String,
    /// Access policy; `None` means an absent/unknown stored value.
    pub visibility: Option<Visibility>,
    /// Owning company, when set.
    pub company: Option<CompanyId>,
    /// Managing user, when set.
    pub project_manager: Option<UserId>,
    /// Users explicitly assigned to the project.
    pub assigned_users: Vec<UserId>,
    /// Status taxonomy term slug, when set.
    pub status: Option<String>,
}

impl Project {
    /// Creates a project with a generated stable ID and no relations.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ProjectId::new(),
            title: title.into(),
            visibility: None,
            company: None,
            project_manager: None,
            assigned_users: Vec::new(),
            status: None,
        }
    }

    /// Returns whether the given user manages this project.
    pub fn is_managed_by(&self, user: UserId) -> bool {
        self.project_manager == Some(user)
    }

    /// Returns whether the given user appears in the assigned set.
    pub fn has_assignee(&self, user: UserId) -> bool {
        self.assigned_users.contains(&user)
    }
}

#[cfg(test)]
mod tests {
    use super::{Project, Visibility};
    use crate::model::user::UserId;

    #[test]
    fn visibility_parse_round_trips_known_values() {
        for visibility in [Visibility::Public, Visibility::Company, Visibility::Assigned] {
            assert_eq!(Visibility::parse(visibility.as_str()), Some(visibility));
        }
    }

    #[test]
    fn visibility_parse_maps_unknown_values_to_none() {
        assert_eq!(Visibility::parse("friends-only"), None);
        assert_eq!(Visibility::parse(""), None);
        assert_eq!(Visibility::parse(" public "), Some(Visibility::Public));
    }

    #[test]
    fn assignment_helpers_check_the_right_relation() {
        let manager = UserId::new();
        let assignee = UserId::new();
        let outsider = UserId::new();

        let mut project = Project::new("launch");
        project.project_manager = Some(manager);
        project.assigned_users.push(assignee);

        assert!(project.is_managed_by(manager));
        assert!(!project.is_managed_by(assignee));
        assert!(project.has_assignee(assignee));
        assert!(!project.has_assignee(outsider));
    }
}
