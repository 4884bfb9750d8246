//! Task record and priority vocabulary.
//!
//! # Responsibility
//! - Define the task shape consumed by the task visibility delegate and the
//!   due-date/priority aggregation queries.
//!
//! # Invariants
//! - `priority` is always one of four enumerated values, bucketed in the
//!   fixed order urgent, high, medium, low.
//! - A task without `parent_project` has no inherited visibility: only the
//!   assignee and elevated users can view it.

use crate::model::project::ProjectId;
use crate::model::user::UserId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub Uuid);

impl TaskId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier from its stored text form.
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(Self)
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task urgency level, from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
}

impl Priority {
    /// All priorities in fixed dashboard bucket order.
    pub const ALL: [Priority; 4] = [
        Priority::Urgent,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    /// Stable string value used in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Parses a priority from its stored string value.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "urgent" => Some(Self::Urgent),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Task as loaded from the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable global ID.
    pub id: TaskId,
    pub title: String,
    /// Assigned user, when set.
    pub assigned_to: Option<UserId>,
    /// Parent project supplying inherited visibility, when set.
    pub parent_project: Option<ProjectId>,
    pub priority: Priority,
    /// Calendar due date, when set.
    pub due_date: Option<NaiveDate>,
    /// Status taxonomy term slug, when set.
    pub status: Option<String>,
}

impl Task {
    /// Creates a task with a generated stable ID and no relations.
    pub fn new(title: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: TaskId::new(),
            title: title.into(),
            assigned_to: None,
            parent_project: None,
            priority,
            due_date: None,
            status: None,
        }
    }

    /// Returns whether the given user is the task's assignee.
    pub fn is_assigned_to(&self, user: UserId) -> bool {
        self.assigned_to == Some(user)
    }
}
