//! User record and host-system capability vocabulary.
//!
//! # Responsibility
//! - Model the requesting user as seen by the access policy: identity,
//!   company membership and capability set.
//!
//! # Invariants
//! - An absent user (anonymous request) is represented as `Option::None` at
//!   call sites, never as a sentinel user value.

use crate::model::company::CompanyId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier from its stored text form.
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(Self)
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host-system capability relevant to project/task authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Elevated permission equivalent to "can edit others' content".
    /// Grants blanket view/edit access in the policy checks.
    EditOthersPosts,
}

/// Stored string value for [`Capability::EditOthersPosts`].
pub const CAPABILITY_EDIT_OTHERS_POSTS: &str = "edit_others_posts";

impl Capability {
    /// Stable string id used in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EditOthersPosts => CAPABILITY_EDIT_OTHERS_POSTS,
        }
    }

    /// Parses one capability from its stored string value.
    ///
    /// Unknown values map to `None`: capabilities granted by the host system
    /// that this module does not consult are simply ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            CAPABILITY_EDIT_OTHERS_POSTS => Some(Self::EditOthersPosts),
            _ => None,
        }
    }
}

/// Authenticated user as loaded from the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable global ID.
    pub id: UserId,
    pub display_name: String,
    /// Company membership; `None` for users outside any company.
    pub company: Option<CompanyId>,
    /// Free-form job title; empty string when unset.
    pub job_title: String,
    /// Capability set granted by the host system's role model.
    pub capabilities: BTreeSet<Capability>,
}

impl User {
    /// Creates a user with a generated stable ID and no company/capabilities.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            display_name: display_name.into(),
            company: None,
            job_title: String::new(),
            capabilities: BTreeSet::new(),
        }
    }

    /// Returns whether this user holds the given capability.
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Returns whether this user holds the elevated edit capability.
    pub fn is_elevated(&self) -> bool {
        self.has_capability(Capability::EditOthersPosts)
    }
}

#[cfg(test)]
mod tests {
    use super::{Capability, User};

    #[test]
    fn capability_parse_round_trips_known_value() {
        let parsed = Capability::parse("edit_others_posts");
        assert_eq!(parsed, Some(Capability::EditOthersPosts));
        assert_eq!(Capability::EditOthersPosts.as_str(), "edit_others_posts");
    }

    #[test]
    fn capability_parse_ignores_unknown_values() {
        assert_eq!(Capability::parse("manage_options"), None);
        assert_eq!(Capability::parse(""), None);
    }

    #[test]
    fn new_user_has_no_elevated_access() {
        let user = User::new("plain user");
        assert!(!user.is_elevated());
        assert!(user.company.is_none());
        assert!(user.job_title.is_empty());
    }

    #[test]
    fn elevated_flag_follows_capability_set() {
        let mut user = User::new("editor");
        user.capabilities.insert(Capability::EditOthersPosts);
        assert!(user.is_elevated());
    }
}
