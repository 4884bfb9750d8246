//! Status taxonomy terms shared by projects and tasks.

use serde::{Deserialize, Serialize};

/// Slug of the status term marking a project as actively worked on.
pub const STATUS_IN_PROGRESS: &str = "in-progress";

/// One term of the flat `status` taxonomy.
///
/// Terms are identified by slug; the display name is free-form. Both
/// projects and tasks reference the same taxonomy, as the host system
/// defines only one status vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTerm {
    pub slug: String,
    pub name: String,
}

impl StatusTerm {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
        }
    }
}
