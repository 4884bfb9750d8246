//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts over the content store.
//! - Isolate SQLite query details from the access policy and context
//!   pipeline.
//!
//! # Invariants
//! - Read paths reject invalid persisted state (`InvalidData`) instead of
//!   masking it, with one deliberate exception: unknown project visibility
//!   values load as "no policy" and deny access downstream.
//! - Absent records are `Ok(None)`, never errors: the access layer turns
//!   them into denials.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod project_repo;
pub mod task_repo;
pub mod term_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for content-store persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
