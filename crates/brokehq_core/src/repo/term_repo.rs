//! Status taxonomy repository contract and SQLite implementation.
//!
//! Terms are listed unconditionally (empty terms included), matching how
//! the dashboard shows every status column even when nothing carries it.

use crate::model::term::StatusTerm;
use crate::repo::RepoResult;
use rusqlite::{params, Connection};

/// Repository interface for status taxonomy terms.
pub trait TermRepository {
    /// Persists one status term.
    fn create_term(&self, term: &StatusTerm) -> RepoResult<()>;
    /// Gets one term by slug.
    fn get_term(&self, slug: &str) -> RepoResult<Option<StatusTerm>>;
    /// Lists all terms sorted by name.
    fn list_terms(&self) -> RepoResult<Vec<StatusTerm>>;
}

/// SQLite-backed status taxonomy repository.
pub struct SqliteTermRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTermRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TermRepository for SqliteTermRepository<'_> {
    fn create_term(&self, term: &StatusTerm) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO status_terms (slug, name) VALUES (?1, ?2);",
            params![term.slug.as_str(), term.name.as_str()],
        )?;

        Ok(())
    }

    fn get_term(&self, slug: &str) -> RepoResult<Option<StatusTerm>> {
        let mut stmt = self
            .conn
            .prepare("SELECT slug, name FROM status_terms WHERE slug = ?1;")?;

        let mut rows = stmt.query([slug])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(StatusTerm {
                slug: row.get("slug")?,
                name: row.get("name")?,
            }));
        }

        Ok(None)
    }

    fn list_terms(&self) -> RepoResult<Vec<StatusTerm>> {
        let mut stmt = self
            .conn
            .prepare("SELECT slug, name FROM status_terms ORDER BY name ASC, slug ASC;")?;

        let mut rows = stmt.query([])?;
        let mut terms = Vec::new();

        while let Some(row) = rows.next()? {
            terms.push(StatusTerm {
                slug: row.get("slug")?,
                name: row.get("name")?,
            });
        }

        Ok(terms)
    }
}
