//! User/company directory repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Load users with their capability set in one read model.
//! - Resolve company records referenced by users and projects.
//!
//! # Invariants
//! - `capabilities` is always populated on returned users.
//! - Capability strings this module does not recognize are skipped, not
//!   rejected: the host system grants many capabilities the policy layer
//!   never consults.

use crate::model::company::{Company, CompanyId};
use crate::model::user::{Capability, User, UserId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use std::collections::BTreeSet;

/// Repository interface for user and company lookups.
pub trait UserRepository {
    /// Persists one user together with their capability set.
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    /// Gets one user by ID, capabilities included.
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Persists one company.
    fn create_company(&self, company: &Company) -> RepoResult<CompanyId>;
    /// Gets one company by ID.
    fn get_company(&self, id: CompanyId) -> RepoResult<Option<Company>>;
}

/// SQLite-backed user/company repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        self.conn.execute(
            "INSERT INTO users (uuid, display_name, company_uuid, job_title)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                user.id.to_string(),
                user.display_name.as_str(),
                user.company.map(|id| id.to_string()),
                user.job_title.as_str(),
            ],
        )?;

        for capability in &user.capabilities {
            self.conn.execute(
                "INSERT OR IGNORE INTO user_capabilities (user_uuid, capability)
                 VALUES (?1, ?2);",
                params![user.id.to_string(), capability.as_str()],
            )?;
        }

        Ok(user.id)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, display_name, company_uuid, job_title
             FROM users
             WHERE uuid = ?1;",
        )?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let mut user = parse_user_row(row)?;
            user.capabilities = load_capabilities(self.conn, user.id)?;
            return Ok(Some(user));
        }

        Ok(None)
    }

    fn create_company(&self, company: &Company) -> RepoResult<CompanyId> {
        self.conn.execute(
            "INSERT INTO companies (uuid, name) VALUES (?1, ?2);",
            params![company.id.to_string(), company.name.as_str()],
        )?;

        Ok(company.id)
    }

    fn get_company(&self, id: CompanyId) -> RepoResult<Option<Company>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid, name FROM companies WHERE uuid = ?1;")?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let uuid_text: String = row.get("uuid")?;
            let parsed = CompanyId::parse(&uuid_text).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid uuid value `{uuid_text}` in companies.uuid"
                ))
            })?;
            return Ok(Some(Company {
                id: parsed,
                name: row.get("name")?,
            }));
        }

        Ok(None)
    }
}

fn load_capabilities(conn: &Connection, user: UserId) -> RepoResult<BTreeSet<Capability>> {
    let mut stmt = conn.prepare(
        "SELECT capability FROM user_capabilities
         WHERE user_uuid = ?1
         ORDER BY capability ASC;",
    )?;

    let mut rows = stmt.query([user.to_string()])?;
    let mut capabilities = BTreeSet::new();

    while let Some(row) = rows.next()? {
        let value: String = row.get("capability")?;
        if let Some(capability) = Capability::parse(&value) {
            capabilities.insert(capability);
        }
    }

    Ok(capabilities)
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let uuid_text: String = row.get("uuid")?;
    let id = UserId::parse(&uuid_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in users.uuid"))
    })?;

    let company = match row.get::<_, Option<String>>("company_uuid")? {
        Some(value) => Some(CompanyId::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid company id `{value}` in users.company_uuid"
            ))
        })?),
        None => None,
    };

    Ok(User {
        id,
        display_name: row.get("display_name")?,
        company,
        job_title: row.get("job_title")?,
        capabilities: BTreeSet::new(),
    })
}
