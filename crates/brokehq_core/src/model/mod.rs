//! Domain model for BrokeHQ projects, tasks, users and companies.
//!
//! # Responsibility
//! - Define the canonical records read by the access policy and the
//!   dashboard context pipeline.
//! - Keep identifier types distinct per entity so cross-entity comparisons
//!   do not typecheck.
//!
//! # Invariants
//! - Every entity is identified by a stable, entity-specific ID newtype.
//! - Records are created/mutated by the content store's admin side; the
//!   access and context services only read them.

pub mod company;
pub mod project;
pub mod task;
pub mod term;
pub mod user;
