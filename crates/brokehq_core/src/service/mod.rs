//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs: the project/task
//!   access policy and the dashboard context pipeline.
//! - Keep template/rendering layers decoupled from storage details.

pub mod access_service;
pub mod context_service;
