//! Persistence layer for the Team Portal backend.
//!
//! This crate contains:
//! - Database connection management and schema migrations
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - Query timing metrics

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
