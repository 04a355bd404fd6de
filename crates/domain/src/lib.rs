//! Domain layer for the Team Portal backend.
//!
//! This crate contains:
//! - Domain models (tasks, monthly plans, places, visitors, courses)
//! - Business rules (task lifecycle, participation accounting, free slots)
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;

pub use error::DomainError;
