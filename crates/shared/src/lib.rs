//! Shared utilities and common types for the Team Portal backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Session token validation (JWT)
//! - Common validation logic
//! - Wall-clock helpers for operating windows

pub mod clock;
pub mod jwt;
pub mod validation;
