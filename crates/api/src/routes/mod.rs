//! HTTP route handlers.

pub mod courses;
pub mod health;
pub mod me;
pub mod monthly_plans;
pub mod places;
pub mod tasks;
pub mod visitors;
