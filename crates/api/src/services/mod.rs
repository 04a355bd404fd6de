//! Request-level services used by the route handlers.

pub mod authorization;
pub mod cookies;
