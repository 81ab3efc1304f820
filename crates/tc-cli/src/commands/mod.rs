//! CLI command implementations.

pub mod projects;
pub mod push;
