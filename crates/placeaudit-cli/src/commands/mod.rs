//! CLI command implementations.

pub mod check;
pub mod prepare;
pub mod send;
