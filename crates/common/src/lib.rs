//! Shared building blocks for the comics service crates.

pub mod types;
pub mod utils;
