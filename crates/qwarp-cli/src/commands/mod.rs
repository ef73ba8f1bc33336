//! CLI command implementations.

pub mod common;
pub mod gauge;
pub mod reorder;
pub mod verify;
pub mod version;
