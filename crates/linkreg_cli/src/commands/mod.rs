//! CLI command implementations.

pub mod assets;
pub mod edit;
pub mod galaxy;
pub mod users;
