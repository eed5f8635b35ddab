//! Command implementations

pub mod common;
pub mod history;
pub mod migrate;
pub mod plan;
pub mod status;
