//! CLI command implementations.

pub mod common;
pub mod compile;
pub mod config;
pub mod plot;
pub mod run;
pub mod summary;
