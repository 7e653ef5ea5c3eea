//! Config command implementation.

use anyhow::Result;
use std::path::Path;

use super::common::load_config;

/// Execute the config command.
pub fn execute(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    print!("{}", config.to_yaml()?);
    Ok(())
}
