//! Compile command implementation.

use anyhow::Result;
use console::style;
use std::path::Path;

use sumbench_harness::compile::compiler_args;

use super::common::load_harness;

/// Execute the compile command.
pub fn execute(config_path: Option<&Path>) -> Result<()> {
    let harness = load_harness(config_path)?;

    for variant in &harness.config().variants {
        println!(
            "{} {} {} {}",
            style("→").cyan().bold(),
            style(&variant.label).yellow(),
            variant.compiler,
            compiler_args(variant).join(" ")
        );
    }

    harness.compile()?;

    println!(
        "{} Compiled {} variant(s)",
        style("✓").green().bold(),
        harness.config().variants.len()
    );
    Ok(())
}
