//! Plot command implementation.
//!
//! `sumbench plot --input results/json/benchmark_<timestamp>.json [--speedup]`

use anyhow::Result;
use console::style;
use std::path::Path;

use sumbench_harness::Harness;

use super::common::load_config;

/// Execute the plot command.
pub fn execute(config_path: Option<&Path>, input: &Path, speedup: bool) -> Result<()> {
    let mut config = load_config(config_path)?;
    if speedup {
        config.plot.speedup = true;
    }
    let harness = Harness::new(config)?;

    println!(
        "{} Plotting {}",
        style("→").cyan().bold(),
        style(input.display()).green()
    );

    let written = harness.replot(input)?;
    for path in &written {
        println!("  Plot:    {}", style(path.display()).green());
    }
    println!(
        "{} Wrote {} chart(s)",
        style("✓").green().bold(),
        written.len()
    );
    Ok(())
}
