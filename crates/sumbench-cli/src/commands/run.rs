//! Run command implementation.
//!
//! `sumbench run [--skip-compile] [--no-plots] [--speedup]`, also the default
//! when no subcommand is given.

use anyhow::Result;
use console::style;
use std::path::Path;

use sumbench_harness::{Harness, ProcessLauncher};

use super::common::{ProgressObserver, load_config};
use super::summary::print_table;

/// Execute the run command.
pub fn execute(
    config_path: Option<&Path>,
    skip_compile: bool,
    no_plots: bool,
    speedup: bool,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if speedup {
        config.plot.speedup = true;
    }
    let plots = config.plot.enabled && !no_plots;
    let harness = Harness::new(config)?;
    let sweep = &harness.config().sweep;

    println!(
        "{} Benchmarking {} variant(s): sizes {:?}, threads {:?}, {} iteration(s)",
        style("→").cyan().bold(),
        harness.config().variants.len(),
        sweep.sizes(),
        sweep.threads(),
        sweep.iterations()
    );

    if skip_compile {
        harness.ensure_binaries()?;
        println!("  Using existing binaries");
    } else {
        harness.compile()?;
        println!("{} Compilation complete", style("✓").green().bold());
    }

    let mut progress = ProgressObserver::new(sweep.total_configurations())?;
    let outcome = harness.run(&mut ProcessLauncher, &mut progress, plots)?;
    progress.finish();

    println!(
        "{} Benchmark complete: {} configuration(s)",
        style("✓").green().bold(),
        outcome.report.benchmarks.len()
    );
    print_table(&outcome.report);

    println!();
    println!("  Results: {}", style(outcome.json_path.display()).green());
    for path in &outcome.plot_paths {
        println!("  Plot:    {}", style(path.display()).green());
    }

    Ok(())
}
