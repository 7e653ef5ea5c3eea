//! Shared helpers for CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use sumbench_harness::{Harness, HarnessConfig, SweepObserver};

/// Load the configuration (file, then `SUMBENCH_*` overrides) and build a harness.
pub fn load_harness(config_path: Option<&Path>) -> Result<Harness> {
    let config = load_config(config_path)?;
    Ok(Harness::new(config)?)
}

/// Load and validate the effective configuration.
pub fn load_config(config_path: Option<&Path>) -> Result<HarnessConfig> {
    HarnessConfig::load(config_path).with_context(|| match config_path {
        Some(path) => format!("Invalid configuration in {}", path.display()),
        None => "Invalid configuration".to_string(),
    })
}

/// Sweep progress rendered as an `indicatif` bar.
pub struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    pub fn new(total: usize) -> Result<Self> {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("=> "),
        );
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        Ok(Self { bar })
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl SweepObserver for ProgressObserver {
    fn config_started(&mut self, size: u64, threads: u32) {
        self.bar.set_message(format!("size={size} threads={threads}"));
    }

    fn config_finished(&mut self, done: usize, _total: usize) {
        self.bar.set_position(done as u64);
    }
}

impl Drop for ProgressObserver {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}
