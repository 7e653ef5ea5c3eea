//! Sumbench Harness: serial vs. OpenMP array-sum benchmarking
//!
//! This crate drives a benchmark sweep over external array-sum programs
//! (C++ and Fortran, serial and OpenMP-parallel), aggregates the timings
//! they report, and persists the results as a timestamped JSON snapshot plus
//! one chart per input size.
//!
//! # Overview
//!
//! - **Compilation**: every registered variant is built before any timing
//! - **Measurement**: each program is run as a blocking subprocess and its
//!   self-reported elapsed time is parsed from stdout
//! - **Sweep**: every (size, threads) pair is visited exactly once; serial
//!   variants are timed only at one thread
//! - **Statistics**: mean and population standard deviation per variant
//! - **Persistence**: `results/json/benchmark_<timestamp>.json`
//! - **Plots**: `results/plots/benchmark_<timestamp>_size_<size>.png`
//!
//! # Architecture
//!
//! ```text
//! [HarnessConfig] -> compile -> sweep (Launcher) -> stats
//!                                                     |
//!                                                     v
//!                                             BenchmarkReport
//!                                               |         |
//!                                               v         v
//!                                          JSON export   plots
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sumbench_harness::{Harness, HarnessConfig, NoopObserver, ProcessLauncher};
//!
//! let harness = Harness::new(HarnessConfig::load(None)?)?;
//! harness.compile()?;
//! let outcome = harness.run(&mut ProcessLauncher, &mut NoopObserver, true)?;
//! println!("{}", outcome.json_path.display());
//! ```

pub mod compile;
pub mod config;
pub mod error;
pub mod export;
pub mod measure;
pub mod plot;
pub mod report;
pub mod stats;
pub mod sweep;
pub mod system;

pub use config::{HarnessConfig, OutputConfig, PlotConfig, SweepConfig, Variant, VariantKind};
pub use error::{HarnessError, HarnessResult};
pub use measure::{LaunchOutput, Launcher, ProcessLauncher};
pub use report::{BenchmarkReport, ConfigResult};
pub use stats::VariantStats;
pub use sweep::{NoopObserver, SweepObserver};
pub use system::SystemInfo;

use std::path::{Path, PathBuf};

use tracing::info;

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// `YYYYMMDD_HHMMSS` shared by the snapshot and its charts.
    pub timestamp: String,
    pub report: BenchmarkReport,
    pub json_path: PathBuf,
    pub plot_paths: Vec<PathBuf>,
}

/// Orchestrates compile, sweep, export and plotting for one configuration.
pub struct Harness {
    config: HarnessConfig,
}

impl Harness {
    /// Create a harness; the configuration is validated up front.
    pub fn new(config: HarnessConfig) -> HarnessResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this harness runs.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Build every variant.
    pub fn compile(&self) -> HarnessResult<()> {
        compile::compile_all(&self.config.variants)
    }

    /// Check that every variant's binary is already built.
    pub fn ensure_binaries(&self) -> HarnessResult<()> {
        compile::ensure_binaries(&self.config.variants)
    }

    /// Run the sweep, save the snapshot and (optionally) render charts.
    ///
    /// Nothing is written to disk unless the sweep completes.
    pub fn run<L, O>(
        &self,
        launcher: &mut L,
        observer: &mut O,
        plots: bool,
    ) -> HarnessResult<RunOutcome>
    where
        L: Launcher + ?Sized,
        O: SweepObserver + ?Sized,
    {
        let timestamp = export::timestamp_now();
        let system_info = SystemInfo::capture();
        info!(
            "Running on {} ({}, {} CPUs)",
            system_info.platform, system_info.processor, system_info.cpu_count
        );

        let benchmarks =
            sweep::run_sweep(&self.config.sweep, &self.config.variants, launcher, observer)?;
        let report = BenchmarkReport {
            system_info,
            benchmarks,
        };

        let json_path = export::save_report(&report, &self.config.output.json_dir(), &timestamp)?;
        info!("Results saved to {}", json_path.display());

        let plot_paths = if plots {
            self.plot(&report, &timestamp)?
        } else {
            Vec::new()
        };

        Ok(RunOutcome {
            timestamp,
            report,
            json_path,
            plot_paths,
        })
    }

    /// Render charts for an existing report under the configured plots dir.
    pub fn plot(&self, report: &BenchmarkReport, timestamp: &str) -> HarnessResult<Vec<PathBuf>> {
        plot::plot_report(
            report,
            &self.config.variants,
            &self.config.output.plots_dir(),
            timestamp,
            &self.config.plot,
        )
    }

    /// Load a snapshot and re-render its charts with the snapshot's timestamp.
    pub fn replot(&self, snapshot: &Path) -> HarnessResult<Vec<PathBuf>> {
        let timestamp = export::timestamp_from_path(snapshot).ok_or_else(|| {
            HarnessError::Config(format!(
                "{} is not named benchmark_<YYYYMMDD_HHMMSS>.json",
                snapshot.display()
            ))
        })?;
        let report = export::load_report(snapshot)?;
        self.plot(&report, &timestamp)
    }
}
