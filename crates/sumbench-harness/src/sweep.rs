//! Sweep driver: visits every (size, threads) pair exactly once.
//!
//! Sizes are the outer loop, thread counts the inner one. Parallel variants
//! are measured at every pair; serial variants only at [`UNIT_THREADS`],
//! since their timing does not depend on the thread count.

use tracing::info;

use crate::config::{SweepConfig, UNIT_THREADS, Variant};
use crate::error::HarnessResult;
use crate::measure::{Launcher, measure};
use crate::report::ConfigResult;
use crate::stats::VariantStats;

/// Progress hooks for a running sweep. Informational only.
pub trait SweepObserver {
    /// Called before the first measurement of a pair.
    fn config_started(&mut self, _size: u64, _threads: u32) {}

    /// Called after a pair's result is recorded; `done` counts from 1.
    fn config_finished(&mut self, _done: usize, _total: usize) {}
}

/// Observer that ignores all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SweepObserver for NoopObserver {}

/// Run the full sweep, measuring `variants` with `launcher`.
///
/// The first measurement failure aborts the sweep and discards every
/// result gathered so far.
pub fn run_sweep<L, O>(
    sweep: &SweepConfig,
    variants: &[Variant],
    launcher: &mut L,
    observer: &mut O,
) -> HarnessResult<Vec<ConfigResult>>
where
    L: Launcher + ?Sized,
    O: SweepObserver + ?Sized,
{
    let total = sweep.total_configurations();
    let mut results = Vec::with_capacity(total);

    for &size in sweep.sizes() {
        for &threads in sweep.threads() {
            observer.config_started(size, threads);
            info!(
                "Configuration {}/{}: size={}, threads={}",
                results.len() + 1,
                total,
                size,
                threads
            );

            let result = measure_configuration(sweep, variants, launcher, size, threads)?;
            results.push(result);
            observer.config_finished(results.len(), total);
        }
    }

    Ok(results)
}

fn measure_configuration<L: Launcher + ?Sized>(
    sweep: &SweepConfig,
    variants: &[Variant],
    launcher: &mut L,
    size: u64,
    threads: u32,
) -> HarnessResult<ConfigResult> {
    let mut result = ConfigResult::new(size, threads);

    for variant in variants {
        let thread_arg = if variant.is_parallel() {
            Some(threads)
        } else if threads == UNIT_THREADS {
            None
        } else {
            result.insert(&variant.label, None);
            continue;
        };

        let samples = measure(
            launcher,
            &variant.binary,
            size,
            thread_arg,
            sweep.iterations(),
        )?;
        let stats = VariantStats::from_samples(samples)?;
        info!(
            "  {:<18} mean={:.6}s std={:.6}s",
            variant.label, stats.mean, stats.std
        );
        result.insert(&variant.label, Some(stats));
    }

    Ok(result)
}
