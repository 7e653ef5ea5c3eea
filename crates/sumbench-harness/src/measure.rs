//! Measurement step: run one executable repeatedly and collect its self-reported timings.
//!
//! Every benchmark program prints a single line `<value>,<elapsed_seconds>`.
//! The first field (the checksum) is ignored; the second becomes one sample.

use std::path::{Component, Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{HarnessError, HarnessResult};

/// Captured result of one child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOutput {
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Human-readable exit status (`exit status: 3`, `signal: 9`).
    pub status: String,
    pub stdout: String,
    pub stderr: String,
}

impl LaunchOutput {
    /// A successful run printing `stdout`.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            status: "exit status: 0".into(),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

/// Starts benchmark processes.
///
/// Each call must block until the child exits and its output is fully
/// captured. Implementations never run two children at once.
pub trait Launcher {
    fn launch(&mut self, program: &Path, args: &[String]) -> HarnessResult<LaunchOutput>;
}

/// Launcher backed by [`std::process::Command`]. No timeout is applied.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&mut self, program: &Path, args: &[String]) -> HarnessResult<LaunchOutput> {
        let output = Command::new(resolve_program(program))
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| HarnessError::Spawn {
                program: program.display().to_string(),
                message: e.to_string(),
            })?;

        Ok(LaunchOutput {
            success: output.status.success(),
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Path to hand to [`Command::new`].
///
/// A bare file name would be looked up on `PATH`; it is anchored to the
/// working directory instead. Other paths are returned unchanged.
///
/// ```
/// use sumbench_harness::measure::resolve_program;
/// use std::path::Path;
///
/// assert_eq!(resolve_program(Path::new("sum")), Path::new("./sum"));
/// assert_eq!(resolve_program(Path::new("bin/sum")), Path::new("bin/sum"));
/// ```
pub fn resolve_program(program: &Path) -> PathBuf {
    let mut components = program.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Path::new(".").join(program),
        _ => program.to_path_buf(),
    }
}

/// Positional arguments for one invocation: `[size]` or `[size, threads]`.
pub fn invocation_args(size: u64, threads: Option<u32>) -> Vec<String> {
    let mut args = vec![size.to_string()];
    if let Some(t) = threads {
        args.push(t.to_string());
    }
    args
}

/// Parse `<ignored>,<seconds>` from a program's standard output.
///
/// ```
/// use sumbench_harness::measure::parse_elapsed;
///
/// assert_eq!(parse_elapsed("sum", "50500,0.00125\n").unwrap(), 0.00125);
/// assert!(parse_elapsed("sum", "42").is_err());
/// assert!(parse_elapsed("sum", "42,fast").is_err());
/// ```
pub fn parse_elapsed(program: &str, stdout: &str) -> HarnessResult<f64> {
    let line = stdout.trim();
    let malformed = || HarnessError::MalformedOutput {
        program: program.to_string(),
        output: line.to_string(),
    };

    if line.contains('\n') {
        return Err(malformed());
    }

    let fields: Vec<&str> = line.split(',').collect();
    let [_, elapsed] = fields.as_slice() else {
        return Err(malformed());
    };

    let elapsed = elapsed.trim();
    match elapsed.parse::<f64>() {
        Ok(t) if t.is_finite() && t >= 0.0 => Ok(t),
        _ => Err(HarnessError::InvalidTime {
            program: program.to_string(),
            field: elapsed.to_string(),
        }),
    }
}

/// Invoke `program` `iterations` times and return the samples in invocation order.
///
/// The first failing invocation aborts the whole measurement.
pub fn measure<L: Launcher + ?Sized>(
    launcher: &mut L,
    program: &Path,
    size: u64,
    threads: Option<u32>,
    iterations: usize,
) -> HarnessResult<Vec<f64>> {
    let args = invocation_args(size, threads);
    let name = program.display().to_string();
    let mut samples = Vec::with_capacity(iterations);

    for iteration in 0..iterations {
        let output = launcher.launch(program, &args)?;
        if !output.success {
            return Err(HarnessError::ExitStatus {
                program: name,
                status: output.status,
                stderr: output.stderr.trim().to_string(),
            });
        }

        let elapsed = parse_elapsed(&name, &output.stdout)?;
        debug!(
            "{} size={} threads={:?} iter={}: {:.6}s",
            name, size, threads, iteration, elapsed
        );
        samples.push(elapsed);
    }

    Ok(samples)
}
