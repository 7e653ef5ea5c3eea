//! Sumbench Command-Line Interface
//!
//! Compiles the serial and OpenMP array-sum programs, sweeps sizes and
//! thread counts, and writes a JSON snapshot plus one chart per size.
//!
//! ```text
//! sumbench                       # compile, sweep, save, plot
//! sumbench run --skip-compile    # reuse existing binaries
//! sumbench plot -i results/json/benchmark_20250101_120000.json
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{compile, config, plot, run, summary};

/// Sumbench - serial vs. OpenMP array-sum benchmarks for C++ and Fortran
#[derive(Parser)]
#[command(name = "sumbench")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML configuration file
    #[arg(short, long, global = true, env = "SUMBENCH_CONFIG")]
    config: Option<PathBuf>,

    /// Defaults to `run` when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile all variants, run the sweep, save results and plots
    Run {
        /// Use the binaries already on disk
        #[arg(long)]
        skip_compile: bool,

        /// Do not render charts
        #[arg(long)]
        no_plots: bool,

        /// Also render speedup charts
        #[arg(long)]
        speedup: bool,
    },

    /// Compile all variants without running them
    Compile,

    /// Re-render charts from a saved snapshot
    Plot {
        /// Snapshot file (benchmark_<timestamp>.json)
        #[arg(short, long)]
        input: PathBuf,

        /// Also render speedup charts
        #[arg(long)]
        speedup: bool,
    },

    /// Print a table of mean timings from a saved snapshot
    Summary {
        /// Snapshot file (benchmark_<timestamp>.json)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the effective configuration as YAML
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let config_path = cli.config.as_deref();
    let command = cli.command.unwrap_or(Commands::Run {
        skip_compile: false,
        no_plots: false,
        speedup: false,
    });

    let result = match command {
        Commands::Run {
            skip_compile,
            no_plots,
            speedup,
        } => run::execute(config_path, skip_compile, no_plots, speedup),

        Commands::Compile => compile::execute(config_path),

        Commands::Plot { input, speedup } => plot::execute(config_path, &input, speedup),

        Commands::Summary { input } => summary::execute(&input),

        Commands::Config => config::execute(config_path),
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
