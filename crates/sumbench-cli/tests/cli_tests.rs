//! CLI command parsing and configuration tests.
//!
//! Tests cover argument parsing (via clap `try_parse_from`) and the
//! configuration loading the commands share.

// ============================================================================
// Configuration loading (what commands::common::load_config does)
// ============================================================================

mod config_loading {
    use std::fs;

    use sumbench_harness::{HarnessConfig, HarnessError, VariantKind};

    #[test]
    fn test_defaults_register_four_variants() {
        let config = HarnessConfig::default();
        let labels: Vec<_> = config.variants.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["cpp_parallel", "cpp_serial", "fortran_parallel", "fortran_serial"]
        );
        assert_eq!(
            config
                .variants
                .iter()
                .filter(|v| v.kind == VariantKind::Serial)
                .count(),
            2
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sumbench.yaml");
        fs::write(
            &path,
            concat!(
                "sweep:\n  sizes: [1000, 2000]\n  threads: [1, 8]\n  iterations: 5\n",
                "plot:\n  speedup: true\n",
            ),
        )
        .unwrap();

        let config = HarnessConfig::from_file(&path).unwrap();
        assert_eq!(config.sweep.sizes(), &[1000, 2000]);
        assert_eq!(config.sweep.threads(), &[1, 8]);
        assert_eq!(config.sweep.iterations(), 5);
        assert!(config.plot.speedup);
        assert_eq!(config.variants.len(), 4);
    }

    #[test]
    fn test_missing_file() {
        let result = HarnessConfig::from_file("/nonexistent/sumbench.yaml");
        assert!(matches!(result, Err(HarnessError::Config(_))));
    }

    #[test]
    fn test_invalid_sweep_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "sweep:\n  sizes: []\n").unwrap();
        let err = HarnessConfig::from_file(&path).unwrap_err().to_string();
        assert!(err.contains("sizes"));
    }

    #[test]
    fn test_env_overrides() {
        let config = HarnessConfig::default()
            .merge_env_with(|key| match key {
                "SUMBENCH_SIZES" => Some("10, 20".into()),
                "SUMBENCH_ITERATIONS" => Some("1".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.sweep.sizes(), &[10, 20]);
        assert_eq!(config.sweep.iterations(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_effective_config_yaml_roundtrip() {
        let config = HarnessConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(HarnessConfig::from_yaml_str(&yaml).unwrap(), config);
    }
}

// ============================================================================
// Clap argument parsing (test via try_parse_from on equivalent structs)
// ============================================================================

mod clap_parsing {
    use std::path::PathBuf;

    use clap::{Parser, Subcommand};

    // Mirror the CLI struct for testing (since main.rs is a binary)
    #[derive(Parser)]
    #[command(name = "sumbench")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        #[arg(short, long, global = true)]
        config: Option<PathBuf>,

        #[command(subcommand)]
        command: Option<TestCommands>,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Run {
            #[arg(long)]
            skip_compile: bool,
            #[arg(long)]
            no_plots: bool,
            #[arg(long)]
            speedup: bool,
        },
        Compile,
        Plot {
            #[arg(short, long)]
            input: PathBuf,
            #[arg(long)]
            speedup: bool,
        },
        Summary {
            #[arg(short, long)]
            input: PathBuf,
        },
        Config,
    }

    #[test]
    fn test_no_subcommand_defaults_to_run() {
        let cli = TestCli::try_parse_from(["sumbench"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_run_defaults() {
        let cli = TestCli::try_parse_from(["sumbench", "run"]).unwrap();
        match cli.command {
            Some(TestCommands::Run {
                skip_compile,
                no_plots,
                speedup,
            }) => {
                assert!(!skip_compile);
                assert!(!no_plots);
                assert!(!speedup);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_run_all_flags() {
        let cli = TestCli::try_parse_from([
            "sumbench",
            "run",
            "--skip-compile",
            "--no-plots",
            "--speedup",
        ])
        .unwrap();
        match cli.command {
            Some(TestCommands::Run {
                skip_compile,
                no_plots,
                speedup,
            }) => {
                assert!(skip_compile);
                assert!(no_plots);
                assert!(speedup);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_compile() {
        let cli = TestCli::try_parse_from(["sumbench", "compile"]).unwrap();
        assert!(matches!(cli.command, Some(TestCommands::Compile)));
    }

    #[test]
    fn test_plot() {
        let cli = TestCli::try_parse_from([
            "sumbench",
            "plot",
            "-i",
            "results/json/benchmark_20250101_120000.json",
            "--speedup",
        ])
        .unwrap();
        match cli.command {
            Some(TestCommands::Plot { input, speedup }) => {
                assert_eq!(
                    input,
                    PathBuf::from("results/json/benchmark_20250101_120000.json")
                );
                assert!(speedup);
            }
            _ => panic!("Expected Plot command"),
        }
    }

    #[test]
    fn test_plot_requires_input() {
        let result = TestCli::try_parse_from(["sumbench", "plot"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_summary() {
        let cli = TestCli::try_parse_from(["sumbench", "summary", "--input", "snap.json"]).unwrap();
        match cli.command {
            Some(TestCommands::Summary { input }) => assert_eq!(input, PathBuf::from("snap.json")),
            _ => panic!("Expected Summary command"),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = TestCli::try_parse_from(["sumbench", "config", "-c", "bench.yaml"]).unwrap();
        assert!(matches!(cli.command, Some(TestCommands::Config)));
        assert_eq!(cli.config, Some(PathBuf::from("bench.yaml")));
    }

    #[test]
    fn test_verbosity_levels() {
        let cli = TestCli::try_parse_from(["sumbench", "-vv", "run"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let cli = TestCli::try_parse_from(["sumbench", "-v", "-v", "-v"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_unknown_subcommand() {
        let result = TestCli::try_parse_from(["sumbench", "bench"]);
        assert!(result.is_err());
    }
}
