//! Harness configuration.
//!
//! Supports loading configuration from:
//! 1. A YAML file
//! 2. Environment variables (with `SUMBENCH_` prefix)
//!
//! Precedence (highest to lowest): environment, file, defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{HarnessError, HarnessResult};

/// Thread count at which serial variants are measured.
pub const UNIT_THREADS: u32 = 1;

/// The (size, thread-count) grid and repetition count of one run.
///
/// Fields are private; once validated the sweep is only ever read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(default = "default_sizes")]
    sizes: Vec<u64>,
    #[serde(default = "default_threads")]
    threads: Vec<u32>,
    #[serde(default = "default_iterations")]
    iterations: usize,
}

impl SweepConfig {
    /// Create a validated sweep.
    ///
    /// ```
    /// use sumbench_harness::SweepConfig;
    ///
    /// let sweep = SweepConfig::new(vec![1000, 10_000], vec![1, 2, 4], 3).unwrap();
    /// assert_eq!(sweep.total_configurations(), 6);
    /// assert!(SweepConfig::new(vec![], vec![1], 3).is_err());
    /// ```
    pub fn new(sizes: Vec<u64>, threads: Vec<u32>, iterations: usize) -> HarnessResult<Self> {
        let sweep = Self {
            sizes,
            threads,
            iterations,
        };
        sweep.validate()?;
        Ok(sweep)
    }

    /// Input sizes, in sweep order.
    pub fn sizes(&self) -> &[u64] {
        &self.sizes
    }

    /// Thread counts, in sweep order.
    pub fn threads(&self) -> &[u32] {
        &self.threads
    }

    /// Invocations per variant per configuration.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Number of (size, threads) pairs the sweep visits.
    pub fn total_configurations(&self) -> usize {
        self.sizes.len() * self.threads.len()
    }

    /// Check that every dimension is non-empty and strictly positive.
    pub fn validate(&self) -> HarnessResult<()> {
        if self.sizes.is_empty() {
            return Err(HarnessError::Config("sweep.sizes must not be empty".into()));
        }
        if self.threads.is_empty() {
            return Err(HarnessError::Config("sweep.threads must not be empty".into()));
        }
        if self.sizes.contains(&0) {
            return Err(HarnessError::Config("sweep.sizes must be positive".into()));
        }
        if self.threads.contains(&0) {
            return Err(HarnessError::Config("sweep.threads must be positive".into()));
        }
        if self.iterations == 0 {
            return Err(HarnessError::Config(
                "sweep.iterations must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            sizes: default_sizes(),
            threads: default_threads(),
            iterations: default_iterations(),
        }
    }
}

/// Whether a variant takes a thread count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    /// Invoked as `<binary> <size> <threads>` at every thread count.
    Parallel,
    /// Invoked as `<binary> <size>`, only at the unit thread count.
    Serial,
}

/// One benchmarked implementation: how to build it and where the binary lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Key in the JSON snapshot and legend entry in plots.
    pub label: String,
    /// Toolchain family (`cpp`, `fortran`); pairs serial baselines with parallel runs.
    pub toolchain: String,
    pub kind: VariantKind,
    pub compiler: String,
    #[serde(default)]
    pub flags: Vec<String>,
    pub source: PathBuf,
    pub binary: PathBuf,
}

impl Variant {
    fn new(
        label: &str,
        toolchain: &str,
        kind: VariantKind,
        compiler: &str,
        flags: &[&str],
        source: &str,
        binary: &str,
    ) -> Self {
        Self {
            label: label.into(),
            toolchain: toolchain.into(),
            kind,
            compiler: compiler.into(),
            flags: flags.iter().map(|f| (*f).to_string()).collect(),
            source: PathBuf::from(source),
            binary: PathBuf::from(binary),
        }
    }

    /// True for variants measured at every thread count.
    pub fn is_parallel(&self) -> bool {
        self.kind == VariantKind::Parallel
    }

    /// The default registry: C++ and Fortran, each parallel and serial.
    pub fn default_registry() -> Vec<Variant> {
        vec![
            Variant::new(
                "cpp_parallel",
                "cpp",
                VariantKind::Parallel,
                "g++",
                &["-fopenmp", "-O3"],
                "src/cpp/parallel/array_sum_parallel.cpp",
                "src/cpp/parallel/array_sum_parallel",
            ),
            Variant::new(
                "cpp_serial",
                "cpp",
                VariantKind::Serial,
                "g++",
                &["-O3"],
                "src/cpp/serial/array_sum_serial.cpp",
                "src/cpp/serial/array_sum_serial",
            ),
            Variant::new(
                "fortran_parallel",
                "fortran",
                VariantKind::Parallel,
                "gfortran",
                &["-fopenmp", "-O3"],
                "src/fortran/parallel/array_sum_parallel.f90",
                "src/fortran/parallel/array_sum_parallel",
            ),
            Variant::new(
                "fortran_serial",
                "fortran",
                VariantKind::Serial,
                "gfortran",
                &["-O3"],
                "src/fortran/serial/array_sum_serial.f90",
                "src/fortran/serial/array_sum_serial",
            ),
        ]
    }
}

/// Where snapshots and charts are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

impl OutputConfig {
    /// Directory holding `benchmark_<timestamp>.json` snapshots.
    pub fn json_dir(&self) -> PathBuf {
        self.results_dir.join("json")
    }

    /// Directory holding rendered charts.
    pub fn plots_dir(&self) -> PathBuf {
        self.results_dir.join("plots")
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
        }
    }
}

/// Chart rendering settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Render charts at the end of a run.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// TrueType font for captions and labels; searched for when unset.
    #[serde(default)]
    pub font: Option<PathBuf>,
    /// Also render speedup charts.
    #[serde(default)]
    pub speedup: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            width: default_width(),
            height: default_height(),
            font: None,
            speedup: false,
        }
    }
}

/// Complete harness configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default = "Variant::default_registry")]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub plot: PlotConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            sweep: SweepConfig::default(),
            variants: Variant::default_registry(),
            output: OutputConfig::default(),
            plot: PlotConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(source: &str) -> HarnessResult<Self> {
        let config: HarnessConfig = serde_yaml_ng::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> HarnessResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            HarnessError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> HarnessResult<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env_with(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SUMBENCH_*` overrides read through `lookup`.
    ///
    /// Only variables that are set override the current values. Lists are
    /// comma separated: `SUMBENCH_SIZES=1000,100000`.
    pub fn merge_env_with<F>(mut self, lookup: F) -> HarnessResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SUMBENCH_SIZES") {
            self.sweep.sizes = parse_list("SUMBENCH_SIZES", &v)?;
        }
        if let Some(v) = lookup("SUMBENCH_THREADS") {
            self.sweep.threads = parse_list("SUMBENCH_THREADS", &v)?;
        }
        if let Some(v) = lookup("SUMBENCH_ITERATIONS") {
            self.sweep.iterations = v.trim().parse().map_err(|_| {
                HarnessError::Config(format!("SUMBENCH_ITERATIONS: invalid count {v:?}"))
            })?;
        }
        if let Some(v) = lookup("SUMBENCH_RESULTS_DIR") {
            self.output.results_dir = PathBuf::from(v);
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> HarnessResult<()> {
        self.sweep.validate()?;

        if self.variants.is_empty() {
            return Err(HarnessError::Config(
                "at least one variant must be registered".into(),
            ));
        }

        let mut seen = HashSet::new();
        for variant in &self.variants {
            if variant.label.trim().is_empty() {
                return Err(HarnessError::Config("variant label must not be empty".into()));
            }
            if matches!(variant.label.as_str(), "size" | "threads") {
                return Err(HarnessError::Config(format!(
                    "variant label '{}' collides with a snapshot field",
                    variant.label
                )));
            }
            if !seen.insert(variant.label.as_str()) {
                return Err(HarnessError::Config(format!(
                    "duplicate variant label '{}'",
                    variant.label
                )));
            }
        }

        if self.plot.width == 0 || self.plot.height == 0 {
            return Err(HarnessError::Config("plot dimensions must be positive".into()));
        }

        Ok(())
    }

    /// Serialize the effective configuration back to YAML.
    pub fn to_yaml(&self) -> HarnessResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

fn parse_list<T: std::str::FromStr>(key: &str, value: &str) -> HarnessResult<Vec<T>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .map_err(|_| HarnessError::Config(format!("{key}: invalid entry {s:?}")))
        })
        .collect()
}

fn default_sizes() -> Vec<u64> {
    vec![1000]
}

fn default_threads() -> Vec<u32> {
    vec![1, 2, 4, 8, 16]
}

fn default_iterations() -> usize {
    5
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_true() -> bool {
    true
}

fn default_width() -> u32 {
    1024
}

fn default_height() -> u32 {
    768
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = HarnessConfig::default();
        assert_eq!(config.sweep.sizes(), &[1000]);
        assert_eq!(config.sweep.threads(), &[1, 2, 4, 8, 16]);
        assert_eq!(config.sweep.iterations(), 5);
        assert_eq!(config.variants.len(), 4);
        assert_eq!(config.output.json_dir(), PathBuf::from("results/json"));
        assert_eq!(config.output.plots_dir(), PathBuf::from("results/plots"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_registry_kinds() {
        let registry = Variant::default_registry();
        let parallel: Vec<_> = registry
            .iter()
            .filter(|v| v.is_parallel())
            .map(|v| v.label.as_str())
            .collect();
        assert_eq!(parallel, vec!["cpp_parallel", "fortran_parallel"]);
        assert!(
            registry
                .iter()
                .filter(|v| v.is_parallel())
                .all(|v| v.flags.contains(&"-fopenmp".to_string()))
        );
        assert!(registry.iter().all(|v| v.flags.contains(&"-O3".to_string())));
    }

    #[test]
    fn test_sweep_rejects_zero() {
        assert!(SweepConfig::new(vec![1000], vec![0, 2], 1).is_err());
        assert!(SweepConfig::new(vec![0], vec![1], 1).is_err());
        assert!(SweepConfig::new(vec![1000], vec![1], 0).is_err());
        assert!(SweepConfig::new(vec![1000], vec![], 1).is_err());
    }

    #[test]
    fn test_yaml_partial_uses_defaults() {
        let yaml = r#"
sweep:
  sizes: [1000, 1000000]
  iterations: 2
output:
  results_dir: /tmp/bench
"#;
        let config = HarnessConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.sweep.sizes(), &[1000, 1_000_000]);
        assert_eq!(config.sweep.threads(), &[1, 2, 4, 8, 16]);
        assert_eq!(config.sweep.iterations(), 2);
        assert_eq!(config.variants.len(), 4);
        assert_eq!(config.output.results_dir, PathBuf::from("/tmp/bench"));
        assert!(!config.plot.speedup);
    }

    #[test]
    fn test_yaml_custom_variants() {
        let yaml = r#"
variants:
  - label: rust_parallel
    toolchain: rust
    kind: parallel
    compiler: rustc
    flags: ["-O"]
    source: sum.rs
    binary: target/sum
"#;
        let config = HarnessConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.variants.len(), 1);
        assert_eq!(config.variants[0].kind, VariantKind::Parallel);
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        let mut config = HarnessConfig::default();
        let dup = config.variants[0].clone();
        config.variants.push(dup);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate variant label"));
    }

    #[test]
    fn test_reserved_label_rejected() {
        let mut config = HarnessConfig::default();
        config.variants[0].label = "threads".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_yaml_sweep_rejected() {
        let yaml = "sweep:\n  sizes: []\n";
        assert!(HarnessConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("SUMBENCH_SIZES", "10, 20"),
            ("SUMBENCH_THREADS", "1,4"),
            ("SUMBENCH_ITERATIONS", "7"),
            ("SUMBENCH_RESULTS_DIR", "out"),
        ]
        .into_iter()
        .collect();

        let config = HarnessConfig::default()
            .merge_env_with(|k| env.get(k).map(|v| (*v).to_string()))
            .unwrap();

        assert_eq!(config.sweep.sizes(), &[10, 20]);
        assert_eq!(config.sweep.threads(), &[1, 4]);
        assert_eq!(config.sweep.iterations(), 7);
        assert_eq!(config.output.results_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_env_invalid_value() {
        let result = HarnessConfig::default().merge_env_with(|k| {
            (k == "SUMBENCH_ITERATIONS").then(|| "many".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = HarnessConfig::default();
        let yaml = config.to_yaml().unwrap();
        let parsed = HarnessConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
