//! Benchmark report structure and its flat charting view.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::stats::VariantStats;
use crate::system::SystemInfo;

/// Results for one (size, threads) pair.
///
/// Every registered variant has an entry; variants that were not measured at
/// this pair (serial variants away from one thread) hold `None` and
/// serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigResult {
    pub size: u64,
    pub threads: u32,
    #[serde(flatten)]
    pub variants: BTreeMap<String, Option<VariantStats>>,
}

impl ConfigResult {
    /// Create an empty result for a sweep point.
    pub fn new(size: u64, threads: u32) -> Self {
        Self {
            size,
            threads,
            variants: BTreeMap::new(),
        }
    }

    /// Record a variant's aggregate (or its absence).
    pub fn insert(&mut self, label: impl Into<String>, stats: Option<VariantStats>) {
        self.variants.insert(label.into(), stats);
    }

    /// Stats for `label`, if it was measured here.
    pub fn get(&self, label: &str) -> Option<&VariantStats> {
        self.variants.get(label).and_then(Option::as_ref)
    }

    /// Labels that were measured at this pair.
    pub fn measured(&self) -> impl Iterator<Item = (&str, &VariantStats)> {
        self.variants
            .iter()
            .filter_map(|(label, stats)| stats.as_ref().map(|s| (label.as_str(), s)))
    }
}

/// Complete output of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub system_info: SystemInfo,
    pub benchmarks: Vec<ConfigResult>,
}

/// One point on a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRow {
    pub size: u64,
    pub threads: u32,
    pub label: String,
    pub mean: f64,
}

impl BenchmarkReport {
    /// Distinct sizes in first-seen order.
    pub fn sizes(&self) -> Vec<u64> {
        let mut sizes = Vec::new();
        for bench in &self.benchmarks {
            if !sizes.contains(&bench.size) {
                sizes.push(bench.size);
            }
        }
        sizes
    }

    /// Flatten into one row per measured variant per configuration.
    pub fn plot_rows(&self) -> Vec<PlotRow> {
        self.benchmarks
            .iter()
            .flat_map(|bench| {
                bench.measured().map(move |(label, stats)| PlotRow {
                    size: bench.size,
                    threads: bench.threads,
                    label: label.to_string(),
                    mean: stats.mean,
                })
            })
            .collect()
    }

    /// Rows grouped by input size.
    pub fn rows_by_size(&self) -> BTreeMap<u64, Vec<PlotRow>> {
        let mut grouped: BTreeMap<u64, Vec<PlotRow>> = BTreeMap::new();
        for row in self.plot_rows() {
            grouped.entry(row.size).or_default().push(row);
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(times: &[f64]) -> Option<VariantStats> {
        Some(VariantStats::from_samples(times.to_vec()).unwrap())
    }

    fn sample_report() -> BenchmarkReport {
        let mut one = ConfigResult::new(1000, 1);
        one.insert("cpp_parallel", stats(&[0.4, 0.6]));
        one.insert("cpp_serial", stats(&[0.5, 0.5]));

        let mut two = ConfigResult::new(1000, 2);
        two.insert("cpp_parallel", stats(&[0.2, 0.4]));
        two.insert("cpp_serial", None);

        let mut big = ConfigResult::new(5000, 1);
        big.insert("cpp_parallel", stats(&[1.0]));
        big.insert("cpp_serial", stats(&[2.0]));

        BenchmarkReport {
            system_info: SystemInfo {
                platform: "Linux".into(),
                processor: "test".into(),
                cpu_count: 4,
                memory_total: 1 << 30,
            },
            benchmarks: vec![one, two, big],
        }
    }

    #[test]
    fn test_null_serialization() {
        let report = sample_report();
        let json = serde_json::to_value(&report).unwrap();
        let second = &json["benchmarks"][1];

        assert_eq!(second["size"], 1000);
        assert_eq!(second["threads"], 2);
        assert!(second["cpp_serial"].is_null());
        assert_eq!(second["cpp_parallel"]["times"].as_array().unwrap().len(), 2);
        assert!(second["cpp_parallel"]["mean"].is_number());
        assert!(second["cpp_parallel"]["std"].is_number());
    }

    #[test]
    fn test_json_roundtrip_keeps_nulls() {
        let report = sample_report();
        let json = serde_json::to_string_pretty(&report).unwrap();
        let parsed: BenchmarkReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, report);
        assert!(parsed.benchmarks[1].variants.contains_key("cpp_serial"));
        assert!(parsed.benchmarks[1].get("cpp_serial").is_none());
    }

    #[test]
    fn test_plot_rows_skip_unmeasured() {
        let rows = sample_report().plot_rows();
        assert_eq!(rows.len(), 5);
        assert!(
            rows.iter()
                .all(|r| !(r.label == "cpp_serial" && r.threads == 2))
        );
        assert_eq!(rows[0].mean, 0.5);
    }

    #[test]
    fn test_rows_by_size() {
        let report = sample_report();
        let grouped = report.rows_by_size();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&1000].len(), 3);
        assert_eq!(grouped[&5000].len(), 2);
        assert_eq!(report.sizes(), vec![1000, 5000]);
    }
}
