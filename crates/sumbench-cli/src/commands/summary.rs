//! Summary command implementation.

use anyhow::Result;
use console::style;
use std::collections::BTreeSet;
use std::path::Path;

use sumbench_harness::BenchmarkReport;
use sumbench_harness::export::load_report;

/// Execute the summary command.
pub fn execute(input: &Path) -> Result<()> {
    let report = load_report(input)?;
    let info = &report.system_info;

    println!("{}", style("System").bold().underlined());
    println!("  Platform:    {}", info.platform);
    println!("  Processor:   {}", info.processor);
    println!("  CPUs:        {}", info.cpu_count);
    println!(
        "  Memory:      {:.1} GiB",
        info.memory_total as f64 / f64::from(1u32 << 30)
    );
    println!();

    print_table(&report);
    Ok(())
}

/// Print one row per configuration with each variant's mean (or `-`).
pub fn print_table(report: &BenchmarkReport) {
    let labels: BTreeSet<&str> = report
        .benchmarks
        .iter()
        .flat_map(|b| b.variants.keys().map(String::as_str))
        .collect();

    println!("{}", style("Mean time (s)").bold().underlined());
    let mut header = format!("  {:>12} {:>8}", "size", "threads");
    for label in &labels {
        header.push_str(&format!(" {label:>18}"));
    }
    println!("{}", style(header).dim());

    for bench in &report.benchmarks {
        let mut line = format!("  {:>12} {:>8}", bench.size, bench.threads);
        for label in &labels {
            match bench.get(label) {
                Some(stats) => line.push_str(&format!(" {:>18.6}", stats.mean)),
                None => line.push_str(&format!(" {:>18}", "-")),
            }
        }
        println!("{line}");
    }
}
