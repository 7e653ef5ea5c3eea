//! Host description captured once at the start of a run.

use serde::{Deserialize, Serialize};
use sysinfo::System;

/// Machine the benchmarks ran on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// OS, kernel and architecture, e.g. `Linux 24.04 Ubuntu (6.8.0) x86_64`.
    pub platform: String,
    /// CPU brand string.
    pub processor: String,
    /// Logical CPUs.
    pub cpu_count: usize,
    /// Total physical memory in bytes.
    pub memory_total: u64,
}

impl SystemInfo {
    /// Capture the current host.
    pub fn capture() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_all();
        sys.refresh_memory();

        let os = System::long_os_version()
            .or_else(System::name)
            .unwrap_or_else(|| std::env::consts::OS.to_string());
        let platform = match System::kernel_version() {
            Some(kernel) => format!("{os} ({kernel}) {}", std::env::consts::ARCH),
            None => format!("{os} {}", std::env::consts::ARCH),
        };

        let processor = sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .filter(|brand| !brand.is_empty())
            .unwrap_or_else(|| std::env::consts::ARCH.to_string());

        let cpu_count = match sys.cpus().len() {
            0 => std::thread::available_parallelism().map_or(1, usize::from),
            n => n,
        };

        Self {
            platform,
            processor,
            cpu_count,
            memory_total: sys.total_memory(),
        }
    }
}
