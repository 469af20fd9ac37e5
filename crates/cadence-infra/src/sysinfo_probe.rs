// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! sysinfo-based implementation of the DeviceProbe trait.

use cadence_core::DeviceProbe;
use sysinfo::System;

/// Hosts with this many logical CPUs or fewer are considered low-performance.
pub const LOW_END_MAX_CPUS: usize = 2;

/// Hosts with less memory than this (in bytes) are considered low-performance.
pub const LOW_END_MIN_MEMORY_BYTES: u64 = 4 * 1024 * 1024 * 1024;

/// A device probe that inspects the host through the `sysinfo` crate.
///
/// The host is queried once at construction; the answer never changes
/// afterwards.
#[derive(Debug, Clone, Copy)]
pub struct SysinfoProbe {
    cpu_count: usize,
    total_memory_bytes: u64,
}

impl SysinfoProbe {
    /// Queries the host.
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_all();
        system.refresh_memory();

        let probe = Self::from_figures(system.cpus().len(), system.total_memory());
        log::debug!(
            "SysinfoProbe: {} logical CPU(s), {} MiB memory",
            probe.cpu_count,
            probe.total_memory_bytes / (1024 * 1024)
        );
        probe
    }

    /// Builds a probe from already known figures.
    pub fn from_figures(cpu_count: usize, total_memory_bytes: u64) -> Self {
        Self {
            cpu_count,
            total_memory_bytes,
        }
    }

    /// Logical CPUs seen at construction (0 if unknown).
    pub fn cpu_count(&self) -> usize {
        self.cpu_count
    }

    /// Total memory in bytes seen at construction (0 if unknown).
    pub fn total_memory_bytes(&self) -> u64 {
        self.total_memory_bytes
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceProbe for SysinfoProbe {
    fn is_low_performance_device(&self) -> bool {
        // A zero figure means the platform did not report it; unknown is not low-end.
        let few_cpus = self.cpu_count != 0 && self.cpu_count <= LOW_END_MAX_CPUS;
        let little_memory =
            self.total_memory_bytes != 0 && self.total_memory_bytes < LOW_END_MIN_MEMORY_BYTES;
        few_cpus || little_memory
    }

    fn describe(&self) -> String {
        format!(
            "{} device, {} CPU(s), {} MiB",
            if self.is_low_performance_device() {
                "low-performance"
            } else {
                "capable"
            },
            self.cpu_count,
            self.total_memory_bytes / (1024 * 1024)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: u64 = 1024 * 1024 * 1024;

    #[test]
    fn test_classification_thresholds() {
        assert!(SysinfoProbe::from_figures(2, 16 * GIB).is_low_performance_device());
        assert!(SysinfoProbe::from_figures(8, 2 * GIB).is_low_performance_device());
        assert!(!SysinfoProbe::from_figures(4, 4 * GIB).is_low_performance_device());
        assert!(!SysinfoProbe::from_figures(16, 32 * GIB).is_low_performance_device());
    }

    #[test]
    fn test_unknown_figures_are_not_low_end() {
        assert!(!SysinfoProbe::from_figures(0, 0).is_low_performance_device());
        assert!(SysinfoProbe::from_figures(0, GIB).is_low_performance_device());
    }

    #[test]
    fn test_describe_mentions_figures() {
        let text = SysinfoProbe::from_figures(4, 8 * GIB).describe();
        assert!(text.starts_with("capable"));
        assert!(text.contains("4 CPU(s)"));
        assert!(text.contains("8192 MiB"));
    }

    #[test]
    fn test_probe_reads_host() {
        let probe = SysinfoProbe::new();
        // Whatever the host, the probe must answer without panicking.
        let _ = probe.is_low_performance_device();
        let _ = probe.describe();
    }
}
