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

//! Abstractions over host capability detection.
//!
//! The scheduler only needs one bit from the platform: whether the device
//! should be treated as low-performance regardless of its measured frame
//! rate. Concrete probes live in `cadence-infra`.

/// Trait for observing the capability class of the host device.
pub trait DeviceProbe: Send + Sync {
    /// Returns `true` if the device should always run at the lowest tier.
    fn is_low_performance_device(&self) -> bool;

    /// Short human-readable description for logging.
    fn describe(&self) -> String {
        if self.is_low_performance_device() {
            "low-performance device".to_string()
        } else {
            "capable device".to_string()
        }
    }
}

/// A probe that returns a fixed answer.
///
/// Used by tests, headless hosts, and configuration overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticProbe {
    /// The answer returned by [`DeviceProbe::is_low_performance_device`].
    pub low_performance: bool,
}

impl StaticProbe {
    /// A probe reporting a capable device.
    pub const CAPABLE: StaticProbe = StaticProbe {
        low_performance: false,
    };

    /// A probe reporting a low-performance device.
    pub const LOW_END: StaticProbe = StaticProbe {
        low_performance: true,
    };
}

impl DeviceProbe for StaticProbe {
    fn is_low_performance_device(&self) -> bool {
        self.low_performance
    }
}
