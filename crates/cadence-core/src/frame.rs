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

//! Per-tick timing samples and the performance state derived from them.

use crate::quality::QualityTier;

/// Frame rate reported before the first valid tick has been sampled.
pub const DEFAULT_FPS: f32 = 60.0;

/// Timing information for a single render tick.
///
/// Produced by the host render loop once per tick and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameSample {
    /// Time elapsed since the render loop started, in milliseconds.
    pub elapsed_ms: f64,
    /// Time elapsed since the previous tick, in milliseconds.
    pub delta_ms: f64,
}

impl FrameSample {
    /// Creates a sample from the elapsed and delta times in seconds, as most
    /// render loops report them.
    pub fn from_secs(elapsed_secs: f64, delta_secs: f64) -> Self {
        Self {
            elapsed_ms: elapsed_secs * 1000.0,
            delta_ms: delta_secs * 1000.0,
        }
    }

    /// Returns the tick delta in seconds.
    pub fn delta_secs(&self) -> f64 {
        self.delta_ms / 1000.0
    }

    /// Returns `true` if the delta can be turned into a frame rate.
    pub fn is_usable(&self) -> bool {
        self.delta_ms.is_finite() && self.delta_ms > 0.0
    }
}

/// The performance snapshot a provider recomputes every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceState {
    /// Smoothed frame rate estimate. Always finite and non-negative.
    pub fps: f32,
    /// Quality tier derived from `fps` and the device flag.
    pub quality_tier: QualityTier,
    /// `true` if the device was flagged as low-performance at mount time.
    pub is_low_performance_device: bool,
    /// Number of ticks sampled so far.
    pub frame_index: u64,
}

impl Default for PerformanceState {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            quality_tier: QualityTier::High,
            is_low_performance_device: false,
            frame_index: 0,
        }
    }
}
