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

//! Rolling frame-time history.
//!
//! The history is reporting-only: it powers stutter and trend diagnostics
//! but never feeds the tier decision, which depends solely on the smoothed
//! frame rate.

use std::collections::VecDeque;

/// Number of frame times kept (2s at 60Hz).
pub const HISTORY_LEN: usize = 120;

/// Frame-time variance (ms²) above which a run is reported as stuttering.
pub const STUTTER_VARIANCE_THRESHOLD: f32 = 4.0;

/// Summary of the recent frame-time distribution.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    /// Number of frame times the summary covers.
    pub samples: usize,
    /// Mean frame time in ms.
    pub average_ms: f32,
    /// Frame-time variance in ms².
    pub variance_ms2: f32,
    /// Fastest frame in ms.
    pub min_ms: f32,
    /// Slowest frame in ms.
    pub max_ms: f32,
    /// Rising (positive) or falling (negative) frame-time trend in ms.
    pub trend_ms: f32,
}

impl FrameStats {
    /// Returns `true` when frame pacing is inconsistent.
    pub fn is_stuttering(&self) -> bool {
        self.variance_ms2 > STUTTER_VARIANCE_THRESHOLD
    }
}

/// Rolling window of the last [`HISTORY_LEN`] frame times.
#[derive(Debug, Clone)]
pub struct FrameHistory {
    frame_times_ms: VecDeque<f32>,
}

impl Default for FrameHistory {
    fn default() -> Self {
        Self {
            frame_times_ms: VecDeque::with_capacity(HISTORY_LEN),
        }
    }
}

impl FrameHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one frame time. Non-finite or non-positive values are ignored.
    pub fn push(&mut self, frame_time_ms: f32) {
        if !(frame_time_ms.is_finite() && frame_time_ms > 0.0) {
            return;
        }
        if self.frame_times_ms.len() == HISTORY_LEN {
            self.frame_times_ms.pop_front();
        }
        self.frame_times_ms.push_back(frame_time_ms);
    }

    /// Drops every recorded frame time.
    pub fn clear(&mut self) {
        self.frame_times_ms.clear();
    }

    /// Number of frame times recorded (at most [`HISTORY_LEN`]).
    pub fn len(&self) -> usize {
        self.frame_times_ms.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.frame_times_ms.is_empty()
    }

    /// Summarizes the recorded window. An empty window yields all zeros.
    pub fn stats(&self) -> FrameStats {
        let samples = self.frame_times_ms.len();
        if samples == 0 {
            return FrameStats::default();
        }

        let n = samples as f32;
        let average_ms = self.frame_times_ms.iter().sum::<f32>() / n;
        let variance_ms2 = self
            .frame_times_ms
            .iter()
            .map(|t| (t - average_ms).powi(2))
            .sum::<f32>()
            / n;
        let (min_ms, max_ms) = self
            .frame_times_ms
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &t| (lo.min(t), hi.max(t)));

        FrameStats {
            samples,
            average_ms,
            variance_ms2,
            min_ms,
            max_ms,
            trend_ms: self.trend_ms(),
        }
    }

    // Newest half mean minus oldest half mean; the middle sample of an odd
    // window is left out.
    fn trend_ms(&self) -> f32 {
        let half = self.frame_times_ms.len() / 2;
        if half == 0 {
            return 0.0;
        }
        let oldest: f32 = self.frame_times_ms.iter().take(half).sum();
        let newest: f32 = self.frame_times_ms.iter().rev().take(half).sum();
        (newest - oldest) / half as f32
    }
}
