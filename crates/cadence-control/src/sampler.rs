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

//! Converts per-tick timing into a smoothed frame-rate estimate.

use cadence_core::{FrameSample, SamplerConfig};

/// Exponential moving average of the instantaneous frame rate.
#[derive(Debug, Clone)]
pub struct FrameSampler {
    config: SamplerConfig,
    fps: f32,
    samples: u64,
}

impl FrameSampler {
    /// Creates a sampler whose estimate starts at `config.initial_fps`.
    pub fn new(config: SamplerConfig) -> Self {
        Self {
            fps: sanitize(config.initial_fps),
            config,
            samples: 0,
        }
    }

    /// Folds one tick into the estimate and returns it.
    ///
    /// A zero, negative or non-finite delta leaves the estimate untouched.
    pub fn sample(&mut self, delta_seconds: f32) -> f32 {
        if !(delta_seconds.is_finite() && delta_seconds > 0.0) {
            log::trace!("FrameSampler: skipping degenerate delta {delta_seconds}");
            return self.fps;
        }

        let instant = (1.0 / delta_seconds).min(self.config.max_fps);
        let alpha = self.config.smoothing.clamp(f32::EPSILON, 1.0);
        self.fps = sanitize(self.fps + alpha * (instant - self.fps));
        self.samples += 1;
        self.fps
    }

    /// Same as [`sample`](Self::sample) for a millisecond-based sample.
    pub fn record(&mut self, sample: FrameSample) -> f32 {
        if !sample.is_usable() {
            return self.fps;
        }
        self.sample(sample.delta_secs() as f32)
    }

    /// Current smoothed estimate.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Number of ticks that contributed to the estimate.
    pub fn sample_count(&self) -> u64 {
        self.samples
    }

    /// Returns the estimate to its initial value.
    pub fn reset(&mut self) {
        self.fps = sanitize(self.config.initial_fps);
        self.samples = 0;
    }
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self::new(SamplerConfig::default())
    }
}

fn sanitize(fps: f32) -> f32 {
    if fps.is_finite() {
        fps.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_initial_estimate() {
        let sampler = FrameSampler::default();
        assert_eq!(sampler.fps(), 60.0);
        assert_eq!(sampler.sample_count(), 0);
    }

    #[test]
    fn test_positive_delta_yields_finite_positive_fps() {
        let mut sampler = FrameSampler::default();
        for delta in [1e-6_f32, 0.001, 0.016, 0.5, 10.0, 1e6] {
            let fps = sampler.sample(delta);
            assert!(fps.is_finite() && fps > 0.0, "delta {delta} gave {fps}");
        }
    }

    #[test]
    fn test_zero_delta_is_skipped() {
        let mut sampler = FrameSampler::default();
        sampler.sample(1.0 / 30.0);
        let before = sampler.fps();
        assert_eq!(sampler.sample(0.0), before);
        assert_eq!(sampler.sample(-0.1), before);
        assert_eq!(sampler.sample(f32::NAN), before);
        assert_eq!(sampler.sample(f32::INFINITY), before);
        assert_eq!(sampler.sample_count(), 1);
    }

    #[test]
    fn test_converges_to_steady_rate() {
        let mut sampler = FrameSampler::default();
        for _ in 0..200 {
            sampler.sample(1.0 / 24.0);
        }
        assert_relative_eq!(sampler.fps(), 24.0, epsilon = 0.01);
    }

    #[test]
    fn test_single_spike_is_damped() {
        let mut sampler = FrameSampler::default();
        let fps = sampler.sample(0.5); // One 2 FPS hitch.
        assert!(fps > 50.0, "a single hitch should not collapse the estimate");
    }

    #[test]
    fn test_instantaneous_rate_is_clamped() {
        let mut sampler = FrameSampler::new(SamplerConfig {
            smoothing: 1.0,
            ..SamplerConfig::default()
        });
        assert_eq!(sampler.sample(1e-9), 1000.0);
    }

    #[test]
    fn test_record_uses_millisecond_delta() {
        let mut sampler = FrameSampler::new(SamplerConfig {
            smoothing: 1.0,
            ..SamplerConfig::default()
        });
        let fps = sampler.record(FrameSample {
            elapsed_ms: 100.0,
            delta_ms: 20.0,
        });
        assert_relative_eq!(fps, 50.0, epsilon = 1e-3);
        assert_eq!(sampler.record(FrameSample::default()), fps);
    }

    #[test]
    fn test_reset() {
        let mut sampler = FrameSampler::default();
        sampler.sample(0.1);
        sampler.reset();
        assert_eq!(sampler.fps(), 60.0);
        assert_eq!(sampler.sample_count(), 0);
    }
}
