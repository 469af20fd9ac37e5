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

//! Scheduler configuration.
//!
//! Every field has a default, so a configuration file only needs to list
//! what it overrides:
//!
//! ```rust
//! use cadence_core::SchedulerConfig;
//!
//! let config = SchedulerConfig::from_ron_str("(thresholds: (low_fps: 24.0))").unwrap();
//! assert_eq!(config.thresholds.low_fps, 24.0);
//! assert_eq!(config.thresholds.high_fps, 50.0);
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::frame::DEFAULT_FPS;
use crate::quality::{QualityTable, QualityThresholds};

/// Errors raised while loading or validating a [`SchedulerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read scheduler config {path}: {source}")]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The RON text could not be parsed.
    #[error("failed to parse scheduler config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// The configuration could not be written as RON.
    #[error("failed to serialize scheduler config: {0}")]
    Serialize(#[from] ron::Error),
    /// The configuration parsed but violates an invariant.
    #[error("invalid scheduler config: {0}")]
    Invalid(String),
}

/// Settings for the frame-rate smoothing filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Weight of the newest sample in the moving average, in `(0, 1]`.
    pub smoothing: f32,
    /// Estimate reported before the first valid tick.
    pub initial_fps: f32,
    /// Upper clamp on the instantaneous frame rate of a single tick.
    pub max_fps: f32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.1,
            initial_fps: DEFAULT_FPS,
            max_fps: 1000.0,
        }
    }
}

/// Settings for the computation offload bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffloadConfig {
    /// When `false`, every computation runs inline.
    pub enabled: bool,
    /// Number of worker threads. `0` picks one less than the available cores.
    pub workers: usize,
    /// Maximum number of queued jobs before new submissions run inline.
    pub queue_capacity: usize,
}

impl Default for OffloadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            workers: 0,
            queue_capacity: 64,
        }
    }
}

/// Complete configuration for one scheduler provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Frame-rate smoothing.
    pub sampler: SamplerConfig,
    /// Tier boundaries.
    pub thresholds: QualityThresholds,
    /// Profiles bound to each tier.
    pub quality: QualityTable,
    /// Offload bridge settings.
    pub offload: OffloadConfig,
    /// Forces the low-performance device flag instead of probing the host.
    pub low_performance_override: Option<bool>,
}

impl SchedulerConfig {
    /// Parses and validates a configuration from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: SchedulerConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&text)?;
        log::info!("Loaded scheduler config from {}", path.display());
        Ok(config)
    }

    /// Serializes the configuration as pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Checks every invariant the scheduler relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sampler = &self.sampler;
        if !(sampler.smoothing > 0.0 && sampler.smoothing <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "sampler smoothing must be in (0, 1], got {}",
                sampler.smoothing
            )));
        }
        if !sampler.initial_fps.is_finite() || sampler.initial_fps < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "sampler initial_fps must be finite and non-negative, got {}",
                sampler.initial_fps
            )));
        }
        if !sampler.max_fps.is_finite() || sampler.max_fps <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "sampler max_fps must be finite and positive, got {}",
                sampler.max_fps
            )));
        }
        if self.offload.queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "offload queue_capacity must be at least 1".to_string(),
            ));
        }
        self.thresholds.validate()?;
        self.quality.validate()
    }
}
