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

//! Quality tiers and the static profiles bound to them.
//!
//! A [`QualityTier`] is the discrete answer to "how much can this device
//! afford right now". Each tier maps to a [`QualityProfile`] through a
//! [`QualityTable`] that is loaded once and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::ConfigError;

/// Discretized performance level driving resource-intensive settings.
///
/// Variants are ordered from the cheapest to the most expensive tier, so
/// `QualityTier::Low < QualityTier::High`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum QualityTier {
    /// Minimum resource usage.
    Low,
    /// Balanced resource usage.
    Medium,
    /// Full quality.
    #[default]
    High,
}

impl QualityTier {
    /// All tiers, cheapest first.
    pub const ALL: [QualityTier; 3] = [QualityTier::Low, QualityTier::Medium, QualityTier::High];

    /// How many priority levels a phase needs to run every tick at this tier.
    ///
    /// Used by the phase registry's skip pattern.
    pub fn skip_penalty(self) -> i32 {
        match self {
            QualityTier::High => 0,
            QualityTier::Medium => 1,
            QualityTier::Low => 2,
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QualityTier::Low => "LOW",
            QualityTier::Medium => "MEDIUM",
            QualityTier::High => "HIGH",
        };
        f.write_str(name)
    }
}

/// Resource settings applied by consumers for a given tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityProfile {
    /// Width of off-screen render targets, in pixels.
    pub texture_width: u32,
    /// Height of off-screen render targets, in pixels.
    pub texture_height: u32,
    /// Anisotropic filtering level (1 = disabled).
    pub anisotropy: u16,
    /// Segment count for procedurally generated rounded geometry.
    pub corner_segments: u32,
    /// Whether render targets may be cached and shared between screens.
    pub cache_render_targets: bool,
}

impl QualityProfile {
    /// Profile used for [`QualityTier::High`] when nothing else is configured.
    pub const HIGH: QualityProfile = QualityProfile {
        texture_width: 1024,
        texture_height: 768,
        anisotropy: 16,
        corner_segments: 32,
        cache_render_targets: true,
    };

    /// Profile used for [`QualityTier::Medium`] when nothing else is configured.
    pub const MEDIUM: QualityProfile = QualityProfile {
        texture_width: 512,
        texture_height: 384,
        anisotropy: 8,
        corner_segments: 16,
        cache_render_targets: true,
    };

    /// Profile used for [`QualityTier::Low`] when nothing else is configured.
    pub const LOW: QualityProfile = QualityProfile {
        texture_width: 256,
        texture_height: 192,
        anisotropy: 1,
        corner_segments: 8,
        cache_render_targets: false,
    };

    /// Width over height of the render target.
    pub fn aspect_ratio(&self) -> f32 {
        if self.texture_height == 0 {
            return 1.0;
        }
        self.texture_width as f32 / self.texture_height as f32
    }
}

/// Static table of quality profiles keyed by tier.
///
/// Entries may be absent when the table is loaded from a partial
/// configuration; lookups then return `None` and the consumer that asked
/// degrades on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualityTable {
    profiles: BTreeMap<QualityTier, QualityProfile>,
}

impl QualityTable {
    /// Creates a table from explicit entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (QualityTier, QualityProfile)>) -> Self {
        Self {
            profiles: entries.into_iter().collect(),
        }
    }

    /// Looks up the profile bound to `tier`.
    pub fn get(&self, tier: QualityTier) -> Option<&QualityProfile> {
        self.profiles.get(&tier)
    }

    /// Returns the number of configured tiers.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Returns `true` if no tier is configured.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Checks that texture width strictly grows with the tier.
    ///
    /// A cheaper tier must never ask for more resources than a more expensive one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut previous: Option<(QualityTier, &QualityProfile)> = None;
        for (tier, profile) in &self.profiles {
            if profile.texture_width == 0 || profile.texture_height == 0 {
                return Err(ConfigError::Invalid(format!(
                    "quality profile {tier} has an empty render target"
                )));
            }
            if let Some((prev_tier, prev)) = previous {
                if prev.texture_width >= profile.texture_width {
                    return Err(ConfigError::Invalid(format!(
                        "quality profile {tier} texture width ({}) must exceed {prev_tier} ({})",
                        profile.texture_width, prev.texture_width
                    )));
                }
            }
            previous = Some((*tier, profile));
        }
        Ok(())
    }
}

impl Default for QualityTable {
    fn default() -> Self {
        Self::from_entries([
            (QualityTier::Low, QualityProfile::LOW),
            (QualityTier::Medium, QualityProfile::MEDIUM),
            (QualityTier::High, QualityProfile::HIGH),
        ])
    }
}

/// Frame-rate boundaries between tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    /// Below this smoothed frame rate the tier is [`QualityTier::Low`].
    pub low_fps: f32,
    /// At or above this smoothed frame rate the tier is [`QualityTier::High`].
    pub high_fps: f32,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            low_fps: 30.0,
            high_fps: 50.0,
        }
    }
}

impl QualityThresholds {
    /// Rejects thresholds that would break monotonic classification.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.low_fps.is_finite() || !self.high_fps.is_finite() {
            return Err(ConfigError::Invalid(
                "quality thresholds must be finite".to_string(),
            ));
        }
        if self.low_fps < 0.0 || self.low_fps > self.high_fps {
            return Err(ConfigError::Invalid(format!(
                "expected 0 <= low_fps ({}) <= high_fps ({})",
                self.low_fps, self.high_fps
            )));
        }
        Ok(())
    }
}
