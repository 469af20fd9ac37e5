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

//! Maps a frame-rate estimate to a quality tier and its profile.
//!
//! Classification is pure: the tier depends only on the latest smoothed
//! frame rate and the device flag. There is no hysteresis, so a rate
//! hovering around a threshold may flip tiers between consecutive ticks.

use cadence_core::{QualityProfile, QualityTable, QualityThresholds, QualityTier};

/// Classifies a smoothed frame rate.
///
/// | Condition | Tier |
/// |---|---|
/// | Low-performance device, or `fps` not finite | `Low` |
/// | `fps < low_fps` | `Low` |
/// | `low_fps <= fps < high_fps` | `Medium` |
/// | `fps >= high_fps` | `High` |
pub fn classify(
    fps: f32,
    is_low_performance_device: bool,
    thresholds: &QualityThresholds,
) -> QualityTier {
    if is_low_performance_device || !fps.is_finite() {
        return QualityTier::Low;
    }
    if fps < thresholds.low_fps {
        QualityTier::Low
    } else if fps < thresholds.high_fps {
        QualityTier::Medium
    } else {
        QualityTier::High
    }
}

/// Thresholds and profile table bundled together.
#[derive(Debug, Clone, Default)]
pub struct QualityClassifier {
    thresholds: QualityThresholds,
    table: QualityTable,
}

impl QualityClassifier {
    /// Creates a classifier from already validated parts.
    pub fn new(thresholds: QualityThresholds, table: QualityTable) -> Self {
        Self { thresholds, table }
    }

    /// See [`classify`].
    pub fn classify(&self, fps: f32, is_low_performance_device: bool) -> QualityTier {
        classify(fps, is_low_performance_device, &self.thresholds)
    }

    /// Looks up the profile for `tier`; `None` if the table has no entry.
    pub fn quality_settings(&self, tier: QualityTier) -> Option<QualityProfile> {
        self.table.get(tier).copied()
    }

    /// The configured thresholds.
    pub fn thresholds(&self) -> &QualityThresholds {
        &self.thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> QualityThresholds {
        QualityThresholds::default()
    }

    #[test]
    fn test_reference_points() {
        assert_eq!(classify(55.0, false, &defaults()), QualityTier::High);
        assert_eq!(classify(40.0, false, &defaults()), QualityTier::Medium);
        assert_eq!(classify(20.0, false, &defaults()), QualityTier::Low);
    }

    #[test]
    fn test_boundaries_are_inclusive_upwards() {
        assert_eq!(classify(30.0, false, &defaults()), QualityTier::Medium);
        assert_eq!(classify(50.0, false, &defaults()), QualityTier::High);
    }

    #[test]
    fn test_low_device_forces_low() {
        assert_eq!(classify(144.0, true, &defaults()), QualityTier::Low);
    }

    #[test]
    fn test_non_finite_fps_is_low() {
        assert_eq!(classify(f32::NAN, false, &defaults()), QualityTier::Low);
        assert_eq!(classify(f32::INFINITY, false, &defaults()), QualityTier::Low);
    }

    #[test]
    fn test_monotonic_in_fps() {
        let thresholds = defaults();
        for device in [false, true] {
            let mut previous = classify(0.0, device, &thresholds);
            let mut fps = 0.0_f32;
            while fps <= 240.0 {
                let tier = classify(fps, device, &thresholds);
                assert!(tier >= previous, "tier dropped at {fps} fps");
                previous = tier;
                fps += 0.25;
            }
        }
    }

    #[test]
    fn test_high_profile_is_larger_than_low() {
        let classifier = QualityClassifier::default();
        let high = classifier
            .quality_settings(classifier.classify(55.0, false))
            .unwrap();
        let low = classifier
            .quality_settings(classifier.classify(20.0, false))
            .unwrap();
        assert_eq!(high.texture_width, QualityProfile::HIGH.texture_width);
        assert!(low.texture_width < high.texture_width);
    }

    #[test]
    fn test_missing_profile_is_none() {
        let classifier = QualityClassifier::new(
            defaults(),
            QualityTable::from_entries([(QualityTier::High, QualityProfile::HIGH)]),
        );
        assert!(classifier.quality_settings(QualityTier::Medium).is_none());
    }
}
