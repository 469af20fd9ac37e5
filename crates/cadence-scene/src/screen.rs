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

//! Screens rendering an offscreen scene onto a panel.
//!
//! A screen's render target follows the current quality tier. When the
//! panel slot or the tier's quality profile is missing the screen is not
//! built at all; a missing frame slot only drops the bezel.

use crate::scanline::ScanlineAnimator;
use crate::slots::{PartKind, SlotTable};
use cadence_control::SchedulerContext;
use cadence_core::{QualityProfile, QualityTier};

/// Which screen to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSpec {
    /// Screen number; selects the frame and panel slots.
    pub index: u8,
    /// Adds the animated scanline overlay.
    pub custom_effect: bool,
}

impl ScreenSpec {
    /// Slot of the bezel.
    pub fn frame(&self) -> PartKind {
        PartKind::ScreenFrame(self.index)
    }

    /// Slot of the display surface.
    pub fn panel(&self) -> PartKind {
        PartKind::ScreenPanel(self.index)
    }
}

/// Offscreen render target parameters derived from a quality profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTargetSettings {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Anisotropic filtering level.
    pub anisotropy: u16,
    /// Segments of each rounded bezel corner.
    pub corner_segments: u32,
    /// Key under which the target may be cached, when caching is enabled.
    pub cache_key: Option<String>,
}

impl RenderTargetSettings {
    fn from_profile(profile: &QualityProfile, screen: u8) -> Self {
        Self {
            width: profile.texture_width,
            height: profile.texture_height,
            anisotropy: profile.anisotropy,
            corner_segments: profile.corner_segments,
            cache_key: profile
                .cache_render_targets
                .then(|| format!("screen-{screen}")),
        }
    }
}

/// A resolved screen.
#[derive(Debug)]
pub struct ScreenSurface {
    spec: ScreenSpec,
    ctx: SchedulerContext,
    has_frame: bool,
    tier: QualityTier,
    target: RenderTargetSettings,
    scanline: Option<ScanlineAnimator>,
}

impl ScreenSurface {
    /// Builds a screen, or returns `None` when it cannot be rendered.
    pub fn resolve<H>(
        ctx: &SchedulerContext,
        slots: &SlotTable<PartKind, H>,
        spec: ScreenSpec,
    ) -> Option<Self> {
        let panel = spec.panel();
        if !slots.contains(panel) {
            log::warn!("Screen: panel slot '{panel}' not found, screen skipped.");
            return None;
        }

        let has_frame = slots.contains(spec.frame());
        if !has_frame {
            log::warn!(
                "Screen: frame slot '{}' not found, rendering without it.",
                spec.frame()
            );
        }

        let tier = ctx.quality_tier();
        let Some(profile) = ctx.quality_settings() else {
            log::warn!("Screen: no quality profile for tier {tier}, screen '{panel}' skipped.");
            return None;
        };

        let scanline = spec
            .custom_effect
            .then(|| ScanlineAnimator::new(ctx, &panel.to_string()));

        Some(Self {
            spec,
            ctx: ctx.clone(),
            has_frame,
            tier,
            target: RenderTargetSettings::from_profile(&profile, spec.index),
            scanline,
        })
    }

    /// Per-tick update: follows tier changes and advances the overlay.
    ///
    /// Returns `true` if the render target settings changed.
    pub fn update(&mut self, elapsed: f32) -> bool {
        let changed = self.refresh_target();
        if let Some(scanline) = self.scanline.as_mut() {
            scanline.update(elapsed);
        }
        changed
    }

    fn refresh_target(&mut self) -> bool {
        let tier = self.ctx.quality_tier();
        if tier == self.tier {
            return false;
        }
        match self.ctx.quality_settings() {
            Some(profile) => {
                let target = RenderTargetSettings::from_profile(&profile, self.spec.index);
                log::debug!(
                    "Screen '{}': tier {} -> {}, target {}x{}",
                    self.spec.panel(),
                    self.tier,
                    tier,
                    target.width,
                    target.height
                );
                self.tier = tier;
                self.target = target;
                true
            }
            // Keep the last usable target rather than dropping the screen mid-scene.
            None => false,
        }
    }

    /// The screen definition.
    pub fn spec(&self) -> ScreenSpec {
        self.spec
    }

    /// Current render target settings.
    pub fn render_target(&self) -> &RenderTargetSettings {
        &self.target
    }

    /// Tier the render target was derived from.
    pub fn tier(&self) -> QualityTier {
        self.tier
    }

    /// Whether the bezel is drawn.
    pub fn has_frame(&self) -> bool {
        self.has_frame
    }

    /// The scanline overlay, when enabled.
    pub fn scanline(&self) -> Option<&ScanlineAnimator> {
        self.scanline.as_ref()
    }
}
