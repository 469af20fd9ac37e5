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

//! Interactive spinning box.

use cadence_control::{PhaseHandle, SchedulerContext};
use cadence_core::{priorities, PhaseId};

/// Scale multiplier while not clicked.
pub const IDLE_SCALE: f32 = 1.2;
/// Scale multiplier after a click.
pub const CLICKED_SCALE: f32 = 1.4;
/// Color while hovered (hot pink).
pub const HOVER_COLOR: [f32; 3] = [1.0, 105.0 / 255.0, 180.0 / 255.0];
/// Color otherwise (indian red).
pub const IDLE_COLOR: [f32; 3] = [205.0 / 255.0, 92.0 / 255.0, 92.0 / 255.0];

/// A box rotating about its x and y axes.
#[derive(Debug)]
pub struct SpinningBox {
    phase: PhaseHandle,
    rotation: [f32; 3],
    base_scale: f32,
    hovered: bool,
    clicked: bool,
}

impl SpinningBox {
    /// Registers the spinner with the given base scale.
    pub fn new(ctx: &SchedulerContext, base_scale: f32) -> Self {
        Self {
            phase: ctx.acquire_phase(PhaseId::unique("spinner"), priorities::SPINNER),
            rotation: [0.0; 3],
            base_scale,
            hovered: false,
            clicked: false,
        }
    }

    /// Advances the rotation by `delta` seconds when the phase may animate.
    ///
    /// Both axes share one angle: `x = y += delta`.
    pub fn update(&mut self, delta: f32) -> bool {
        if !self.phase.should_animate() {
            return false;
        }
        self.rotation[1] += delta;
        self.rotation[0] = self.rotation[1];
        true
    }

    /// Pointer entered or left the box.
    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    /// Toggles the clicked state.
    pub fn click(&mut self) {
        self.clicked = !self.clicked;
    }

    /// Euler rotation in radians.
    pub fn rotation(&self) -> [f32; 3] {
        self.rotation
    }

    /// Effective uniform scale.
    pub fn scale(&self) -> f32 {
        if self.clicked {
            self.base_scale * CLICKED_SCALE
        } else {
            self.base_scale * IDLE_SCALE
        }
    }

    /// Effective color.
    pub fn color(&self) -> [f32; 3] {
        if self.hovered {
            HOVER_COLOR
        } else {
            IDLE_COLOR
        }
    }

    /// Whether the pointer is over the box.
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotation_tracks_delta_without_provider() {
        let ctx = SchedulerContext::detached();
        let mut spinner = SpinningBox::new(&ctx, 0.5);
        for _ in 0..4 {
            assert!(spinner.update(0.25));
        }
        let [x, y, z] = spinner.rotation();
        assert_relative_eq!(x, 1.0);
        assert_relative_eq!(y, 1.0);
        assert_eq!(z, 0.0);
    }

    #[test]
    fn test_click_and_hover() {
        let ctx = SchedulerContext::detached();
        let mut spinner = SpinningBox::new(&ctx, 0.5);
        assert_relative_eq!(spinner.scale(), 0.6);
        spinner.click();
        assert_relative_eq!(spinner.scale(), 0.7);
        spinner.click();
        assert_relative_eq!(spinner.scale(), 0.6);

        assert_eq!(spinner.color(), IDLE_COLOR);
        spinner.set_hovered(true);
        assert_eq!(spinner.color(), HOVER_COLOR);
    }
}
