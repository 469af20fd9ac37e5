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

//! A complete scene subtree: LEDs, screens and a spinner sharing one context.

use crate::leds::LedBank;
use crate::screen::{ScreenSpec, ScreenSurface};
use crate::slots::{PartKind, SlotTable};
use crate::spinner::SpinningBox;
use cadence_control::SchedulerContext;
use cadence_offload::OffloadBridge;

/// What to mount.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowcaseLayout {
    /// One entry per LED.
    pub led_positions: Vec<[f32; 3]>,
    /// Screens to resolve.
    pub screens: Vec<ScreenSpec>,
    /// Base scale of the spinner, if there is one.
    pub spinner_scale: Option<f32>,
}

impl Default for ShowcaseLayout {
    fn default() -> Self {
        let led_positions = (0..24)
            .map(|i| {
                let column = (i % 8) as f32;
                let row = (i / 8) as f32;
                [column * 0.35 - 1.2, row * 0.2 + 0.1, -0.8]
            })
            .collect();
        Self {
            led_positions,
            screens: vec![
                ScreenSpec {
                    index: 0,
                    custom_effect: true,
                },
                ScreenSpec {
                    index: 1,
                    custom_effect: false,
                },
                ScreenSpec {
                    index: 2,
                    custom_effect: true,
                },
            ],
            spinner_scale: Some(0.5),
        }
    }
}

impl ShowcaseLayout {
    /// Every slot the layout can use.
    pub fn wanted_slots(&self) -> Vec<PartKind> {
        let mut kinds = vec![PartKind::Basic, PartKind::LedSphere];
        for screen in &self.screens {
            kinds.push(screen.frame());
            kinds.push(screen.panel());
        }
        kinds
    }
}

/// Per-tick summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// New LED colors were applied.
    pub leds_applied: bool,
    /// Screens whose render target followed a tier change.
    pub targets_changed: usize,
    /// The spinner moved.
    pub spinner_advanced: bool,
}

/// The mounted elements of one scene subtree.
#[derive(Debug)]
pub struct Showcase {
    leds: Option<LedBank>,
    screens: Vec<ScreenSurface>,
    spinner: Option<SpinningBox>,
}

impl Showcase {
    /// Mounts every element the slots allow. Elements whose slots are
    /// absent are skipped.
    pub fn mount<H>(
        ctx: &SchedulerContext,
        slots: &SlotTable<PartKind, H>,
        layout: &ShowcaseLayout,
    ) -> Self {
        let leds = LedBank::mount(ctx, slots, layout.led_positions.clone());
        let screens: Vec<ScreenSurface> = layout
            .screens
            .iter()
            .filter_map(|spec| ScreenSurface::resolve(ctx, slots, *spec))
            .collect();
        let spinner = layout
            .spinner_scale
            .map(|scale| SpinningBox::new(ctx, scale));

        log::info!(
            "Showcase: mounted {} LED(s), {}/{} screen(s), spinner: {}",
            leds.as_ref().map_or(0, LedBank::len),
            screens.len(),
            layout.screens.len(),
            spinner.is_some()
        );
        Self {
            leds,
            screens,
            spinner,
        }
    }

    /// Advances every element by one tick.
    pub fn update(&mut self, bridge: &OffloadBridge, elapsed: f32, delta: f32) -> FrameReport {
        let leds_applied = self
            .leds
            .as_mut()
            .is_some_and(|leds| leds.update(bridge, elapsed));
        let targets_changed = self
            .screens
            .iter_mut()
            .map(|screen| screen.update(elapsed))
            .filter(|changed| *changed)
            .count();
        let spinner_advanced = self
            .spinner
            .as_mut()
            .is_some_and(|spinner| spinner.update(delta));
        FrameReport {
            leds_applied,
            targets_changed,
            spinner_advanced,
        }
    }

    /// The LED bank, if mounted.
    pub fn leds(&self) -> Option<&LedBank> {
        self.leds.as_ref()
    }

    /// Resolved screens.
    pub fn screens(&self) -> &[ScreenSurface] {
        &self.screens
    }

    /// The spinner, if mounted.
    pub fn spinner(&self) -> Option<&SpinningBox> {
        self.spinner.as_ref()
    }

    /// Mutable access to the spinner, for pointer input.
    pub fn spinner_mut(&mut self) -> Option<&mut SpinningBox> {
        self.spinner.as_mut()
    }
}
