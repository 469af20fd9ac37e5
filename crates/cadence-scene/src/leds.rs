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

//! Blinking LED bank.
//!
//! LED colors are computed through the offload bridge. Each LED is either
//! fully on or fully off; which one depends only on its x coordinate and
//! the elapsed time, so every LED blinks with its own fixed pattern.

use crate::slots::{PartKind, SlotTable};
use cadence_control::{PhaseHandle, SchedulerContext};
use cadence_core::{priorities, PhaseId};
use cadence_offload::{ComputeTicket, OffloadBridge, TicketPoll};
use serde::{Deserialize, Serialize};

/// An RGB triple.
pub type Rgb = [f32; 3];

/// Default LED tint. Only the green and blue channels are used.
pub const LED_BASE_COLOR: Rgb = [1.0, 1.1, 1.0];

/// Input of [`compute_led_colors`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedColorRequest {
    /// LED positions.
    pub positions: Vec<[f32; 3]>,
    /// Elapsed scene time in seconds.
    pub time: f32,
    /// Tint applied to lit LEDs.
    pub base_color: Rgb,
}

/// Computes one color per LED position.
///
/// With `rand = |2 + x|` and `t = round((1 + sin(rand * 10000 + time * rand)) / 2)`
/// the color is `[0, t * g, t * b]`.
pub fn compute_led_colors(request: LedColorRequest) -> anyhow::Result<Vec<Rgb>> {
    let [_, g, b] = request.base_color;
    Ok(request
        .positions
        .iter()
        .map(|position| {
            // f32 is too coarse for a phase near 2e4 rad.
            let rand = (2.0 + f64::from(position[0])).abs();
            let phase = rand * 10_000.0 + f64::from(request.time) * rand;
            let t = ((1.0 + phase.sin()) / 2.0).round() as f32;
            [0.0, t * g, t * b]
        })
        .collect())
}

/// A group of LEDs sharing one animation phase.
#[derive(Debug)]
pub struct LedBank {
    positions: Vec<[f32; 3]>,
    base_color: Rgb,
    colors: Vec<Rgb>,
    phase: PhaseHandle,
    in_flight: Option<ComputeTicket<Vec<Rgb>>>,
    updates_applied: u64,
}

impl LedBank {
    /// Mounts the bank. Returns `None` (nothing to render) when the table
    /// has no LED sphere.
    pub fn mount<H>(
        ctx: &SchedulerContext,
        slots: &SlotTable<PartKind, H>,
        positions: Vec<[f32; 3]>,
    ) -> Option<Self> {
        if !slots.contains(PartKind::LedSphere) {
            log::warn!("LedBank: no '{}' slot, LEDs disabled.", PartKind::LedSphere);
            return None;
        }
        let colors = vec![[0.0; 3]; positions.len()];
        Some(Self {
            positions,
            base_color: LED_BASE_COLOR,
            colors,
            phase: ctx.acquire_phase(PhaseId::unique("leds"), priorities::LED),
            in_flight: None,
            updates_applied: 0,
        })
    }

    /// Overrides the tint.
    pub fn with_base_color(mut self, base_color: Rgb) -> Self {
        self.base_color = base_color;
        self
    }

    /// Per-tick update. Collects a finished computation, then issues a new
    /// one if the phase may animate and nothing is in flight.
    ///
    /// Returns `true` if new colors were applied on this tick.
    pub fn update(&mut self, bridge: &OffloadBridge, elapsed: f32) -> bool {
        let mut applied = self.collect();

        if self.in_flight.is_some() || !self.phase.should_animate() {
            return applied;
        }

        let request = LedColorRequest {
            positions: self.positions.clone(),
            time: elapsed,
            base_color: self.base_color,
        };
        let ticket = bridge
            .compute(compute_led_colors, request)
            .bind(self.phase.liveness());
        let inline = ticket.is_inline();
        self.in_flight = Some(ticket);
        if inline {
            applied |= self.collect();
        }
        applied
    }

    fn collect(&mut self) -> bool {
        let Some(ticket) = self.in_flight.as_mut() else {
            return false;
        };
        match ticket.poll() {
            TicketPoll::Pending => false,
            TicketPoll::Ready(Ok(colors)) => {
                self.in_flight = None;
                self.apply(colors)
            }
            TicketPoll::Ready(Err(e)) => {
                self.in_flight = None;
                log::warn!("LedBank: color computation failed: {e}");
                false
            }
            TicketPoll::Discarded => {
                self.in_flight = None;
                false
            }
        }
    }

    fn apply(&mut self, colors: Vec<Rgb>) -> bool {
        if colors.len() != self.positions.len() {
            log::warn!(
                "LedBank: expected {} colors, got {}; keeping previous frame.",
                self.positions.len(),
                colors.len()
            );
            return false;
        }
        self.colors = colors;
        self.updates_applied += 1;
        true
    }

    /// Current LED colors, one per position.
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Number of LEDs.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if the bank has no LED.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// How many color sets have been applied so far.
    pub fn updates_applied(&self) -> u64 {
        self.updates_applied
    }

    /// Whether a computation is still outstanding.
    pub fn has_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The phase this bank animates under.
    pub fn phase(&self) -> &PhaseHandle {
        &self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn request(positions: Vec<[f32; 3]>, time: f32) -> LedColorRequest {
        LedColorRequest {
            positions,
            time,
            base_color: LED_BASE_COLOR,
        }
    }

    #[test]
    fn test_colors_are_on_or_off() {
        let positions: Vec<[f32; 3]> = (0..32).map(|i| [i as f32 * 0.13 - 2.0, 0.0, 0.0]).collect();
        let colors = compute_led_colors(request(positions, 3.7)).unwrap();
        assert_eq!(colors.len(), 32);
        for [r, g, b] in colors {
            assert_eq!(r, 0.0);
            let lit = g != 0.0;
            if lit {
                assert_relative_eq!(g, 1.1);
                assert_relative_eq!(b, 1.0);
            } else {
                assert_eq!(b, 0.0);
            }
        }
    }

    #[test]
    fn test_known_values() {
        // x = -2 gives rand = 0, so t = round(0.5) = 1.
        let colors = compute_led_colors(request(vec![[-2.0, 0.0, 0.0]], 123.0)).unwrap();
        assert_eq!(colors, vec![[0.0, 1.1, 1.0]]);
    }

    #[test]
    fn test_phase_keeps_double_precision() {
        // Both sit within 0.002 of the rounding edge, where single precision
        // picks the other side.
        let lit = compute_led_colors(request(vec![[3.687, 0.0, 0.0]], 1.5)).unwrap();
        assert_eq!(lit, vec![[0.0, 1.1, 1.0]]);
        let dark = compute_led_colors(request(vec![[2.115, 0.0, 0.0]], 5.0)).unwrap();
        assert_eq!(dark, vec![[0.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_pattern_is_deterministic() {
        let positions = vec![[0.25, 1.0, 0.0], [-0.5, 0.0, 2.0], [1.75, 0.0, 0.0]];
        let a = compute_led_colors(request(positions.clone(), 10.0)).unwrap();
        let b = compute_led_colors(request(positions, 10.0)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_input() {
        assert!(compute_led_colors(request(Vec::new(), 1.0)).unwrap().is_empty());
    }
}
