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

//! Scanline overlay animation.

use cadence_control::{PhaseHandle, SchedulerContext};
use cadence_core::{priorities, PhaseId};

/// Drives the time uniform of a scanline overlay.
///
/// The uniform jumps to `elapsed * 2` on ticks the phase may animate and
/// holds its value otherwise.
#[derive(Debug)]
pub struct ScanlineAnimator {
    phase: PhaseHandle,
    time_uniform: f32,
}

impl ScanlineAnimator {
    /// Registers a scanline phase for the screen called `owner`.
    pub fn new(ctx: &SchedulerContext, owner: &str) -> Self {
        Self {
            phase: ctx.acquire_phase(
                PhaseId::unique(&format!("scanline-{owner}")),
                priorities::SCANLINE,
            ),
            time_uniform: 0.0,
        }
    }

    /// Returns `true` if the uniform advanced.
    pub fn update(&mut self, elapsed: f32) -> bool {
        if !self.phase.should_animate() {
            return false;
        }
        self.time_uniform = elapsed * 2.0;
        true
    }

    /// Current uniform value.
    pub fn time_uniform(&self) -> f32 {
        self.time_uniform
    }

    /// The phase this animator runs under.
    pub fn phase(&self) -> &PhaseHandle {
        &self.phase
    }
}
