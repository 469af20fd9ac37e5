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

//! Animation phase registry and the per-tick gating rule.
//!
//! # Skip pattern
//!
//! Each tier carries a penalty (`High` 0, `Medium` 1, `Low` 2). A phase of
//! priority `p` runs once every `interval` ticks where
//!
//! ```text
//! shift    = clamp(penalty - p, 0, MAX_SKIP_SHIFT)
//! interval = 1 << shift
//! runs     = (frame_index + stagger(id)) % interval == 0
//! ```
//!
//! The `High` tier bypasses the formula and runs every phase on every tick,
//! whatever its priority. Below `High`, a negative priority only lengthens
//! the interval, up to `1 << MAX_SKIP_SHIFT`.
//!
//! `stagger` is the FNV-1a hash of the id modulo `interval`, so phases that
//! share an interval are spread across ticks instead of all waking together.
//! The rule only depends on the tier, the priority, the id and the tick
//! index, so repeated queries within one tick always agree.

use cadence_core::{PhaseId, QualityTier};
use std::collections::HashMap;

/// Largest skip exponent; the slowest phase runs every 16th tick.
pub const MAX_SKIP_SHIFT: i32 = 4;

/// A registered phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseEntry {
    /// Current priority (last write wins).
    pub priority: i32,
    /// Registration this entry belongs to. Bumped on every `register`.
    pub generation: u64,
}

/// Mapping from phase id to priority for one scheduler provider.
#[derive(Debug, Default)]
pub struct PhaseRegistry {
    entries: HashMap<PhaseId, PhaseEntry>,
    next_generation: u64,
}

impl PhaseRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a phase and returns the generation of this
    /// registration.
    pub fn register(&mut self, id: PhaseId, priority: i32) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        let entry = PhaseEntry {
            priority,
            generation,
        };
        if let Some(previous) = self.entries.insert(id.clone(), entry) {
            log::debug!(
                "PhaseRegistry: '{}' re-registered (priority {} -> {})",
                id,
                previous.priority,
                priority
            );
        } else {
            log::debug!("PhaseRegistry: '{}' registered (priority {})", id, priority);
        }
        generation
    }

    /// Removes a phase. Returns `false` if it was not registered.
    pub fn unregister(&mut self, id: &str) -> bool {
        let removed = self.entries.remove(id).is_some();
        if removed {
            log::debug!("PhaseRegistry: '{}' unregistered", id);
        }
        removed
    }

    /// Removes a phase only if it still belongs to the registration that
    /// produced `generation`.
    ///
    /// A consumer releasing its phase must not remove an entry that another
    /// consumer has since re-registered under the same id.
    pub fn unregister_owned(&mut self, id: &str, generation: u64) -> bool {
        match self.entries.get(id) {
            Some(entry) if entry.generation == generation => self.unregister(id),
            Some(_) => {
                log::debug!(
                    "PhaseRegistry: '{}' was re-registered since generation {}; keeping it",
                    id,
                    generation
                );
                false
            }
            None => false,
        }
    }

    /// Returns the entry for `id`, if registered.
    pub fn get(&self, id: &str) -> Option<PhaseEntry> {
        self.entries.get(id).copied()
    }

    /// Returns the priority of `id`, if registered.
    pub fn priority(&self, id: &str) -> Option<i32> {
        self.get(id).map(|e| e.priority)
    }

    /// Number of registered phases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no phase is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every phase.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Decides whether `id` may animate on tick `frame_index` at `tier`.
    ///
    /// Unregistered ids always animate.
    pub fn should_animate(&self, id: &str, tier: QualityTier, frame_index: u64) -> bool {
        match self.entries.get(id) {
            Some(entry) => runs_on_frame(id, entry.priority, tier, frame_index),
            None => true,
        }
    }
}

/// Number of ticks between two runs of a phase of `priority` at `tier`.
pub fn skip_interval(tier: QualityTier, priority: i32) -> u64 {
    let penalty = tier.skip_penalty();
    if penalty == 0 {
        return 1;
    }
    let shift = penalty
        .saturating_sub(priority)
        .clamp(0, MAX_SKIP_SHIFT);
    1u64 << shift
}

/// The gating rule described in the module docs.
pub fn runs_on_frame(id: &str, priority: i32, tier: QualityTier, frame_index: u64) -> bool {
    let interval = skip_interval(tier, priority);
    if interval == 1 {
        return true;
    }
    let stagger = fnv1a(id.as_bytes()) % interval;
    frame_index.wrapping_add(stagger) % interval == 0
}

// Must give the same value in every process and build, so the skip pattern
// is reproducible. `std::hash` makes no such promise.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(PRIME))
}
