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

//! Bridge counters.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    submitted: AtomicU64,
    offloaded: AtomicU64,
    inline: AtomicU64,
    fallbacks: AtomicU64,
    discarded: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_offloaded(&self) {
        self.offloaded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_inline(&self) {
        self.inline.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_discarded(&self) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> OffloadStats {
        OffloadStats {
            submitted: self.submitted.load(Ordering::Relaxed),
            offloaded: self.offloaded.load(Ordering::Relaxed),
            inline: self.inline.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of what the bridge has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OffloadStats {
    /// Computations handed to [`compute`](crate::OffloadBridge::compute).
    pub submitted: u64,
    /// Computations accepted by the worker queue.
    pub offloaded: u64,
    /// Computations run on the calling thread because no worker was available.
    pub inline: u64,
    /// Worker failures downgraded to inline execution.
    pub fallbacks: u64,
    /// Results dropped because their phase was released.
    pub discarded: u64,
}
