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

//! Identifiers for animation phases.

use std::borrow::Borrow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

static NEXT_SUFFIX: AtomicU64 = AtomicU64::new(1);

/// Priorities used by the built-in scene consumers.
///
/// Higher values survive lower tiers better; anything at or above
/// [`ALWAYS`] runs every tick regardless of tier.
pub mod priorities {
    /// Blinking indicator LEDs. Purely decorative.
    pub const LED: i32 = 0;
    /// Scanline overlay on screens.
    pub const SCANLINE: i32 = 1;
    /// Interactive content (spinning box) the user is looking at.
    pub const SPINNER: i32 = 2;
    /// Lowest priority that is never skipped.
    pub const ALWAYS: i32 = 2;
}

/// Name of an independently gateable animated behavior.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhaseId(String);

impl PhaseId {
    /// Creates a phase id from a fixed name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a process-unique id of the form `prefix-<base36 counter>`.
    ///
    /// Used by consumers that can be instantiated several times in one scene.
    pub fn unique(prefix: &str) -> Self {
        let n = NEXT_SUFFIX.fetch_add(1, Ordering::Relaxed);
        Self(format!("{prefix}-{}", to_base36(n)))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhaseId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PhaseId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for PhaseId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PhaseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strong half of a phase's liveness pair, owned by whoever holds the phase.
///
/// Dropping the lease flips every [`PhaseLiveness`] derived from it to dead.
#[derive(Debug, Default)]
pub struct PhaseLease(Arc<()>);

impl PhaseLease {
    /// Creates a new, live lease.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a weak observer of this lease.
    pub fn liveness(&self) -> PhaseLiveness {
        PhaseLiveness(Arc::downgrade(&self.0))
    }
}

/// Weak observer telling whether a phase is still active.
///
/// Attached to in-flight computations so a result arriving after the phase
/// was released is discarded instead of applied.
#[derive(Debug, Clone, Default)]
pub struct PhaseLiveness(Weak<()>);

impl PhaseLiveness {
    /// An observer that is already dead.
    pub fn dead() -> Self {
        Self(Weak::new())
    }

    /// Returns `true` while the originating lease is alive.
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}
