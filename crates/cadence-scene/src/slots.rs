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

//! Fixed mapping from part kinds to owned handles.
//!
//! Scene parts are looked up by a stable kind instead of by name. A table is
//! validated once at construction; afterwards a lookup either finds the slot
//! or reports it absent, and the consumer that asked renders nothing.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Highest numbered part type.
pub const MAX_PART_TYPE: u8 = 48;

/// Stable identifier of a scene part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PartKind {
    /// The shared base part.
    Basic,
    /// One of the numbered instanced parts, `1..=MAX_PART_TYPE`.
    Type(u8),
    /// The sphere every LED is instanced from.
    LedSphere,
    /// Bezel of screen `n`.
    ScreenFrame(u8),
    /// Display surface of screen `n`.
    ScreenPanel(u8),
}

impl PartKind {
    /// Returns `PartKind::Type(n)` if `n` is a valid part number.
    pub fn numbered(n: u8) -> Option<Self> {
        (1..=MAX_PART_TYPE).contains(&n).then_some(PartKind::Type(n))
    }

    fn is_valid(&self) -> bool {
        match self {
            PartKind::Type(n) => (1..=MAX_PART_TYPE).contains(n),
            _ => true,
        }
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartKind::Basic => write!(f, "basic"),
            PartKind::Type(n) => write!(f, "type-{n}"),
            PartKind::LedSphere => write!(f, "led-sphere"),
            PartKind::ScreenFrame(n) => write!(f, "screen-frame-{n}"),
            PartKind::ScreenPanel(n) => write!(f, "screen-panel-{n}"),
        }
    }
}

/// Errors raised while building a [`SlotTable`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotError {
    /// Required kinds that had no entry.
    #[error("missing required slot(s): {}", .0.join(", "))]
    Missing(Vec<String>),
    /// The same kind was supplied twice.
    #[error("slot '{0}' supplied more than once")]
    Duplicate(String),
    /// The kind is outside its valid range.
    #[error("slot '{0}' is not a valid part kind")]
    InvalidKind(String),
}

/// A validated, immutable mapping from kind to handle.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotTable<K, H> {
    slots: BTreeMap<K, H>,
}

impl<K, H> SlotTable<K, H>
where
    K: Ord + Copy + fmt::Display,
{
    /// Builds a table, rejecting duplicates and checking that every kind in
    /// `required` is present.
    pub fn build(
        entries: impl IntoIterator<Item = (K, H)>,
        required: &[K],
    ) -> Result<Self, SlotError> {
        let mut slots = BTreeMap::new();
        for (kind, handle) in entries {
            if slots.insert(kind, handle).is_some() {
                return Err(SlotError::Duplicate(kind.to_string()));
            }
        }

        let missing: Vec<String> = required
            .iter()
            .filter(|kind| !slots.contains_key(*kind))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(SlotError::Missing(missing));
        }

        Ok(Self { slots })
    }

    /// Looks up a slot. `None` means the slot is absent.
    pub fn get(&self, kind: K) -> Option<&H> {
        self.slots.get(&kind)
    }

    /// Returns `true` if the slot is present.
    pub fn contains(&self, kind: K) -> bool {
        self.slots.contains_key(&kind)
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the table holds no slot.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates slots in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &H)> {
        self.slots.iter().map(|(k, h)| (*k, h))
    }
}

impl<H> SlotTable<PartKind, H> {
    /// Builds a part table, additionally rejecting out-of-range part numbers.
    pub fn parts(
        entries: impl IntoIterator<Item = (PartKind, H)>,
        required: &[PartKind],
    ) -> Result<Self, SlotError> {
        let entries: Vec<(PartKind, H)> = entries.into_iter().collect();
        if let Some((kind, _)) = entries.iter().find(|(kind, _)| !kind.is_valid()) {
            return Err(SlotError::InvalidKind(kind.to_string()));
        }
        Self::build(entries, required)
    }
}

impl<K, H> Default for SlotTable<K, H> {
    fn default() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_range() {
        assert_eq!(PartKind::numbered(1), Some(PartKind::Type(1)));
        assert_eq!(PartKind::numbered(48), Some(PartKind::Type(48)));
        assert_eq!(PartKind::numbered(0), None);
        assert_eq!(PartKind::numbered(49), None);
    }

    #[test]
    fn test_build_and_lookup() {
        let table = SlotTable::parts(
            [(PartKind::LedSphere, "sphere"), (PartKind::Type(3), "object-52")],
            &[PartKind::LedSphere],
        )
        .unwrap();
        assert_eq!(table.get(PartKind::LedSphere), Some(&"sphere"));
        assert_eq!(table.get(PartKind::Type(4)), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_missing_required_slot() {
        let err = SlotTable::parts(
            [(PartKind::Basic, 1u32)],
            &[PartKind::LedSphere, PartKind::ScreenPanel(0)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            SlotError::Missing(vec!["led-sphere".into(), "screen-panel-0".into()])
        );
        assert_eq!(
            err.to_string(),
            "missing required slot(s): led-sphere, screen-panel-0"
        );
    }

    #[test]
    fn test_duplicate_slot() {
        let err =
            SlotTable::build([(PartKind::Basic, 1u32), (PartKind::Basic, 2)], &[]).unwrap_err();
        assert_eq!(err, SlotError::Duplicate("basic".into()));
    }

    #[test]
    fn test_invalid_part_number() {
        let err = SlotTable::parts([(PartKind::Type(0), ())], &[]).unwrap_err();
        assert_eq!(err, SlotError::InvalidKind("type-0".into()));
    }
}
