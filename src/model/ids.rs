// SPDX-FileCopyrightText: 2026 Quire Authors
// SPDX-License-Identifier: MIT

use std::fmt;

/// A stable handle to an entry slot in a [`Worksheet`](super::Worksheet) arena.
///
/// Handles are generational: a slot that is freed and reused bumps its
/// generation, so ids held by external observers (focus state, search
/// results, a hosting shell) go stale instead of silently pointing at an
/// unrelated entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId {
    index: u32,
    generation: u32,
}

impl EntryId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}.{}", self.index, self.generation)
    }
}

/// Correlates an evaluation request with its completion notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{EntryId, RequestId};

    #[test]
    fn entry_id_displays_index_and_generation() {
        let id = EntryId::new(3, 7);
        assert_eq!(id.to_string(), "e3.7");
    }

    #[test]
    fn entry_ids_with_different_generations_are_distinct() {
        assert_ne!(EntryId::new(0, 0), EntryId::new(0, 1));
    }

    #[test]
    fn request_id_displays_value() {
        assert_eq!(RequestId::new(42).to_string(), "r42");
    }
}
