// SPDX-FileCopyrightText: 2026 Quire Authors
// SPDX-License-Identifier: MIT

use super::entry::{Entry, EntryBody};
use super::ids::EntryId;

/// An animated removal in flight, advanced by [`crate::ops::tick`].
///
/// Two-phase removal state machine: the entry carries the tombstone flag from
/// the moment the transition starts; the structural unlink happens only when
/// `elapsed` reaches `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemovalTransition {
    pub(crate) entry: EntryId,
    pub(crate) elapsed: u32,
    pub(crate) duration: u32,
    pub(crate) initial_height: f64,
}

impl RemovalTransition {
    pub fn entry(&self) -> EntryId {
        self.entry
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// The worksheet: an arena of entries plus the chain bookkeeping over them.
///
/// `head`/`tail` are plain ids into the arena; because every structural
/// change goes through [`crate::ops`], which re-points them before a slot is
/// freed, they never dangle (the arena's generation check catches any host
/// holding a stale id).
#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    slots: Vec<Slot>,
    free: Vec<u32>,
    head: Option<EntryId>,
    tail: Option<EntryId>,
    focused: Option<EntryId>,
    rev: u64,
    content_width: f64,
    transitions: Vec<RemovalTransition>,
}

impl Worksheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content_width(content_width: f64) -> Self {
        Self { content_width, ..Self::default() }
    }

    pub fn head(&self) -> Option<EntryId> {
        self.head
    }

    pub(crate) fn set_head(&mut self, head: Option<EntryId>) {
        self.head = head;
    }

    pub fn tail(&self) -> Option<EntryId> {
        self.tail
    }

    pub(crate) fn set_tail(&mut self, tail: Option<EntryId>) {
        self.tail = tail;
    }

    pub fn focused(&self) -> Option<EntryId> {
        self.focused
    }

    /// Moves input focus to `entry` if it is live and accepts focus.
    /// Returns whether focus actually moved.
    pub fn focus(&mut self, entry: EntryId) -> bool {
        match self.entry(entry) {
            Some(e) if e.want_focus() => {
                self.focused = Some(entry);
                true
            }
            _ => false,
        }
    }

    pub fn clear_focus(&mut self) {
        self.focused = None;
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub(crate) fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }

    pub fn content_width(&self) -> f64 {
        self.content_width
    }

    pub fn set_content_width(&mut self, content_width: f64) {
        self.content_width = content_width;
    }

    pub fn transitions(&self) -> &[RemovalTransition] {
        &self.transitions
    }

    pub(crate) fn transitions_mut(&mut self) -> &mut Vec<RemovalTransition> {
        &mut self.transitions
    }

    /// Number of live entries in the arena (linked or mid-removal).
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.entry.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.entry(id).is_some()
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.entry.as_ref()
    }

    pub fn entry_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.entry.as_mut()
    }

    /// Allocates an arena slot for a fresh, unlinked entry.
    pub(crate) fn alloc(&mut self, body: EntryBody) -> EntryId {
        let entry = Entry::new(body);
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            EntryId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot { generation: 0, entry: Some(entry) });
            EntryId::new(index, 0)
        }
    }

    /// Frees a slot, bumping its generation so stale ids stop resolving.
    pub(crate) fn free(&mut self, id: EntryId) {
        let Some(slot) = self.slots.get_mut(id.index() as usize) else {
            return;
        };
        if slot.generation != id.generation() || slot.entry.is_none() {
            return;
        }
        slot.entry = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        if self.focused == Some(id) {
            self.focused = None;
        }
    }

    pub fn next_of(&self, id: EntryId) -> Option<EntryId> {
        self.entry(id).and_then(Entry::next)
    }

    pub fn prev_of(&self, id: EntryId) -> Option<EntryId> {
        self.entry(id).and_then(Entry::previous)
    }

    /// Entries in chain order, head to tail.
    pub fn iter(&self) -> ChainIter<'_> {
        ChainIter { worksheet: self, cursor: self.head, forward: true, steps: 0 }
    }

    /// Entries in reverse chain order, tail to head.
    pub fn iter_rev(&self) -> ChainIter<'_> {
        ChainIter { worksheet: self, cursor: self.tail, forward: false, steps: 0 }
    }

    /// Number of entries reachable from `head` by `next` links.
    pub fn chain_len(&self) -> usize {
        self.iter().count()
    }

    /// Structural integrity check used by tests and debug assertions:
    /// the chain is acyclic, `head → … → tail` visits every linked live
    /// entry exactly once, and neighbor back-pointers agree.
    pub fn chain_is_consistent(&self) -> bool {
        let live = self.len();
        let mut visited = 0usize;
        let mut prev: Option<EntryId> = None;
        let mut cursor = self.head;

        while let Some(id) = cursor {
            let Some(entry) = self.entry(id) else {
                return false;
            };
            if entry.previous() != prev {
                return false;
            }
            visited += 1;
            if visited > live {
                // more steps than live entries means a cycle
                return false;
            }
            prev = Some(id);
            cursor = entry.next();
        }

        self.tail == prev
    }
}

/// Chain-order iterator over entry ids. Bounded by the arena size so a
/// corrupted chain cannot loop forever.
#[derive(Debug)]
pub struct ChainIter<'a> {
    worksheet: &'a Worksheet,
    cursor: Option<EntryId>,
    forward: bool,
    steps: usize,
}

impl Iterator for ChainIter<'_> {
    type Item = EntryId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        if self.steps > self.worksheet.slots.len() {
            return None;
        }
        self.steps += 1;
        let entry = self.worksheet.entry(id)?;
        self.cursor = if self.forward { entry.next() } else { entry.previous() };
        Some(id)
    }
}
