// SPDX-FileCopyrightText: 2026 Quire Authors
// SPDX-License-Identifier: MIT

//! Structural mutations of the entry chain.
//!
//! All chain edits go through this module so head/tail bookkeeping, focus
//! hand-off and removal transitions stay consistent. Operations are total:
//! stale or absent anchors degrade to `append`, removing a dead id is a
//! no-op, nothing here panics or returns an error. Every structural change
//! bumps the worksheet revision; hosts recompute layout when it moves.

use log::debug;

use crate::model::{EntryBody, EntryId, EntryKind, RemovalTransition, Worksheet};

/// Duration of an animated removal, in host ticks.
pub const REMOVAL_TICKS: u32 = 300;

/// How `remove` takes an entry out of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalMode {
    /// Unlink and free the slot now.
    Immediate,
    /// Tombstone the entry, shrink it over [`REMOVAL_TICKS`] ticks, unlink
    /// when the transition completes.
    Animated,
}

/// Creates an empty entry of `kind` at the end of the chain and focuses it.
pub fn append(ws: &mut Worksheet, kind: EntryKind) -> EntryId {
    let id = ws.alloc(EntryBody::empty(kind));
    link_after_tail(ws, id);
    ws.bump_rev();
    ws.focus(id);
    debug!("appended {kind:?} entry {id}");
    id
}

/// Creates an empty entry of `kind` right after `anchor`.
///
/// A missing or stale anchor degrades to [`append`]. If the entry already
/// following the anchor is of the same kind and still empty, that entry is
/// reused instead of creating a redundant empty one, which makes repeated
/// "insert X here" actions idempotent.
pub fn insert_after(ws: &mut Worksheet, kind: EntryKind, anchor: Option<EntryId>) -> EntryId {
    let Some(anchor) = anchor.filter(|a| ws.contains(*a)) else {
        return append(ws, kind);
    };

    let next = ws.next_of(anchor);
    if let Some(neighbor) = next {
        if let Some(entry) = ws.entry(neighbor) {
            if entry.kind() == kind && entry.is_empty() && !entry.about_to_be_removed() {
                debug!("insert_after reused empty {kind:?} neighbor {neighbor}");
                ws.focus(neighbor);
                return neighbor;
            }
        }
    }

    let id = ws.alloc(EntryBody::empty(kind));
    link_between(ws, id, Some(anchor), next);
    ws.bump_rev();
    ws.focus(id);
    debug!("inserted {kind:?} entry {id} after {anchor}");
    id
}

/// Creates an empty entry of `kind` right before `anchor`.
///
/// A missing or stale anchor degrades to [`append`]. Unlike [`insert_after`]
/// there is no reuse of an empty same-kind neighbor; the asymmetry matches
/// the observed behavior this crate reimplements and is kept on purpose.
pub fn insert_before(ws: &mut Worksheet, kind: EntryKind, anchor: Option<EntryId>) -> EntryId {
    let Some(anchor) = anchor.filter(|a| ws.contains(*a)) else {
        return append(ws, kind);
    };

    let prev = ws.prev_of(anchor);
    let id = ws.alloc(EntryBody::empty(kind));
    link_between(ws, id, prev, Some(anchor));
    ws.bump_rev();
    ws.focus(id);
    debug!("inserted {kind:?} entry {id} before {anchor}");
    id
}

/// Takes `entry` out of the chain.
///
/// If the entry holds focus, focus is handed off before anything else: to
/// the next focusable entry, else to an empty previous entry, else to a
/// freshly appended command entry. A removal that had focus therefore never
/// leaves the chain without a focusable entry.
///
/// A second `Animated` request for an entry already mid-removal is a no-op.
pub fn remove(ws: &mut Worksheet, entry: EntryId, mode: RemovalMode) {
    let (already_removing, initial_height) = match ws.entry(entry) {
        Some(e) => (e.about_to_be_removed(), e.size().height),
        None => return,
    };

    match mode {
        RemovalMode::Immediate => {
            if let Some(e) = ws.entry_mut(entry) {
                e.set_about_to_be_removed(true);
            }
            hand_off_focus(ws, entry);
            unlink(ws, entry);
            ws.transitions_mut().retain(|t| t.entry() != entry);
            ws.free(entry);
            ws.bump_rev();
            debug!("removed entry {entry}");
        }
        RemovalMode::Animated => {
            if already_removing {
                return;
            }
            hand_off_focus(ws, entry);
            if let Some(e) = ws.entry_mut(entry) {
                e.set_about_to_be_removed(true);
            }
            ws.transitions_mut().push(RemovalTransition {
                entry,
                elapsed: 0,
                duration: REMOVAL_TICKS,
                initial_height,
            });
            ws.bump_rev();
            debug!("started removal transition for {entry}");
        }
    }
}

/// Cancels an in-flight removal transition.
///
/// Returns `true` when the entry is no longer being removed (including the
/// case where no removal was pending), `false` when the removal already
/// completed and the entry is gone.
pub fn stop_removing(ws: &mut Worksheet, entry: EntryId) -> bool {
    let Some(existing) = ws.entry(entry) else {
        return false;
    };
    if !existing.about_to_be_removed() {
        return true;
    }
    let Some(pos) = ws.transitions().iter().position(|t| t.entry() == entry) else {
        // tombstoned without a transition: the unlink is already past the
        // point of no return
        return false;
    };

    let transition = ws.transitions_mut().remove(pos);
    if let Some(e) = ws.entry_mut(entry) {
        e.set_about_to_be_removed(false);
        let mut size = e.size();
        size.height = transition.initial_height;
        e.set_size(size);
    }
    ws.bump_rev();
    debug!("cancelled removal transition for {entry}");
    true
}

/// Advances all removal transitions by `dt` ticks.
///
/// Entries mid-transition shrink linearly toward zero height; transitions
/// that complete perform the immediate-removal path. Returns the ids that
/// were actually unlinked and freed so hosts can drop cursors pointing at
/// them.
pub fn tick(ws: &mut Worksheet, dt: u32) -> Vec<EntryId> {
    let mut in_flight = Vec::with_capacity(ws.transitions().len());
    for transition in ws.transitions_mut() {
        transition.elapsed = transition.elapsed.saturating_add(dt);
        in_flight.push(*transition);
    }

    let mut completed = Vec::new();
    for transition in in_flight {
        if transition.elapsed >= transition.duration {
            completed.push(transition.entry());
            continue;
        }
        let factor = 1.0 - f64::from(transition.elapsed) / f64::from(transition.duration);
        if let Some(e) = ws.entry_mut(transition.entry()) {
            let mut size = e.size();
            size.height = transition.initial_height * factor;
            e.set_size(size);
        }
    }

    ws.transitions_mut().retain(|t| t.elapsed < t.duration);
    for &entry in &completed {
        unlink(ws, entry);
        ws.free(entry);
        ws.bump_rev();
        debug!("removal transition finished for {entry}");
    }
    completed
}

/// Frees every entry and resets the chain to the empty state.
pub fn clear(ws: &mut Worksheet) {
    let all: Vec<EntryId> = ws.iter().collect();
    for id in all {
        ws.free(id);
    }
    ws.transitions_mut().clear();
    ws.set_head(None);
    ws.set_tail(None);
    ws.clear_focus();
    ws.bump_rev();
    debug!("cleared worksheet");
}

// Linking/unlinking and focus hand-off helpers, split out to keep this file
// focused on the public operation surface.
include!("chain_impl.rs");
