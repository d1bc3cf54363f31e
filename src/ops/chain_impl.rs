// SPDX-FileCopyrightText: 2026 Quire Authors
// SPDX-License-Identifier: MIT

/// Links a freshly allocated `id` after the current tail.
fn link_after_tail(ws: &mut Worksheet, id: EntryId) {
    let tail = ws.tail();
    if let Some(entry) = ws.entry_mut(id) {
        entry.set_previous(tail);
        entry.set_next(None);
    }
    if let Some(old_tail) = tail {
        if let Some(entry) = ws.entry_mut(old_tail) {
            entry.set_next(Some(id));
        }
    }
    if ws.head().is_none() {
        ws.set_head(Some(id));
    }
    ws.set_tail(Some(id));
}

/// Splices `id` between `prev` and `next`, updating head/tail when the new
/// entry becomes an edge of the chain.
fn link_between(ws: &mut Worksheet, id: EntryId, prev: Option<EntryId>, next: Option<EntryId>) {
    if let Some(entry) = ws.entry_mut(id) {
        entry.set_previous(prev);
        entry.set_next(next);
    }
    match prev {
        Some(p) => {
            if let Some(entry) = ws.entry_mut(p) {
                entry.set_next(Some(id));
            }
        }
        None => ws.set_head(Some(id)),
    }
    match next {
        Some(n) => {
            if let Some(entry) = ws.entry_mut(n) {
                entry.set_previous(Some(id));
            }
        }
        None => ws.set_tail(Some(id)),
    }
}

/// Takes `entry` out of the link structure, re-pointing head/tail so they
/// never dangle. The slot itself stays allocated; callers free it.
fn unlink(ws: &mut Worksheet, entry: EntryId) {
    let (prev, next) = match ws.entry(entry) {
        Some(e) => (e.previous(), e.next()),
        None => return,
    };

    if let Some(p) = prev {
        if let Some(e) = ws.entry_mut(p) {
            e.set_next(next);
        }
    }
    if ws.head() == Some(entry) {
        ws.set_head(next);
    }
    if let Some(n) = next {
        if let Some(e) = ws.entry_mut(n) {
            e.set_previous(prev);
        }
    }
    if ws.tail() == Some(entry) {
        ws.set_tail(prev);
    }
    if let Some(e) = ws.entry_mut(entry) {
        e.set_previous(None);
        e.set_next(None);
    }
}

/// Re-homes focus away from an entry that is about to leave the chain.
///
/// Order of preference: first focusable entry after it, an empty focusable
/// entry right before it, or a brand-new appended command entry.
fn hand_off_focus(ws: &mut Worksheet, entry: EntryId) {
    if ws.focused() != Some(entry) {
        return;
    }

    let mut cursor = ws.next_of(entry);
    while let Some(candidate) = cursor {
        if ws.entry(candidate).is_some_and(|e| e.want_focus()) {
            ws.focus(candidate);
            return;
        }
        cursor = ws.next_of(candidate);
    }

    if let Some(prev) = ws.prev_of(entry) {
        if ws.entry(prev).is_some_and(|e| e.is_empty() && e.want_focus()) {
            ws.focus(prev);
            return;
        }
    }

    append(ws, EntryKind::Command);
}
