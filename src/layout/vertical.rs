// SPDX-FileCopyrightText: 2026 Quire Authors
// SPDX-License-Identifier: MIT

use crate::model::{EntryId, Worksheet};

/// Space above the first entry.
pub const TOP_MARGIN: f64 = 10.0;
/// Space between consecutive entries.
pub const ENTRY_MARGIN: f64 = 8.0;

/// One entry's computed vertical placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryPlacement {
    entry: EntryId,
    y: f64,
    height: f64,
}

impl EntryPlacement {
    pub fn entry(&self) -> EntryId {
        self.entry
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

/// Vertical offsets for every linked entry, head to tail.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorksheetLayout {
    entries: Vec<EntryPlacement>,
    total_height: f64,
}

impl WorksheetLayout {
    pub fn entries(&self) -> &[EntryPlacement] {
        &self.entries
    }

    pub fn total_height(&self) -> f64 {
        self.total_height
    }

    pub fn offset_of(&self, entry: EntryId) -> Option<f64> {
        self.entries
            .iter()
            .find(|placement| placement.entry == entry)
            .map(EntryPlacement::y)
    }
}

/// Computes each entry's vertical offset as a running sum of prior heights
/// plus fixed margins.
///
/// Entries mid-removal are still part of the chain and keep their (shrinking)
/// height, so the surrounding entries slide up smoothly as the transition
/// progresses.
pub fn layout_worksheet(ws: &Worksheet) -> WorksheetLayout {
    let mut entries = Vec::with_capacity(ws.chain_len());
    let mut y = TOP_MARGIN;

    for id in ws.iter() {
        let Some(entry) = ws.entry(id) else {
            continue;
        };
        let height = entry.size().height;
        entries.push(EntryPlacement { entry: id, y, height });
        y += height + ENTRY_MARGIN;
    }

    let total_height = if entries.is_empty() { TOP_MARGIN } else { y };
    WorksheetLayout { entries, total_height }
}

/// What the view was tracking before a relayout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAnchor {
    /// The view was pinned to the bottom and should stay there.
    Bottom,
    /// Keep this entry visible.
    Entry(EntryId),
}

/// Resolves the scroll offset after a relayout.
///
/// `Bottom` pins to the new bottom; `Entry` returns the smallest adjustment
/// of `previous_offset` that keeps the entry fully inside the viewport. An
/// anchor entry that no longer exists degrades to clamping the previous
/// offset into the new scrollable range.
pub fn resolve_scroll(
    layout: &WorksheetLayout,
    anchor: ScrollAnchor,
    viewport_height: f64,
    previous_offset: f64,
) -> f64 {
    let max_offset = (layout.total_height() - viewport_height).max(0.0);

    match anchor {
        ScrollAnchor::Bottom => max_offset,
        ScrollAnchor::Entry(entry) => {
            let Some(placement) = layout
                .entries()
                .iter()
                .find(|placement| placement.entry() == entry)
            else {
                return previous_offset.clamp(0.0, max_offset);
            };

            let top = placement.y();
            let bottom = placement.y() + placement.height();
            if top < previous_offset {
                top
            } else if bottom > previous_offset + viewport_height {
                (bottom - viewport_height).max(0.0)
            } else {
                previous_offset.clamp(0.0, max_offset)
            }
        }
    }
}
