// SPDX-FileCopyrightText: 2026 Quire Authors
// SPDX-License-Identifier: MIT

//! Vertical layout of the entry chain.
//!
//! Layout is a pure function of the chain and the entries' recorded sizes;
//! it never mutates the worksheet. Scroll-anchor resolution keeps the view
//! stable across relayouts.

pub mod vertical;

pub use vertical::{
    layout_worksheet, resolve_scroll, EntryPlacement, ScrollAnchor, WorksheetLayout, ENTRY_MARGIN,
    TOP_MARGIN,
};
