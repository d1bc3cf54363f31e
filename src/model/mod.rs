// SPDX-FileCopyrightText: 2026 Quire Authors
// SPDX-License-Identifier: MIT

//! Core data model: entry variants, typed ids, the arena-backed chain,
//! and worksheet cursors.
//!
//! A worksheet is an ordered chain of polymorphic entries. The chain is
//! stored in a generational arena and linked by ids, never by references.

pub mod cursor;
pub mod entry;
pub mod ids;
pub mod worksheet;

pub use cursor::{EntryField, WorksheetCursor};
pub use entry::{Entry, EntryBody, EntryKind, EntrySize, EvalStatus, TextContent, TextSpan};
pub use ids::{EntryId, RequestId};
pub use worksheet::{ChainIter, RemovalTransition, Worksheet};
