// SPDX-FileCopyrightText: 2026 Quire Authors
// SPDX-License-Identifier: MIT

use super::ids::EntryId;

/// The searchable/addressable text regions inside an entry.
///
/// Which regions exist depends on the entry kind: a command entry has
/// `Command`, `Result` and `Error`; a text entry has `Text`; a latex entry
/// has `LatexSource`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryField {
    Command,
    Result,
    Error,
    Text,
    LatexSource,
}

/// A point inside the worksheet: an entry, a text region within it, and a
/// byte offset into that region's expanded text.
///
/// Cursors are ephemeral. They are valid only while the entry is live;
/// removing the entry invalidates them, and holders are expected to drop
/// them rather than expect healing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorksheetCursor {
    entry: EntryId,
    field: EntryField,
    offset: usize,
}

impl WorksheetCursor {
    pub fn new(entry: EntryId, field: EntryField, offset: usize) -> Self {
        Self { entry, field, offset }
    }

    pub fn entry(&self) -> EntryId {
        self.entry
    }

    pub fn field(&self) -> EntryField {
        self.field
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}
