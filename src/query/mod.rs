// SPDX-FileCopyrightText: 2026 Quire Authors
// SPDX-License-Identifier: MIT

//! Read-only queries over the worksheet.
//!
//! Currently: the chain-wide search cursor, composing per-entry local search
//! with chain traversal.

pub mod search;

pub use search::{search, SearchDirection, SearchMode, SearchScope};
