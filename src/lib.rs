// SPDX-FileCopyrightText: 2026 Quire Authors
// SPDX-License-Identifier: MIT

//! Quire — worksheet entry-chain core for computer-algebra notebooks.
//!
//! A worksheet is an ordered chain of polymorphic entries (command, text,
//! latex, image, page break, placeholder) backed by a generational arena.
//! This crate owns the chain structure and the behavior layered on it:
//!
//! - [`model`]: entry variants, typed ids, the arena-backed chain.
//! - [`ops`]: chain mutations, insert next to an anchor, two-phase animated
//!   removal with focus hand-off, transition ticking.
//! - [`layout`]: vertical placement and scroll anchoring, a pure function
//!   of the chain.
//! - [`eval`]: the evaluation sequencer, an explicit work-queue pass that
//!   parks on backend requests and survives errors and interruptions.
//! - [`query`]: the chain-wide search cursor over entry text regions.
//! - [`backend`]: the session trait and request/outcome types the host
//!   wires to an actual compute backend.
//! - [`store`]: serde document snapshots and plain JSON save/load.
//!
//! Rendering, widget behavior, and backend process management are host
//! concerns and stay out of this crate.

pub mod backend;
pub mod eval;
pub mod layout;
pub mod model;
pub mod ops;
pub mod query;
pub mod store;
