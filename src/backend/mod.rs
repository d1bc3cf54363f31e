// SPDX-FileCopyrightText: 2026 Quire Authors
// SPDX-License-Identifier: MIT

//! The request/notify contract to the external computation session.
//!
//! The actual engine (a CAS, an interpreter, a remote kernel) lives outside
//! this crate. The sequencer emits [`EvalRequest`]s; the host forwards them
//! to its session and feeds the resulting [`EvalOutcome`] back into
//! [`crate::eval::Sequencer::backend_finished`]. Nothing here blocks.

use crate::model::{EntryId, RequestId};

/// Capability flags a session exposes to the hosting shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub typesetting: bool,
    pub completion: bool,
    pub syntax_help: bool,
    pub interruptible: bool,
}

/// One command handed to the backend for asynchronous evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalRequest {
    request_id: RequestId,
    entry: EntryId,
    command: String,
}

impl EvalRequest {
    pub fn new(request_id: RequestId, entry: EntryId, command: impl Into<String>) -> Self {
        Self { request_id, entry, command: command.into() }
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub fn entry(&self) -> EntryId {
        self.entry
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

/// Terminal outcome the backend reports for an [`EvalRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalOutcome {
    Success { result: String },
    Error { message: String },
    Interrupted,
}

/// The seam a hosting shell implements over its computation engine.
///
/// `submit` must not block; completion arrives later through the host's
/// event loop. `interrupt` is a request, not a guarantee; the sequencer
/// only reacts once the corresponding [`EvalOutcome::Interrupted`]
/// notification is delivered.
pub trait Session {
    fn capabilities(&self) -> Capabilities;
    fn submit(&mut self, request: EvalRequest);
    fn interrupt(&mut self, entry: EntryId);
}
