// SPDX-FileCopyrightText: 2026 Quire Authors
// SPDX-License-Identifier: MIT

//! The evaluation sequencer.
//!
//! Drives "evaluate" across the chain as an explicit work-queue loop rather
//! than the mutually recursive callbacks of a naive design, so arbitrarily
//! long chains never grow the call stack. Entries that evaluate
//! synchronously (text, latex, images) complete inline; a non-empty command
//! entry emits an [`EvalRequest`] and parks the pass until the host feeds
//! the backend's outcome back through [`Sequencer::backend_finished`].
//!
//! Continuation is independent of the current entry's success or failure:
//! `Done`, `Error` and `Interrupted` all resume the stored policy, and only
//! [`EvaluationOption::DoNothing`] stops the pass.

use log::debug;

use crate::backend::{EvalOutcome, EvalRequest};
use crate::model::{EntryBody, EntryId, EntryKind, EvalStatus, RequestId, Worksheet};
use crate::ops;

/// Per-pass continuation policy, applied after each entry finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationOption {
    /// Stop after this entry.
    DoNothing,
    /// Move focus to the next focusable entry without evaluating it.
    FocusNext,
    /// Evaluate the next focusable entry with the same policy.
    EvaluateNext,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    entry: EntryId,
    option: EvaluationOption,
}

/// Sequencer state: at most one backend evaluation is in flight per pass.
#[derive(Debug, Default)]
pub struct Sequencer {
    pending: Option<Pending>,
    next_request: u64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// No evaluation is parked on a backend response.
    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    /// The entry whose backend evaluation the pass is waiting on.
    pub fn pending_entry(&self) -> Option<EntryId> {
        self.pending.map(|p| p.entry)
    }

    /// Evaluates the whole chain from the head with `EvaluateNext`.
    pub fn evaluate_all(&mut self, ws: &mut Worksheet) -> Vec<EvalRequest> {
        match ws.head() {
            Some(head) => self.evaluate(ws, head, EvaluationOption::EvaluateNext),
            None => Vec::new(),
        }
    }

    /// Evaluates `entry`, then continues per `option`.
    ///
    /// Returns the backend requests emitted before the pass either finished
    /// or parked (at most one, since a parked pass stops walking).
    pub fn evaluate(
        &mut self,
        ws: &mut Worksheet,
        entry: EntryId,
        option: EvaluationOption,
    ) -> Vec<EvalRequest> {
        let mut requests = Vec::new();
        self.run_from(ws, Some(entry), option, &mut requests);
        requests
    }

    /// Feeds a backend completion back into the pass.
    ///
    /// Records the outcome on the entry (result, error annotation, status)
    /// and, if this completion is the one the pass was parked on, resumes
    /// continuation. Completions for entries that are not pending (stale or
    /// out-of-band evaluations) only update entry state.
    pub fn backend_finished(
        &mut self,
        ws: &mut Worksheet,
        entry: EntryId,
        outcome: EvalOutcome,
    ) -> Vec<EvalRequest> {
        let mut requests = Vec::new();

        if !ws.contains(entry) {
            if self.pending.is_some_and(|p| p.entry == entry) {
                self.pending = None;
            }
            debug!("dropping completion for dead entry {entry}");
            return requests;
        }

        if let Some(e) = ws.entry_mut(entry) {
            match &outcome {
                EvalOutcome::Success { result } => {
                    if let EntryBody::Command { result: slot, error, .. } = e.body_mut() {
                        *slot = Some(result.clone());
                        *error = None;
                    }
                    e.set_status(EvalStatus::Done);
                }
                EvalOutcome::Error { message } => {
                    if let EntryBody::Command { error, .. } = e.body_mut() {
                        *error = Some(message.clone());
                    }
                    e.set_status(EvalStatus::Error);
                }
                EvalOutcome::Interrupted => {
                    e.set_status(EvalStatus::Interrupted);
                }
            }
        }

        let Some(pending) = self.pending.take() else {
            return requests;
        };
        if pending.entry != entry {
            self.pending = Some(pending);
            return requests;
        }

        match pending.option {
            EvaluationOption::DoNothing => {}
            EvaluationOption::FocusNext => advance_focus(ws, entry),
            EvaluationOption::EvaluateNext => match next_focusable(ws, entry) {
                Some(next) => {
                    self.run_from(ws, Some(next), EvaluationOption::EvaluateNext, &mut requests);
                }
                None => end_of_chain(ws, entry),
            },
        }
        requests
    }

    fn run_from(
        &mut self,
        ws: &mut Worksheet,
        start: Option<EntryId>,
        option: EvaluationOption,
        requests: &mut Vec<EvalRequest>,
    ) {
        let mut current = start;
        while let Some(id) = current {
            let Some(entry) = ws.entry(id) else {
                return;
            };
            if !entry.want_focus() {
                current = ws.next_of(id);
                continue;
            }

            match self.evaluate_one(ws, id) {
                Some(request) => {
                    debug!("parking on backend evaluation of {id}");
                    requests.push(request);
                    self.pending = Some(Pending { entry: id, option });
                    return;
                }
                None => match option {
                    EvaluationOption::DoNothing => return,
                    EvaluationOption::FocusNext => {
                        advance_focus(ws, id);
                        return;
                    }
                    EvaluationOption::EvaluateNext => match next_focusable(ws, id) {
                        Some(next) => current = Some(next),
                        None => {
                            end_of_chain(ws, id);
                            return;
                        }
                    },
                },
            }
        }
    }

    /// Evaluates a single entry. Returns the backend request when the entry
    /// needs asynchronous evaluation, `None` when it completed inline.
    fn evaluate_one(&mut self, ws: &mut Worksheet, id: EntryId) -> Option<EvalRequest> {
        let entry = ws.entry_mut(id)?;
        match entry.body() {
            EntryBody::Command { source, .. } => {
                let command = source.trim().to_owned();
                if command.is_empty() {
                    // an empty command discards stale output and continues
                    if let EntryBody::Command { result, error, .. } = entry.body_mut() {
                        *result = None;
                        *error = None;
                    }
                    entry.set_status(EvalStatus::Done);
                    return None;
                }
                if let EntryBody::Command { error, .. } = entry.body_mut() {
                    *error = None;
                }
                entry.set_status(EvalStatus::Evaluating);
                let request_id = self.next_request_id();
                debug!("submitting {request_id} for entry {id}");
                Some(EvalRequest::new(request_id, id, command))
            }
            EntryBody::Latex { .. } => {
                if let EntryBody::Latex { rendered, .. } = entry.body_mut() {
                    *rendered = true;
                }
                entry.set_status(EvalStatus::Done);
                None
            }
            EntryBody::Text { .. } | EntryBody::Image { .. } => {
                entry.set_status(EvalStatus::Done);
                None
            }
            EntryBody::PageBreak | EntryBody::Placeholder => None,
        }
    }

    fn next_request_id(&mut self) -> RequestId {
        self.next_request = self.next_request.wrapping_add(1);
        RequestId::new(self.next_request)
    }
}

/// First focusable entry after `id`, skipping entries that decline focus
/// without breaking the walk.
fn next_focusable(ws: &Worksheet, id: EntryId) -> Option<EntryId> {
    let mut cursor = ws.next_of(id);
    while let Some(candidate) = cursor {
        if ws.entry(candidate).is_some_and(|e| e.want_focus()) {
            return Some(candidate);
        }
        cursor = ws.next_of(candidate);
    }
    None
}

fn advance_focus(ws: &mut Worksheet, id: EntryId) {
    match next_focusable(ws, id) {
        Some(next) => {
            ws.focus(next);
        }
        None => end_of_chain(ws, id),
    }
}

/// Continuation ran off the end of the chain: append a fresh command entry,
/// unless the last evaluated entry is already an empty command entry, which
/// just takes focus back.
fn end_of_chain(ws: &mut Worksheet, last: EntryId) {
    let reuse_tail = ws
        .entry(last)
        .is_some_and(|e| e.kind() == EntryKind::Command && e.is_empty());
    if reuse_tail {
        ws.focus(last);
    } else {
        ops::append(ws, EntryKind::Command);
    }
}

#[cfg(test)]
mod tests;
