// SPDX-FileCopyrightText: 2026 Quire Authors
// SPDX-License-Identifier: MIT

use crate::backend::{EvalOutcome, EvalRequest};
use crate::model::{EntryBody, EntryId, EntryKind, EvalStatus, Worksheet};
use crate::ops;

use super::{EvaluationOption, Sequencer};

fn command_entry(ws: &mut Worksheet, source: &str) -> EntryId {
    let id = ops::append(ws, EntryKind::Command);
    let EntryBody::Command { source: s, .. } = ws.entry_mut(id).expect("entry").body_mut() else {
        panic!("expected command body");
    };
    *s = source.to_owned();
    id
}

/// Drives a pass to completion, answering every backend request with the
/// outcome produced by `respond`. Returns the evaluated commands in order.
fn drive(
    ws: &mut Worksheet,
    seq: &mut Sequencer,
    mut requests: Vec<EvalRequest>,
    mut respond: impl FnMut(&EvalRequest) -> EvalOutcome,
) -> Vec<String> {
    let mut evaluated = Vec::new();
    while let Some(request) = requests.pop() {
        assert!(requests.is_empty(), "at most one request may be in flight");
        evaluated.push(request.command().to_owned());
        let outcome = respond(&request);
        requests = seq.backend_finished(ws, request.entry(), outcome);
    }
    evaluated
}

#[test]
fn evaluate_next_visits_all_entries_in_order() {
    let mut ws = Worksheet::new();
    let a = command_entry(&mut ws, "1+1");
    let b = command_entry(&mut ws, "2+2");
    let c = command_entry(&mut ws, "3+3");

    let mut seq = Sequencer::new();
    let requests = seq.evaluate_all(&mut ws);
    let evaluated = drive(&mut ws, &mut seq, requests, |_| EvalOutcome::Success {
        result: "ok".to_owned(),
    });

    assert_eq!(evaluated, vec!["1+1", "2+2", "3+3"]);
    for id in [a, b, c] {
        assert_eq!(ws.entry(id).expect("entry").status(), EvalStatus::Done);
    }
    assert!(seq.is_idle());
}

#[test]
fn continuation_survives_errors_and_interruptions() {
    let mut ws = Worksheet::new();
    let a = command_entry(&mut ws, "good");
    let b = command_entry(&mut ws, "broken");
    let c = command_entry(&mut ws, "slow");
    let d = command_entry(&mut ws, "fine");

    let mut seq = Sequencer::new();
    let requests = seq.evaluate_all(&mut ws);
    let evaluated = drive(&mut ws, &mut seq, requests, |request| match request.command() {
        "broken" => EvalOutcome::Error { message: "division by zero".to_owned() },
        "slow" => EvalOutcome::Interrupted,
        _ => EvalOutcome::Success { result: "ok".to_owned() },
    });

    assert_eq!(evaluated, vec!["good", "broken", "slow", "fine"]);
    assert_eq!(ws.entry(a).expect("entry").status(), EvalStatus::Done);
    assert_eq!(ws.entry(b).expect("entry").status(), EvalStatus::Error);
    assert_eq!(ws.entry(c).expect("entry").status(), EvalStatus::Interrupted);
    assert_eq!(ws.entry(d).expect("entry").status(), EvalStatus::Done);

    let EntryBody::Command { error, .. } = ws.entry(b).expect("entry").body() else {
        panic!("expected command body");
    };
    assert_eq!(error.as_deref(), Some("division by zero"));
}

#[test]
fn do_nothing_policy_stops_after_one_entry() {
    let mut ws = Worksheet::new();
    command_entry(&mut ws, "only");
    let b = command_entry(&mut ws, "never");
    let head = ws.head().expect("head");

    let mut seq = Sequencer::new();
    let requests = seq.evaluate(&mut ws, head, EvaluationOption::DoNothing);
    let evaluated = drive(&mut ws, &mut seq, requests, |_| EvalOutcome::Success {
        result: "ok".to_owned(),
    });

    assert_eq!(evaluated, vec!["only"]);
    assert_eq!(ws.entry(b).expect("entry").status(), EvalStatus::Idle);
}

#[test]
fn focus_next_focuses_without_evaluating() {
    let mut ws = Worksheet::new();
    let a = command_entry(&mut ws, "first");
    let b = command_entry(&mut ws, "second");

    let mut seq = Sequencer::new();
    let requests = seq.evaluate(&mut ws, a, EvaluationOption::FocusNext);
    drive(&mut ws, &mut seq, requests, |_| EvalOutcome::Success { result: "ok".to_owned() });

    assert_eq!(ws.focused(), Some(b));
    assert_eq!(ws.entry(b).expect("entry").status(), EvalStatus::Idle);
}

#[test]
fn unfocusable_entries_are_skipped_without_breaking_the_pass() {
    let mut ws = Worksheet::new();
    ops::append(&mut ws, EntryKind::PageBreak);
    ops::append(&mut ws, EntryKind::Placeholder);
    ops::append(&mut ws, EntryKind::PageBreak);
    let real = command_entry(&mut ws, "reached");

    let mut seq = Sequencer::new();
    let requests = seq.evaluate_all(&mut ws);
    let evaluated = drive(&mut ws, &mut seq, requests, |_| EvalOutcome::Success {
        result: "ok".to_owned(),
    });

    assert_eq!(evaluated, vec!["reached"]);
    assert_eq!(ws.entry(real).expect("entry").status(), EvalStatus::Done);
}

#[test]
fn text_and_latex_entries_complete_inline() {
    let mut ws = Worksheet::new();
    let text = ops::append(&mut ws, EntryKind::Text);
    let latex = ops::append(&mut ws, EntryKind::Latex);
    let EntryBody::Latex { source, .. } = ws.entry_mut(latex).expect("entry").body_mut() else {
        panic!("expected latex body");
    };
    *source = "\\int x".to_owned();
    let cmd = command_entry(&mut ws, "tail");

    let mut seq = Sequencer::new();
    let requests = seq.evaluate_all(&mut ws);
    assert_eq!(requests.len(), 1, "only the command entry goes to the backend");
    assert_eq!(ws.entry(text).expect("entry").status(), EvalStatus::Done);
    assert_eq!(ws.entry(latex).expect("entry").status(), EvalStatus::Done);
    let EntryBody::Latex { rendered, .. } = ws.entry(latex).expect("entry").body() else {
        panic!("expected latex body");
    };
    assert!(rendered);

    drive(&mut ws, &mut seq, requests, |_| EvalOutcome::Success { result: "ok".to_owned() });
    assert_eq!(ws.entry(cmd).expect("entry").status(), EvalStatus::Done);
}

#[test]
fn empty_command_entry_discards_stale_output_and_continues() {
    let mut ws = Worksheet::new();
    let empty = ops::append(&mut ws, EntryKind::Command);
    {
        let EntryBody::Command { result, .. } = ws.entry_mut(empty).expect("entry").body_mut()
        else {
            panic!("expected command body");
        };
        *result = Some("stale".to_owned());
    }
    command_entry(&mut ws, "after");

    let mut seq = Sequencer::new();
    let requests = seq.evaluate_all(&mut ws);
    let evaluated = drive(&mut ws, &mut seq, requests, |_| EvalOutcome::Success {
        result: "ok".to_owned(),
    });

    assert_eq!(evaluated, vec!["after"]);
    let EntryBody::Command { result, .. } = ws.entry(empty).expect("entry").body() else {
        panic!("expected command body");
    };
    assert_eq!(result, &None);
}

#[test]
fn pass_ending_on_nonempty_tail_appends_fresh_command_entry() {
    let mut ws = Worksheet::new();
    let tail = command_entry(&mut ws, "last");

    let mut seq = Sequencer::new();
    let requests = seq.evaluate_all(&mut ws);
    drive(&mut ws, &mut seq, requests, |_| EvalOutcome::Success { result: "ok".to_owned() });

    assert_eq!(ws.chain_len(), 2);
    let appended = ws.tail().expect("tail");
    assert_ne!(appended, tail);
    assert_eq!(ws.entry(appended).expect("entry").kind(), EntryKind::Command);
    assert!(ws.entry(appended).expect("entry").is_empty());
    assert_eq!(ws.focused(), Some(appended));
}

#[test]
fn pass_ending_on_empty_command_tail_just_refocuses_it() {
    let mut ws = Worksheet::new();
    command_entry(&mut ws, "work");
    let empty_tail = ops::append(&mut ws, EntryKind::Command);

    let mut seq = Sequencer::new();
    let requests = seq.evaluate_all(&mut ws);
    drive(&mut ws, &mut seq, requests, |_| EvalOutcome::Success { result: "ok".to_owned() });

    assert_eq!(ws.chain_len(), 2, "no redundant entry appended");
    assert_eq!(ws.focused(), Some(empty_tail));
}

#[test]
fn completion_for_a_non_pending_entry_only_updates_state() {
    let mut ws = Worksheet::new();
    let a = command_entry(&mut ws, "standalone");

    let mut seq = Sequencer::new();
    let requests =
        seq.backend_finished(&mut ws, a, EvalOutcome::Success { result: "late".to_owned() });
    assert!(requests.is_empty());
    assert_eq!(ws.entry(a).expect("entry").status(), EvalStatus::Done);
    assert!(seq.is_idle());
}

#[test]
fn completion_for_a_removed_entry_drops_the_pass() {
    let mut ws = Worksheet::new();
    let a = command_entry(&mut ws, "doomed");
    command_entry(&mut ws, "after");

    let mut seq = Sequencer::new();
    let requests = seq.evaluate(&mut ws, a, EvaluationOption::EvaluateNext);
    assert_eq!(requests.len(), 1);

    ops::remove(&mut ws, a, ops::RemovalMode::Immediate);
    let follow_up =
        seq.backend_finished(&mut ws, a, EvalOutcome::Success { result: "ok".to_owned() });
    assert!(follow_up.is_empty());
    assert!(seq.is_idle());
}

#[test]
fn mid_removal_entries_are_not_reentered() {
    let mut ws = Worksheet::new();
    let a = command_entry(&mut ws, "first");
    let b = command_entry(&mut ws, "dying");
    let c = command_entry(&mut ws, "third");
    ops::remove(&mut ws, b, ops::RemovalMode::Animated);

    let mut seq = Sequencer::new();
    let requests = seq.evaluate(&mut ws, a, EvaluationOption::EvaluateNext);
    let evaluated = drive(&mut ws, &mut seq, requests, |_| EvalOutcome::Success {
        result: "ok".to_owned(),
    });

    assert_eq!(evaluated, vec!["first", "third"]);
    assert_eq!(ws.entry(b).expect("entry").status(), EvalStatus::Idle);
    let _ = c;
}
