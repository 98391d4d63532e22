use unidoc_core::blueprint::builders::{disjunction, end, sequence, word};
use unidoc_core::{BranchId, DiscardOutput, State};

use super::error::ExecutionError;
use super::execution::ExecutionEvent;
use super::graph::Automaton;
use super::handlers::Hook;
use super::pass::{Outcome, ValidationPass};

fn command() -> ExecutionEvent {
    let mut automaton = Automaton::new();
    let root = automaton.create_root(end());
    ExecutionEvent::enter(root, State::from_bytes(&[3]), BranchId(4))
}

#[test]
fn context_exposes_the_command() {
    let mut pass = ValidationPass::new(32);
    let mut output = DiscardOutput;
    let cx = pass.handle(command(), word("x"), &mut output);

    assert_eq!(cx.state(), &State::from_bytes(&[3]));
    assert_eq!(cx.branch(), BranchId(4));
    assert_eq!(cx.blueprint(), &word("x"));
    assert!(cx.new_state().capacity() >= 32);
    assert!(cx.new_state().is_empty());
}

#[test]
fn enter_and_dive_are_unlimited() {
    let mut pass = ValidationPass::new(16);
    let mut output = DiscardOutput;
    let mut cx = pass.handle(command(), sequence([end()]), &mut output);

    cx.enter(State::from_bytes(&[1])).unwrap();
    cx.enter(State::from_bytes(&[2])).unwrap();
    cx.dive(State::from_bytes(&[3]), &end()).unwrap();
    cx.success().unwrap();

    assert_eq!(
        pass.outcomes(),
        [
            Outcome::Enter(State::from_bytes(&[1])),
            Outcome::Enter(State::from_bytes(&[2])),
            Outcome::Dive(State::from_bytes(&[3]), end()),
            Outcome::Success,
        ]
    );
    assert_eq!(pass.outcome_count(), 4);
}

#[test]
fn second_terminal_outcome_is_rejected() {
    let mut pass = ValidationPass::new(16);
    let mut output = DiscardOutput;
    let mut cx = pass.handle(command(), end(), &mut output);

    cx.success().unwrap();
    let err = cx.skip().unwrap_err();

    assert!(matches!(err, ExecutionError::DuplicateOutcome { .. }));
    insta::assert_snapshot!(err, @"END: the pass already has a terminal outcome");
    assert_eq!(pass.outcomes(), [Outcome::Success]);
}

#[test]
fn kill_is_exclusive() {
    let mut pass = ValidationPass::new(16);
    let mut output = DiscardOutput;

    let mut cx = pass.handle(command(), end(), &mut output);
    cx.kill().unwrap();
    assert!(matches!(
        cx.failure(),
        Err(ExecutionError::ExclusiveKill { .. })
    ));
    assert!(matches!(cx.kill(), Err(ExecutionError::ExclusiveKill { .. })));
    assert!(pass.is_killed());
    assert_eq!(pass.outcome_count(), 1);

    let mut cx = pass.handle(command(), end(), &mut output);
    cx.enter(State::new()).unwrap();
    assert!(matches!(cx.kill(), Err(ExecutionError::ExclusiveKill { .. })));
}

#[test]
fn handle_resets_previous_outcomes() {
    let mut pass = ValidationPass::new(16);
    let mut output = DiscardOutput;

    let mut cx = pass.handle(command(), end(), &mut output);
    cx.kill().unwrap();

    let mut cx = pass.handle(command(), end(), &mut output);
    cx.success().unwrap();

    assert!(!pass.is_killed());
    assert_eq!(pass.take_outcomes(), [Outcome::Success]);
    assert!(pass.outcomes().is_empty());
}

#[test]
fn clear_wipes_outcomes_and_flags() {
    let mut pass = ValidationPass::new(16);
    let mut output = DiscardOutput;
    let mut cx = pass.handle(command(), end(), &mut output);
    cx.failure().unwrap();

    pass.clear();

    assert_eq!(pass.outcome_count(), 0);
    let mut cx = pass.handle(command(), end(), &mut output);
    cx.failure().unwrap();
}

#[test]
fn check_requires_a_transition_on_start() {
    let mut pass = ValidationPass::new(16);
    let mut output = DiscardOutput;
    pass.handle(command(), disjunction(Vec::new()), &mut output);

    let err = pass.check(Hook::Start).unwrap_err();
    insta::assert_snapshot!(err, @"DISJUNCTION: a handler must always produce at least one transition on start");
    let err = pass.check(Hook::Success).unwrap_err();
    insta::assert_snapshot!(err, @"DISJUNCTION: on_success produced 0 outcomes, expected at least one");
    pass.check(Hook::Enter).unwrap();
}

#[test]
fn check_requires_one_outcome_per_event() {
    let mut pass = ValidationPass::new(16);
    let mut output = DiscardOutput;
    let mut cx = pass.handle(command(), sequence([end()]), &mut output);
    cx.enter(State::from_bytes(&[1])).unwrap();
    cx.enter(State::from_bytes(&[2])).unwrap();

    let err = pass.check(Hook::Event).unwrap_err();
    insta::assert_snapshot!(err, @"SEQUENCE: on_event produced 2 outcomes, expected exactly one");
    let err = pass.check(Hook::Completion).unwrap_err();
    insta::assert_snapshot!(err, @"SEQUENCE: on_completion produced 2 outcomes, expected exactly one");
    pass.check(Hook::Start).unwrap();
    pass.check(Hook::Failure).unwrap();
}

#[test]
fn check_counts_a_kill_as_one_outcome() {
    let mut pass = ValidationPass::new(16);
    let mut output = DiscardOutput;
    pass.handle(command(), end(), &mut output).kill().unwrap();

    pass.check(Hook::Event).unwrap();
    pass.check(Hook::Skip).unwrap();
}
