//! Contract violations detected while driving the automaton.
//!
//! These are programming errors in a handler, a blueprint or the caller's use
//! of the executor. Grammar mismatches are never errors: they are messages
//! plus a failing branch.

use unidoc_core::{Blueprint, BlueprintError, BlueprintType, State};

use super::execution::ExecutionEventType;
use super::graph::GraphId;
use super::handlers::Hook;

#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("invalid blueprint: {0}")]
    Blueprint(#[from] BlueprintError),

    #[error("{kind}: a handler must always produce at least one transition on start")]
    NoTransitionOnStart { kind: BlueprintType },

    #[error("{kind}: {hook} produced {actual} outcomes, expected {expected}")]
    OutcomeCount {
        kind: BlueprintType,
        hook: Hook,
        expected: &'static str,
        actual: usize,
    },

    #[error("{kind}: the pass already has a terminal outcome")]
    DuplicateOutcome { kind: BlueprintType },

    #[error("{kind}: kill cannot be combined with other outcomes")]
    ExclusiveKill { kind: BlueprintType },

    #[error("{graph}[{state}] already dives into {existing}, not {requested}")]
    DiveMismatch {
        graph: GraphId,
        state: State,
        existing: Blueprint,
        requested: Blueprint,
    },

    #[error("{graph}[{state}] is a leaf and cannot be dived into")]
    DiveIntoLeaf { graph: GraphId, state: State },

    #[error("{graph}[{state}] owns a subgraph and cannot be entered")]
    EnterIntoDive { graph: GraphId, state: State },

    #[error("{handler} handler invoked for a {blueprint} blueprint")]
    HandlerMismatch {
        handler: BlueprintType,
        blueprint: BlueprintType,
    },

    #[error("{kind}: {hook} is not expected in state [{state}]")]
    UnexpectedHook {
        kind: BlueprintType,
        hook: Hook,
        state: State,
    },

    #[error("{kind}: malformed state [{state}]")]
    MalformedState { kind: BlueprintType, state: State },

    #[error("{entry} does not accept {kind} commands")]
    UnexpectedCommand {
        entry: &'static str,
        kind: ExecutionEventType,
    },

    #[error("{graph}[{state}] does not exist anymore")]
    StaleCommand { graph: GraphId, state: State },

    #[error("execution limit of {0} commands exceeded")]
    ExecFuelExhausted(u32),
}
