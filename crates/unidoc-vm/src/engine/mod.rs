//! Runtime engine for validating Unidoc event streams.
//!
//! The automaton is instantiated lazily: a graph is created when a handler
//! dives into a blueprint, positions are created when a handler enters them,
//! and both are dropped once nothing waits in them anymore.

mod error;
mod execution;
mod executor;
mod graph;
mod handlers;
mod invariants;
mod pass;
mod trace;

#[cfg(test)]
mod pass_tests;
#[cfg(test)]
mod test_utils;

pub use error::ExecutionError;
pub use execution::{ExecutionEvent, ExecutionEventType};
pub use executor::{Executor, ExecutorConfig};
pub use graph::{Automaton, GraphId, NodeId, ValidationGraph, ValidationNode};
pub use handlers::{
    DisjunctionHandler, EndHandler, EventHandler, GroupHandler, Handler, Hook, ManyHandler,
    SequenceHandler, SetHandler, TagHandler, dispatch, handler_for,
};
pub use pass::{Outcome, ValidationContext, ValidationPass};
pub use trace::{LogTracer, NoopTracer, PrintTracer, Tracer, Verbosity};
