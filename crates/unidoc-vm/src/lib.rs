#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Runtime automaton for validating Unidoc event streams against blueprints.
//!
//! The [`Executor`] drives an [`Automaton`] of validation graphs through
//! per-kind [`Handler`]s, delegating branch bookkeeping and message output to
//! a [`BranchManager`](unidoc_core::BranchManager).

pub mod engine;

// Re-export commonly used items at crate root
pub use engine::{
    Automaton, ExecutionError, ExecutionEvent, ExecutionEventType, Executor, ExecutorConfig,
    GraphId, Handler, Hook, LogTracer, NodeId, NoopTracer, Outcome, PrintTracer, Tracer,
    ValidationContext, ValidationPass, Verbosity,
};
