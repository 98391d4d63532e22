//! Blueprint validation for Unidoc document event streams.
//!
//! # Example
//!
//! ```
//! use unidoc_lib::blueprint::builders::{end, many, sequence, tag, word_any};
//! use unidoc_lib::{UnidocEvent, Verdict};
//!
//! let blueprint = sequence([tag("p", many(word_any())), end()]);
//! let events = [
//!     UnidocEvent::tag_start("p"),
//!     UnidocEvent::word("hello"),
//!     UnidocEvent::tag_end("p"),
//! ];
//!
//! let outcome = unidoc_lib::validate(&blueprint, &events).expect("valid blueprint");
//! assert_eq!(outcome.verdict, Verdict::Accepted);
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod outcome;
mod tree;
mod validator;

#[cfg(test)]
mod validator_tests;

pub use unidoc_core::blueprint;
pub use unidoc_core::{
    Blueprint, BlueprintError, BranchId, BranchManager, MessageType, MessageValue,
    PREFERRED_CONTENT, Predicate, REQUIRED_CONTENT, UNEXPECTED_CONTENT, UNNECESSARY_CONTENT,
    UnidocEvent, UnidocEventKind, ValidationEvent, ValidationEventKind, ValidationMessage,
};
pub use unidoc_vm::{ExecutionError, ExecutorConfig, LogTracer, PrintTracer, Tracer, Verbosity};

pub use outcome::{ValidationOutcome, Verdict};
pub use tree::{BranchStatus, ValidationTree};
pub use validator::{Validator, validate};

/// Errors that can occur while validating a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The blueprint is malformed.
    #[error("invalid blueprint: {0}")]
    Blueprint(#[from] BlueprintError),

    /// The automaton hit a contract violation.
    #[error("validation aborted: {0}")]
    Execution(#[from] ExecutionError),

    #[error("the document was already completed")]
    AlreadyCompleted,
}

/// Result type for validation operations.
pub type Result<T> = std::result::Result<T, Error>;
