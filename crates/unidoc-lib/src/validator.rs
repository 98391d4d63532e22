//! Incremental validation of one document.

use std::borrow::Borrow;

use unidoc_core::{Blueprint, UnidocEvent};
use unidoc_vm::{ExecutionError, ExecutionEvent, Executor, ExecutorConfig, NoopTracer, Tracer};

use crate::outcome::ValidationOutcome;
use crate::tree::ValidationTree;
use crate::{Error, Result};

/// Feeds a document's events to an executor and records every branch in a
/// [`ValidationTree`].
pub struct Validator {
    executor: Executor,
    tree: ValidationTree,
    pending: Vec<ExecutionEvent>,
    completed: bool,
}

impl Validator {
    pub fn new(blueprint: &Blueprint) -> Result<Self> {
        Self::with_config(blueprint, ExecutorConfig::default())
    }

    /// Check `blueprint` and run the automaton up to the first document event.
    pub fn with_config(blueprint: &Blueprint, config: ExecutorConfig) -> Result<Self> {
        let mut executor = Executor::new(config);
        let mut tree = ValidationTree::new();
        let mut pending = Vec::new();
        executor
            .start(blueprint.clone(), tree.root(), &mut pending)
            .map_err(|err| match err {
                ExecutionError::Blueprint(err) => Error::Blueprint(err),
                err => Error::Execution(err),
            })?;
        executor.resume(&mut tree, &mut pending)?;

        Ok(Self {
            executor,
            tree,
            pending,
            completed: false,
        })
    }

    pub fn event(&mut self, event: &UnidocEvent) -> Result<()> {
        self.event_with(event, &mut NoopTracer)
    }

    pub fn event_with<T: Tracer>(&mut self, event: &UnidocEvent, tracer: &mut T) -> Result<()> {
        if self.completed {
            return Err(Error::AlreadyCompleted);
        }
        self.executor
            .event_with(event, &mut self.tree, &mut self.pending, tracer)?;
        Ok(())
    }

    /// Signal the end of the document and pick the outcome.
    pub fn complete(&mut self) -> Result<ValidationOutcome> {
        self.complete_with(&mut NoopTracer)
    }

    pub fn complete_with<T: Tracer>(&mut self, tracer: &mut T) -> Result<ValidationOutcome> {
        if self.completed {
            return Err(Error::AlreadyCompleted);
        }
        self.completed = true;
        self.executor
            .complete_with(&mut self.tree, &mut self.pending, tracer)?;
        Ok(self.tree.outcome())
    }

    /// True once a branch matched the whole blueprint and the rest of the
    /// document is accepted unchecked.
    pub fn is_accepting(&self) -> bool {
        self.executor.accepted().is_some()
    }

    /// Commands waiting for the next document event.
    pub fn pending(&self) -> &[ExecutionEvent] {
        &self.pending
    }

    pub fn tree(&self) -> &ValidationTree {
        &self.tree
    }
}

/// Validate a complete document in one go.
pub fn validate<I>(blueprint: &Blueprint, events: I) -> Result<ValidationOutcome>
where
    I: IntoIterator,
    I::Item: Borrow<UnidocEvent>,
{
    let mut validator = Validator::new(blueprint)?;
    for event in events {
        validator.event(event.borrow())?;
    }
    validator.complete()
}
