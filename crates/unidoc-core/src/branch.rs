//! Branch identities and the capabilities the automaton needs from their owner.
//!
//! The automaton never stores messages itself. Everything a handler reports goes
//! through a [`MessageProducer`], and every branch lifecycle decision (fork,
//! merge, terminate, accept) is delegated to a [`BranchManager`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::event::UnidocEvent;
use crate::message::ValidationMessage;

/// Identifier of one speculative validation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BranchId(pub u32);

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Message sink of a single branch.
pub trait MessageProducer {
    fn produce(&mut self, message: ValidationMessage);
    fn begin_group(&mut self, label: &str);
    fn end_group(&mut self, label: &str);
}

/// Owner of branch identities and their logs.
pub trait BranchManager {
    /// Create a branch that starts as a copy of `branch`.
    fn fork(&mut self, branch: BranchId) -> BranchId;
    /// Two branches reached the same position; `absorbed` continues as `survivor`.
    fn merge(&mut self, survivor: BranchId, absorbed: BranchId);
    /// The branch can no longer match.
    fn terminate(&mut self, branch: BranchId);
    /// The branch matched the whole blueprint.
    fn accept(&mut self, branch: BranchId);
    /// `event` is about to be checked on `branch`.
    fn validate(&mut self, branch: BranchId, event: &UnidocEvent);
    /// End of document is about to be checked on `branch`.
    fn complete(&mut self, branch: BranchId);
    fn produce(&mut self, branch: BranchId, message: ValidationMessage);
    fn begin_group(&mut self, branch: BranchId, label: &str);
    fn end_group(&mut self, branch: BranchId, label: &str);
}

impl<T: BranchManager + ?Sized> BranchManager for &mut T {
    fn fork(&mut self, branch: BranchId) -> BranchId {
        (**self).fork(branch)
    }
    fn merge(&mut self, survivor: BranchId, absorbed: BranchId) {
        (**self).merge(survivor, absorbed)
    }
    fn terminate(&mut self, branch: BranchId) {
        (**self).terminate(branch)
    }
    fn accept(&mut self, branch: BranchId) {
        (**self).accept(branch)
    }
    fn validate(&mut self, branch: BranchId, event: &UnidocEvent) {
        (**self).validate(branch, event)
    }
    fn complete(&mut self, branch: BranchId) {
        (**self).complete(branch)
    }
    fn produce(&mut self, branch: BranchId, message: ValidationMessage) {
        (**self).produce(branch, message)
    }
    fn begin_group(&mut self, branch: BranchId, label: &str) {
        (**self).begin_group(branch, label)
    }
    fn end_group(&mut self, branch: BranchId, label: &str) {
        (**self).end_group(branch, label)
    }
}

/// [`MessageProducer`] view of one branch of a manager.
pub struct BranchOutput<'a> {
    manager: &'a mut dyn BranchManager,
    branch: BranchId,
}

impl<'a> BranchOutput<'a> {
    pub fn new(manager: &'a mut dyn BranchManager, branch: BranchId) -> Self {
        Self { manager, branch }
    }

    pub fn branch(&self) -> BranchId {
        self.branch
    }
}

impl MessageProducer for BranchOutput<'_> {
    fn produce(&mut self, message: ValidationMessage) {
        self.manager.produce(self.branch, message);
    }

    fn begin_group(&mut self, label: &str) {
        self.manager.begin_group(self.branch, label);
    }

    fn end_group(&mut self, label: &str) {
        self.manager.end_group(self.branch, label);
    }
}

/// Producer that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardOutput;

impl MessageProducer for DiscardOutput {
    fn produce(&mut self, _message: ValidationMessage) {}
    fn begin_group(&mut self, _label: &str) {}
    fn end_group(&mut self, _label: &str) {}
}
