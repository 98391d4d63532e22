//! In-memory reference [`BranchManager`].
//!
//! Every branch owns a complete log: a fork starts as a copy of its parent's
//! log, so the log of any branch reads as if it had been the only path taken.
//! Writes to a branch that was terminated or merged away are dropped.

use serde::Serialize;
use unidoc_core::{
    BranchId, BranchManager, UnidocEvent, ValidationEvent, ValidationEventKind,
    ValidationMessage,
};

use crate::outcome::{ValidationOutcome, Verdict};

/// Lifecycle of a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "into", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BranchStatus {
    Running,
    /// Matched the blueprint. Keeps logging the inputs it accepts.
    Accepted,
    Terminated,
    /// Continued as the given branch.
    Merged(BranchId),
}

impl BranchStatus {
    /// True when the branch still records events.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Running | Self::Accepted)
    }
}

#[derive(Debug, Clone)]
struct Branch {
    status: BranchStatus,
    events: Vec<ValidationEvent>,
    batch: u64,
}

impl Branch {
    fn record(&mut self, kind: ValidationEventKind) {
        let index = self.events.last().map_or(0, |last| last.index + 1);
        self.events.push(ValidationEvent {
            index,
            batch: self.batch,
            kind,
        });
    }
}

#[derive(Debug, Clone)]
pub struct ValidationTree {
    branches: Vec<Branch>,
    accepted: Vec<BranchId>,
    terminated: Vec<BranchId>,
}

impl Default for ValidationTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationTree {
    /// Tree holding the running root branch.
    pub fn new() -> Self {
        Self {
            branches: vec![Branch {
                status: BranchStatus::Running,
                events: Vec::new(),
                batch: 0,
            }],
            accepted: Vec::new(),
            terminated: Vec::new(),
        }
    }

    pub fn root(&self) -> BranchId {
        BranchId(0)
    }

    /// Number of branches ever created.
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn status(&self, branch: BranchId) -> Option<BranchStatus> {
        self.get(branch).map(|b| b.status)
    }

    pub fn events(&self, branch: BranchId) -> Option<&[ValidationEvent]> {
        self.get(branch).map(|b| b.events.as_slice())
    }

    pub fn branches(&self) -> impl Iterator<Item = (BranchId, BranchStatus)> + '_ {
        self.branches
            .iter()
            .enumerate()
            .map(|(i, b)| (BranchId(i as u32), b.status))
    }

    /// Accepted branches in acceptance order.
    pub fn accepted(&self) -> &[BranchId] {
        &self.accepted
    }

    /// Pick the branch that represents the run so far: the first accepted
    /// branch, else the first running one, else the last terminated one.
    pub fn outcome(&self) -> ValidationOutcome {
        let (verdict, branch) = if let Some(&branch) = self.accepted.first() {
            (Verdict::Accepted, branch)
        } else if let Some((branch, _)) = self
            .branches()
            .find(|(_, status)| *status == BranchStatus::Running)
        {
            (Verdict::Undecided, branch)
        } else {
            let branch = self.terminated.last().copied().unwrap_or(self.root());
            (Verdict::Rejected, branch)
        };

        ValidationOutcome {
            verdict,
            branch,
            events: self.events(branch).map(<[_]>::to_vec).unwrap_or_default(),
        }
    }

    fn get(&self, branch: BranchId) -> Option<&Branch> {
        self.branches.get(branch.0 as usize)
    }

    /// Branch `branch` if it still records events.
    fn open(&mut self, branch: BranchId, action: &str) -> Option<&mut Branch> {
        match self.branches.get_mut(branch.0 as usize) {
            Some(b) if b.status.is_open() => Some(b),
            Some(b) => {
                tracing::debug!(
                    %branch,
                    status = ?b.status,
                    action,
                    "ignoring write to closed branch"
                );
                None
            }
            None => {
                tracing::debug!(%branch, action, "ignoring write to unknown branch");
                None
            }
        }
    }

    fn close(&mut self, branch: BranchId, status: BranchStatus) -> bool {
        match self.open(branch, "close") {
            Some(b) => {
                b.status = status;
                true
            }
            None => false,
        }
    }
}

impl BranchManager for ValidationTree {
    fn fork(&mut self, branch: BranchId) -> BranchId {
        let child = BranchId(self.branches.len() as u32);
        let mut copy = match self.get(branch) {
            Some(parent) => parent.clone(),
            None => Branch {
                status: BranchStatus::Running,
                events: Vec::new(),
                batch: 0,
            },
        };
        copy.status = BranchStatus::Running;
        self.branches.push(copy);
        child
    }

    fn merge(&mut self, survivor: BranchId, absorbed: BranchId) {
        if self.close(absorbed, BranchStatus::Merged(survivor)) {
            tracing::debug!(%survivor, %absorbed, "merged");
        }
    }

    fn terminate(&mut self, branch: BranchId) {
        if self.close(branch, BranchStatus::Terminated) {
            self.terminated.push(branch);
        }
    }

    fn accept(&mut self, branch: BranchId) {
        if let Some(b) = self.open(branch, "accept") {
            if b.status == BranchStatus::Running {
                b.status = BranchStatus::Accepted;
                self.accepted.push(branch);
            }
        }
    }

    fn validate(&mut self, branch: BranchId, event: &UnidocEvent) {
        if let Some(b) = self.open(branch, "validate") {
            b.batch += 1;
            b.record(ValidationEventKind::Validation(event.clone()));
        }
    }

    fn complete(&mut self, branch: BranchId) {
        if let Some(b) = self.open(branch, "complete") {
            b.batch += 1;
            b.record(ValidationEventKind::DocumentCompletion);
        }
    }

    fn produce(&mut self, branch: BranchId, message: ValidationMessage) {
        if let Some(b) = self.open(branch, "produce") {
            b.record(ValidationEventKind::Message(message));
        }
    }

    fn begin_group(&mut self, branch: BranchId, label: &str) {
        if let Some(b) = self.open(branch, "begin_group") {
            b.record(ValidationEventKind::BeginGroup(label.to_owned()));
        }
    }

    fn end_group(&mut self, branch: BranchId, label: &str) {
        if let Some(b) = self.open(branch, "end_group") {
            b.record(ValidationEventKind::EndGroup(label.to_owned()));
        }
    }
}
