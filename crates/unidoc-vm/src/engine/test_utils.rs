//! Branch manager stub that records every call.

use unidoc_core::{BranchId, BranchManager, UnidocEvent, ValidationMessage};

#[derive(Debug, Default)]
pub struct RecordingManager {
    next: u32,
    pub log: Vec<String>,
}

impl RecordingManager {
    /// Manager whose first fork is `#1`, leaving `#0` for the root branch.
    pub fn new() -> Self {
        Self {
            next: 1,
            log: Vec::new(),
        }
    }

    pub fn dump(&self) -> String {
        self.log.join("\n")
    }

    /// Entries starting with `prefix`.
    pub fn entries(&self, prefix: &str) -> Vec<&str> {
        self.log
            .iter()
            .map(String::as_str)
            .filter(|line| line.starts_with(prefix))
            .collect()
    }
}

impl BranchManager for RecordingManager {
    fn fork(&mut self, branch: BranchId) -> BranchId {
        let child = BranchId(self.next);
        self.next += 1;
        self.log.push(format!("fork {branch} -> {child}"));
        child
    }

    fn merge(&mut self, survivor: BranchId, absorbed: BranchId) {
        self.log.push(format!("merge {absorbed} into {survivor}"));
    }

    fn terminate(&mut self, branch: BranchId) {
        self.log.push(format!("terminate {branch}"));
    }

    fn accept(&mut self, branch: BranchId) {
        self.log.push(format!("accept {branch}"));
    }

    fn validate(&mut self, branch: BranchId, event: &UnidocEvent) {
        self.log.push(format!("validate {branch} {event}"));
    }

    fn complete(&mut self, branch: BranchId) {
        self.log.push(format!("complete {branch}"));
    }

    fn produce(&mut self, branch: BranchId, message: ValidationMessage) {
        self.log.push(format!("produce {branch} {message}"));
    }

    fn begin_group(&mut self, branch: BranchId, label: &str) {
        self.log.push(format!("begin {branch} {label}"));
    }

    fn end_group(&mut self, branch: BranchId, label: &str) {
        self.log.push(format!("end {branch} {label}"));
    }
}
