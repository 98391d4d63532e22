//! Final verdict of a validation run.

use serde::Serialize;
use unidoc_core::{
    BranchId, UnidocEvent, ValidationEvent, ValidationEventKind, ValidationMessage,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// A branch matched the whole blueprint.
    Accepted,
    /// Every branch failed.
    Rejected,
    /// Some branch is still waiting for input.
    Undecided,
}

/// The branch chosen to represent a run, with its log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub verdict: Verdict,
    pub branch: BranchId,
    pub events: Vec<ValidationEvent>,
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        self.verdict == Verdict::Accepted
    }

    /// Messages in log order.
    pub fn messages(&self) -> impl Iterator<Item = &ValidationMessage> {
        self.events.iter().filter_map(ValidationEvent::message)
    }

    /// Document events the branch checked, in order.
    pub fn validations(&self) -> impl Iterator<Item = &UnidocEvent> {
        self.events.iter().filter_map(|event| match &event.kind {
            ValidationEventKind::Validation(event) => Some(event),
            _ => None,
        })
    }

    /// The log, one event per line.
    pub fn render(&self) -> String {
        self.events
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
