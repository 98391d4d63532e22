//! Commands exchanged between the executor, its work list and the caller.

use std::fmt;

use unidoc_core::{Blueprint, BranchId, State};

use super::graph::GraphId;

/// Kind of an execution command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionEventType {
    /// Instantiate the graph's blueprint.
    Start,
    /// Create or reuse a frontier position in the graph.
    Enter,
    /// Create or reuse a position that owns a subgraph for `blueprint`.
    Dive,
    /// The graph matched, consuming content.
    Success,
    /// The graph cannot match.
    Failure,
    /// The graph matched without consuming content.
    Skip,
    /// A leaf position waits for the next document event.
    Event,
    /// The branch matched the whole blueprint; accept the rest of the stream.
    AcceptEverything,
}

impl ExecutionEventType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Enter => "ENTER",
            Self::Dive => "DIVE",
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Skip => "SKIP",
            Self::Event => "EVENT",
            Self::AcceptEverything => "ACCEPT_EVERYTHING",
        }
    }

    /// Outcome kinds that travel up to the position that dived.
    pub fn is_bubble(self) -> bool {
        matches!(self, Self::Success | Self::Failure | Self::Skip)
    }
}

impl fmt::Display for ExecutionEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of executor work.
///
/// `graph` is an arena id and does not keep the graph alive. `blueprint` is
/// only set on `DIVE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionEvent {
    pub kind: ExecutionEventType,
    pub state: State,
    pub graph: GraphId,
    pub blueprint: Option<Blueprint>,
    pub branch: BranchId,
}

impl ExecutionEvent {
    fn new(kind: ExecutionEventType, graph: GraphId, state: State, branch: BranchId) -> Self {
        Self {
            kind,
            state,
            graph,
            blueprint: None,
            branch,
        }
    }

    pub fn start(graph: GraphId, branch: BranchId) -> Self {
        Self::new(ExecutionEventType::Start, graph, State::default(), branch)
    }

    pub fn enter(graph: GraphId, state: State, branch: BranchId) -> Self {
        Self::new(ExecutionEventType::Enter, graph, state, branch)
    }

    pub fn dive(graph: GraphId, state: State, blueprint: Blueprint, branch: BranchId) -> Self {
        Self {
            blueprint: Some(blueprint),
            ..Self::new(ExecutionEventType::Dive, graph, state, branch)
        }
    }

    pub fn success(graph: GraphId, state: State, branch: BranchId) -> Self {
        Self::new(ExecutionEventType::Success, graph, state, branch)
    }

    pub fn failure(graph: GraphId, state: State, branch: BranchId) -> Self {
        Self::new(ExecutionEventType::Failure, graph, state, branch)
    }

    pub fn skip(graph: GraphId, state: State, branch: BranchId) -> Self {
        Self::new(ExecutionEventType::Skip, graph, state, branch)
    }

    pub fn event(graph: GraphId, state: State, branch: BranchId) -> Self {
        Self::new(ExecutionEventType::Event, graph, state, branch)
    }

    pub fn accept_everything(graph: GraphId, branch: BranchId) -> Self {
        Self::new(
            ExecutionEventType::AcceptEverything,
            graph,
            State::default(),
            branch,
        )
    }
}

impl fmt::Display for ExecutionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}[{}]", self.kind, self.branch, self.graph, self.state)?;
        if let Some(blueprint) = &self.blueprint {
            write!(f, " {blueprint}")?;
        }
        Ok(())
    }
}
