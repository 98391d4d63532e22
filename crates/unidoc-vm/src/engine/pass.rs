//! Handler invocation scratch space.
//!
//! A [`ValidationPass`] is reused for every handler call. Loading a new command
//! with [`ValidationPass::handle`] wipes the previous outcomes and hands out a
//! [`ValidationContext`], the only view a handler gets of the executor.

use unidoc_core::{Blueprint, BlueprintType, BranchId, MessageProducer, State};

use super::error::ExecutionError;
use super::execution::ExecutionEvent;
use super::handlers::Hook;

/// What a handler asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Enter(State),
    Dive(State, Blueprint),
    Success,
    Failure,
    Skip,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failure | Self::Skip)
    }
}

#[derive(Debug)]
struct Handled {
    event: ExecutionEvent,
    blueprint: Blueprint,
}

#[derive(Debug, Default)]
struct Outcomes {
    list: Vec<Outcome>,
    terminal: bool,
    killed: bool,
}

impl Outcomes {
    fn clear(&mut self) {
        self.list.clear();
        self.terminal = false;
        self.killed = false;
    }
}

/// Reusable buffer for the outcomes of one handler call.
#[derive(Debug)]
pub struct ValidationPass {
    handled: Option<Handled>,
    outcomes: Outcomes,
    state_capacity: usize,
}

impl ValidationPass {
    pub fn new(state_capacity: usize) -> Self {
        Self {
            handled: None,
            outcomes: Outcomes::default(),
            state_capacity,
        }
    }

    /// Load `event` for a handler running `blueprint`, discarding the
    /// previous call's outcomes.
    pub fn handle<'p>(
        &'p mut self,
        event: ExecutionEvent,
        blueprint: Blueprint,
        output: &'p mut dyn MessageProducer,
    ) -> ValidationContext<'p> {
        let Self {
            handled,
            outcomes,
            state_capacity,
        } = self;
        outcomes.clear();
        ValidationContext {
            handled: handled.insert(Handled { event, blueprint }),
            outcomes,
            state_capacity: *state_capacity,
            output,
        }
    }

    /// Wipe buffered outcomes and outcome flags.
    pub fn clear(&mut self) {
        self.outcomes.clear();
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes.list
    }

    /// Move the buffered outcomes out, leaving the kill flag in place.
    pub fn take_outcomes(&mut self) -> Vec<Outcome> {
        std::mem::take(&mut self.outcomes.list)
    }

    pub fn is_killed(&self) -> bool {
        self.outcomes.killed
    }

    /// Outcomes recorded so far, a kill counting as one.
    pub fn outcome_count(&self) -> usize {
        self.outcomes.list.len() + usize::from(self.outcomes.killed)
    }

    /// Check that the last call left as many outcomes as `hook` requires.
    ///
    /// `on_enter` may leave none (the position waits for input), `on_start`
    /// and the bubbling hooks need at least one and `on_event` /
    /// `on_completion` exactly one.
    pub fn check(&self, hook: Hook) -> Result<(), ExecutionError> {
        let Some(handled) = &self.handled else {
            return Ok(());
        };
        let kind = handled.blueprint.blueprint_type();
        let actual = self.outcome_count();
        let (expected, admitted) = match hook {
            Hook::Enter => return Ok(()),
            Hook::Start if actual == 0 => {
                return Err(ExecutionError::NoTransitionOnStart { kind });
            }
            Hook::Start => return Ok(()),
            Hook::Event | Hook::Completion => ("exactly one", actual == 1),
            Hook::Success | Hook::Failure | Hook::Skip => ("at least one", actual > 0),
        };
        if admitted {
            return Ok(());
        }
        Err(ExecutionError::OutcomeCount {
            kind,
            hook,
            expected,
            actual,
        })
    }
}

/// A handler's view of the command it is processing.
pub struct ValidationContext<'p> {
    handled: &'p Handled,
    outcomes: &'p mut Outcomes,
    state_capacity: usize,
    output: &'p mut dyn MessageProducer,
}

impl<'p> ValidationContext<'p> {
    /// Blueprint whose handler is running.
    #[inline]
    pub fn blueprint(&self) -> &'p Blueprint {
        &self.handled.blueprint
    }

    pub fn kind(&self) -> BlueprintType {
        self.handled.blueprint.blueprint_type()
    }

    /// State of the position being processed. Empty on start.
    #[inline]
    pub fn state(&self) -> &'p State {
        &self.handled.event.state
    }

    #[inline]
    pub fn branch(&self) -> BranchId {
        self.handled.event.branch
    }

    pub fn event(&self) -> &'p ExecutionEvent {
        &self.handled.event
    }

    /// Message sink of the current branch.
    pub fn output(&mut self) -> &mut dyn MessageProducer {
        &mut *self.output
    }

    /// A fresh, empty state with the configured capacity.
    pub fn new_state(&self) -> State {
        State::with_capacity(self.state_capacity)
    }

    /// Continue at `state` in the current graph.
    pub fn enter(&mut self, state: State) -> Result<(), ExecutionError> {
        self.ensure_not_killed()?;
        self.outcomes.list.push(Outcome::Enter(state));
        Ok(())
    }

    /// Continue at `state` by instantiating `blueprint` beneath it.
    pub fn dive(&mut self, state: State, blueprint: &Blueprint) -> Result<(), ExecutionError> {
        self.ensure_not_killed()?;
        self.outcomes
            .list
            .push(Outcome::Dive(state, blueprint.clone()));
        Ok(())
    }

    pub fn success(&mut self) -> Result<(), ExecutionError> {
        self.terminal(Outcome::Success)
    }

    pub fn failure(&mut self) -> Result<(), ExecutionError> {
        self.terminal(Outcome::Failure)
    }

    pub fn skip(&mut self) -> Result<(), ExecutionError> {
        self.terminal(Outcome::Skip)
    }

    /// Drop the branch without a message and without bubbling.
    pub fn kill(&mut self) -> Result<(), ExecutionError> {
        if self.outcomes.killed || !self.outcomes.list.is_empty() {
            return Err(ExecutionError::ExclusiveKill { kind: self.kind() });
        }
        self.outcomes.killed = true;
        Ok(())
    }

    /// Error for a hook the current state does not expect.
    pub fn unexpected_hook(&self, hook: Hook) -> ExecutionError {
        ExecutionError::UnexpectedHook {
            kind: self.kind(),
            hook,
            state: self.state().clone(),
        }
    }

    /// Error for a state the handler did not produce.
    pub fn malformed_state(&self) -> ExecutionError {
        ExecutionError::MalformedState {
            kind: self.kind(),
            state: self.state().clone(),
        }
    }

    fn terminal(&mut self, outcome: Outcome) -> Result<(), ExecutionError> {
        self.ensure_not_killed()?;
        if self.outcomes.terminal {
            return Err(ExecutionError::DuplicateOutcome { kind: self.kind() });
        }
        self.outcomes.terminal = true;
        self.outcomes.list.push(outcome);
        Ok(())
    }

    fn ensure_not_killed(&self) -> Result<(), ExecutionError> {
        if self.outcomes.killed {
            return Err(ExecutionError::ExclusiveKill { kind: self.kind() });
        }
        Ok(())
    }
}
