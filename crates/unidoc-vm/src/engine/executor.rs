//! Work-list interpreter driving the handlers.
//!
//! Commands are processed FIFO. Handler outcomes are turned into new commands
//! at the tail of the queue; the first outcome of a call keeps the branch and
//! every further one runs on a fork. Leaves waiting for a document event are
//! handed back to the caller as `EVENT` commands and come back with the next
//! [`Executor::event`] or [`Executor::complete`] call.

use std::collections::{HashMap, HashSet, VecDeque};
use std::mem;

use indexmap::IndexSet;
use unidoc_core::{Blueprint, BranchId, BranchManager, BranchOutput, State, UnidocEvent};

use super::error::ExecutionError;
use super::execution::{ExecutionEvent, ExecutionEventType};
use super::graph::{Automaton, GraphId};
use super::handlers::{Hook, dispatch, handler_for};
use super::pass::{Outcome, ValidationPass};
use super::trace::{NoopTracer, Tracer};

/// Runtime configuration of an [`Executor`].
#[derive(Clone, Copy, Debug)]
pub struct ExecutorConfig {
    /// Maximum commands dispatched per entry-point call (default: 1,000,000).
    pub(crate) exec_fuel: u32,
    /// Initial capacity of handler states in bytes (default: 16).
    pub(crate) state_capacity: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            exec_fuel: 1_000_000,
            state_capacity: unidoc_core::DEFAULT_CAPACITY,
        }
    }
}

impl ExecutorConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution fuel limit.
    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.exec_fuel = fuel;
        self
    }

    /// Set the initial state capacity.
    pub fn state_capacity(mut self, capacity: usize) -> Self {
        self.state_capacity = capacity;
        self
    }

    pub fn get_exec_fuel(&self) -> u32 {
        self.exec_fuel
    }
    pub fn get_state_capacity(&self) -> usize {
        self.state_capacity
    }
}

/// What `EVENT` commands are answered with during a round.
#[derive(Clone, Copy)]
enum Delivery<'e> {
    /// Only internal commands; leaves go back to the caller.
    Internal,
    Event(&'e UnidocEvent),
    Completion,
}

/// Scratch state of one entry-point call.
struct Round<'e> {
    entry: &'static str,
    delivery: Delivery<'e>,
    /// Branches already reported to the manager for this delivery.
    delivered: HashSet<BranchId>,
    /// Leaves answered during completion, with the branch that answered.
    consumed: HashMap<(GraphId, State), BranchId>,
    output: Vec<ExecutionEvent>,
    fuel: u32,
}

impl<'e> Round<'e> {
    fn new(entry: &'static str, delivery: Delivery<'e>, fuel: u32) -> Self {
        Self {
            entry,
            delivery,
            delivered: HashSet::new(),
            consumed: HashMap::new(),
            output: Vec::new(),
            fuel,
        }
    }

    fn is_completion(&self) -> bool {
        matches!(self.delivery, Delivery::Completion)
    }
}

/// Graph and state that outcomes of a handler call refer to.
struct Site {
    graph: GraphId,
    state: State,
    branch: BranchId,
}

/// Drives an [`Automaton`] with per-kind handlers.
pub struct Executor {
    automaton: Automaton,
    queue: VecDeque<ExecutionEvent>,
    pass: ValidationPass,
    config: ExecutorConfig,
    accepted: Option<BranchId>,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new(ExecutorConfig::default())
    }
}

impl Executor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self {
            automaton: Automaton::new(),
            queue: VecDeque::new(),
            pass: ValidationPass::new(config.state_capacity),
            config,
            accepted: None,
        }
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn config(&self) -> ExecutorConfig {
        self.config
    }

    /// Branch that matched the whole blueprint before the end of the document.
    pub fn accepted(&self) -> Option<BranchId> {
        self.accepted
    }

    /// Reset the automaton to a root graph for `blueprint` and put its
    /// `START` into `pending`. Run it with [`Executor::resume`].
    ///
    /// The blueprint is validated first: handler states index operands with
    /// a single byte.
    pub fn start(
        &mut self,
        blueprint: Blueprint,
        branch: BranchId,
        pending: &mut Vec<ExecutionEvent>,
    ) -> Result<GraphId, ExecutionError> {
        blueprint.validate()?;
        self.automaton.clear();
        self.queue.clear();
        self.pass.clear();
        self.accepted = None;
        let root = self.automaton.create_root(blueprint);
        pending.push(ExecutionEvent::start(root, branch));
        Ok(root)
    }

    /// Run the internal commands in `pending`, leaving the commands for the
    /// caller in it.
    pub fn resume(
        &mut self,
        manager: &mut dyn BranchManager,
        pending: &mut Vec<ExecutionEvent>,
    ) -> Result<(), ExecutionError> {
        self.resume_with(manager, pending, &mut NoopTracer)
    }

    pub fn resume_with<T: Tracer>(
        &mut self,
        manager: &mut dyn BranchManager,
        pending: &mut Vec<ExecutionEvent>,
        tracer: &mut T,
    ) -> Result<(), ExecutionError> {
        let incoming = mem::take(pending);
        let mut round = Round::new("resume", Delivery::Internal, self.config.exec_fuel);
        for command in incoming {
            match command.kind {
                ExecutionEventType::Event | ExecutionEventType::AcceptEverything => {
                    round.output.push(command)
                }
                _ => self.queue.push_back(command),
            }
        }
        self.run(manager, &mut round, tracer)?;
        *pending = round.output;
        Ok(())
    }

    /// Answer the leaves in `pending` with `event`.
    pub fn event(
        &mut self,
        event: &UnidocEvent,
        manager: &mut dyn BranchManager,
        pending: &mut Vec<ExecutionEvent>,
    ) -> Result<(), ExecutionError> {
        self.event_with(event, manager, pending, &mut NoopTracer)
    }

    pub fn event_with<T: Tracer>(
        &mut self,
        event: &UnidocEvent,
        manager: &mut dyn BranchManager,
        pending: &mut Vec<ExecutionEvent>,
        tracer: &mut T,
    ) -> Result<(), ExecutionError> {
        let round = Round::new("event", Delivery::Event(event), self.config.exec_fuel);
        self.deliver(round, manager, pending, tracer)
    }

    /// Answer the leaves in `pending` with the end of the document.
    pub fn complete(
        &mut self,
        manager: &mut dyn BranchManager,
        pending: &mut Vec<ExecutionEvent>,
    ) -> Result<(), ExecutionError> {
        self.complete_with(manager, pending, &mut NoopTracer)
    }

    pub fn complete_with<T: Tracer>(
        &mut self,
        manager: &mut dyn BranchManager,
        pending: &mut Vec<ExecutionEvent>,
        tracer: &mut T,
    ) -> Result<(), ExecutionError> {
        let round = Round::new("complete", Delivery::Completion, self.config.exec_fuel);
        self.deliver(round, manager, pending, tracer)
    }

    fn deliver<T: Tracer>(
        &mut self,
        mut round: Round<'_>,
        manager: &mut dyn BranchManager,
        pending: &mut Vec<ExecutionEvent>,
        tracer: &mut T,
    ) -> Result<(), ExecutionError> {
        if let Some(command) = pending.iter().find(|command| {
            !matches!(
                command.kind,
                ExecutionEventType::Event | ExecutionEventType::AcceptEverything
            )
        }) {
            return Err(ExecutionError::UnexpectedCommand {
                entry: round.entry,
                kind: command.kind,
            });
        }

        let incoming = mem::take(pending);
        let mut leaves = Vec::with_capacity(incoming.len());
        for command in incoming {
            if command.kind == ExecutionEventType::AcceptEverything {
                Self::report(manager, &mut round, command.branch);
                round.output.push(command);
                continue;
            }
            // Detach every leaf first so that positions entered for the next
            // event never collide with positions answered by this one.
            let node = self
                .automaton
                .get_graph(command.graph)
                .and_then(|graph| graph.get(&command.state));
            if node.is_none() {
                return Err(ExecutionError::StaleCommand {
                    graph: command.graph,
                    state: command.state,
                });
            }
            self.automaton.delete(command.graph, &command.state);
            leaves.push(command);
        }

        self.queue.extend(leaves);
        self.run(manager, &mut round, tracer)?;
        *pending = round.output;
        Ok(())
    }

    /// Tell the manager about the delivery, once per branch and round.
    fn report(manager: &mut dyn BranchManager, round: &mut Round<'_>, branch: BranchId) {
        if !round.delivered.insert(branch) {
            return;
        }
        match round.delivery {
            Delivery::Event(event) => manager.validate(branch, event),
            Delivery::Completion => manager.complete(branch),
            Delivery::Internal => {}
        }
    }

    /// Drain the queue, then collect graphs left without nodes.
    fn run<T: Tracer>(
        &mut self,
        manager: &mut dyn BranchManager,
        round: &mut Round<'_>,
        tracer: &mut T,
    ) -> Result<(), ExecutionError> {
        if let Err(err) = self.drain(manager, round, tracer) {
            self.queue.clear();
            return Err(err);
        }
        let removed = self.automaton.sweep();
        tracer.trace_sweep(removed);
        Ok(())
    }

    fn drain<T: Tracer>(
        &mut self,
        manager: &mut dyn BranchManager,
        round: &mut Round<'_>,
        tracer: &mut T,
    ) -> Result<(), ExecutionError> {
        while let Some(command) = self.queue.pop_front() {
            if round.fuel == 0 {
                return Err(ExecutionError::ExecFuelExhausted(self.config.exec_fuel));
            }
            round.fuel -= 1;
            tracer.trace_command(&command);

            match command.kind {
                ExecutionEventType::Start => self.exec_start(manager, round, command, tracer)?,
                ExecutionEventType::Dive => self.exec_dive(command)?,
                ExecutionEventType::Enter => self.exec_enter(manager, round, command, tracer)?,
                ExecutionEventType::Event => self.exec_event(manager, round, command, tracer)?,
                ExecutionEventType::Success
                | ExecutionEventType::Failure
                | ExecutionEventType::Skip => self.exec_bubble(manager, round, command, tracer)?,
                ExecutionEventType::AcceptEverything => {
                    self.exec_accept_everything(manager, round, command, tracer)
                }
            }
        }
        Ok(())
    }

    fn exec_start<T: Tracer>(
        &mut self,
        manager: &mut dyn BranchManager,
        round: &mut Round<'_>,
        command: ExecutionEvent,
        tracer: &mut T,
    ) -> Result<(), ExecutionError> {
        let blueprint = self.blueprint_of(&command)?;
        let site = Site {
            graph: command.graph,
            state: State::default(),
            branch: command.branch,
        };
        self.invoke(manager, Hook::Start, command, blueprint, None)?;
        self.pass.check(Hook::Start)?;
        self.apply(manager, round, site, tracer);
        Ok(())
    }

    fn exec_dive(&mut self, command: ExecutionEvent) -> Result<(), ExecutionError> {
        let ExecutionEvent {
            kind,
            state,
            graph,
            blueprint,
            branch,
        } = command;
        let Some(blueprint) = blueprint else {
            return Err(ExecutionError::UnexpectedCommand { entry: "dive", kind });
        };
        if self.automaton.get_graph(graph).is_none() {
            return Err(ExecutionError::StaleCommand { graph, state });
        }

        let content = match self.automaton.get(graph, &state) {
            Some(node) => {
                let Some(content) = self.automaton.node(node).content() else {
                    return Err(ExecutionError::DiveIntoLeaf { graph, state });
                };
                let existing = self.automaton.graph(content).blueprint();
                if !existing.ptr_eq(&blueprint) && *existing != blueprint {
                    return Err(ExecutionError::DiveMismatch {
                        graph,
                        state,
                        existing: existing.clone(),
                        requested: blueprint,
                    });
                }
                content
            }
            None => {
                let node = self.automaton.create(graph, &state, branch);
                let content = self.automaton.create_graph(blueprint);
                self.automaton.set_content(node, content);
                content
            }
        };
        self.queue.push_back(ExecutionEvent::start(content, branch));
        Ok(())
    }

    fn exec_enter<T: Tracer>(
        &mut self,
        manager: &mut dyn BranchManager,
        round: &mut Round<'_>,
        command: ExecutionEvent,
        tracer: &mut T,
    ) -> Result<(), ExecutionError> {
        let blueprint = self.blueprint_of(&command)?;
        let (graph, branch) = (command.graph, command.branch);

        if let Some(node) = self.automaton.get(graph, &command.state) {
            let existing = self.automaton.node(node);
            if !existing.is_leaf() {
                return Err(ExecutionError::EnterIntoDive {
                    graph,
                    state: command.state,
                });
            }
            let survivor = existing.branch();
            if survivor != branch {
                manager.merge(survivor, branch);
                tracer.trace_merge(survivor, branch);
            }
            return Ok(());
        }

        if round.is_completion() {
            // A zero-width loop came back to a leaf already answered with the
            // end of the document.
            let key = (graph, command.state.clone());
            if let Some(&owner) = round.consumed.get(&key) {
                if owner == branch {
                    manager.terminate(branch);
                    tracer.trace_terminate(branch, true);
                } else {
                    manager.merge(owner, branch);
                    tracer.trace_merge(owner, branch);
                }
                return Ok(());
            }
        }

        let node = self.automaton.create(graph, &command.state, branch);
        let site = Site {
            graph,
            state: command.state.clone(),
            branch,
        };
        self.invoke(manager, Hook::Enter, command, blueprint, None)?;

        if self.pass.outcome_count() == 0 {
            let leaf = ExecutionEvent::event(site.graph, site.state, branch);
            if round.is_completion() {
                self.queue.push_back(leaf);
            } else {
                tracer.trace_await(&leaf);
                round.output.push(leaf);
            }
            return Ok(());
        }

        self.automaton.delete_node(node);
        self.apply(manager, round, site, tracer);
        Ok(())
    }

    fn exec_event<T: Tracer>(
        &mut self,
        manager: &mut dyn BranchManager,
        round: &mut Round<'_>,
        command: ExecutionEvent,
        tracer: &mut T,
    ) -> Result<(), ExecutionError> {
        let blueprint = self.blueprint_of(&command)?;
        let (hook, event) = match round.delivery {
            Delivery::Internal => {
                return Err(ExecutionError::UnexpectedCommand {
                    entry: round.entry,
                    kind: command.kind,
                });
            }
            Delivery::Event(event) => (Hook::Event, Some(event)),
            Delivery::Completion => (Hook::Completion, None),
        };

        if self.automaton.get(command.graph, &command.state).is_some() {
            self.automaton.delete(command.graph, &command.state);
        }
        if round.is_completion() {
            round
                .consumed
                .insert((command.graph, command.state.clone()), command.branch);
        }
        Self::report(manager, round, command.branch);

        let site = Site {
            graph: command.graph,
            state: command.state.clone(),
            branch: command.branch,
        };
        self.invoke(manager, hook, command, blueprint, event)?;
        self.pass.check(hook)?;
        self.apply(manager, round, site, tracer);
        Ok(())
    }

    fn exec_bubble<T: Tracer>(
        &mut self,
        manager: &mut dyn BranchManager,
        round: &mut Round<'_>,
        command: ExecutionEvent,
        tracer: &mut T,
    ) -> Result<(), ExecutionError> {
        let Some(graph) = self.automaton.get_graph(command.graph) else {
            return Err(ExecutionError::StaleCommand {
                graph: command.graph,
                state: command.state,
            });
        };
        let branch = command.branch;

        let Some(node) = graph.parent() else {
            if !graph.is_root() {
                return Err(ExecutionError::StaleCommand {
                    graph: command.graph,
                    state: command.state,
                });
            }
            if command.kind == ExecutionEventType::Failure {
                manager.terminate(branch);
                tracer.trace_terminate(branch, false);
                return Ok(());
            }
            manager.accept(branch);
            tracer.trace_accept(branch);
            if !round.is_completion() {
                self.queue
                    .push_front(ExecutionEvent::accept_everything(command.graph, branch));
            }
            return Ok(());
        };

        let node = self.automaton.node(node);
        let owner = node.parent();
        let state = node.state().clone();
        let blueprint = self.automaton.graph(owner).blueprint().clone();
        let hook = match command.kind {
            ExecutionEventType::Success => Hook::Success,
            ExecutionEventType::Failure => Hook::Failure,
            _ => Hook::Skip,
        };

        let site = Site {
            graph: owner,
            state: state.clone(),
            branch,
        };
        let target = ExecutionEvent {
            graph: owner,
            state,
            ..command
        };
        self.invoke(manager, hook, target, blueprint, None)?;
        self.pass.check(hook)?;
        self.apply(manager, round, site, tracer);
        Ok(())
    }

    fn exec_accept_everything<T: Tracer>(
        &mut self,
        manager: &mut dyn BranchManager,
        round: &mut Round<'_>,
        command: ExecutionEvent,
        tracer: &mut T,
    ) {
        let accepted = command.branch;
        let others: IndexSet<BranchId> = self
            .queue
            .iter()
            .chain(&round.output)
            .map(|pending| pending.branch)
            .filter(|&branch| branch != accepted)
            .collect();
        for branch in others {
            manager.terminate(branch);
            tracer.trace_terminate(branch, false);
        }

        self.queue.clear();
        self.automaton.clear();
        self.accepted = Some(accepted);
        round.output.clear();
        round.output.push(command);
    }

    /// Blueprint of the graph `command` targets.
    fn blueprint_of(&self, command: &ExecutionEvent) -> Result<Blueprint, ExecutionError> {
        match self.automaton.get_graph(command.graph) {
            Some(graph) => Ok(graph.blueprint().clone()),
            None => Err(ExecutionError::StaleCommand {
                graph: command.graph,
                state: command.state.clone(),
            }),
        }
    }

    /// Run `hook` of the handler for `blueprint`, leaving its outcomes in
    /// the pass.
    fn invoke(
        &mut self,
        manager: &mut dyn BranchManager,
        hook: Hook,
        command: ExecutionEvent,
        blueprint: Blueprint,
        event: Option<&UnidocEvent>,
    ) -> Result<(), ExecutionError> {
        let handler = handler_for(blueprint.blueprint_type());
        let mut output = BranchOutput::new(manager, command.branch);
        let mut cx = self.pass.handle(command, blueprint, &mut output);
        dispatch(handler, hook, &mut cx, event)
    }

    /// Turn the outcomes in the pass into commands.
    fn apply<T: Tracer>(
        &mut self,
        manager: &mut dyn BranchManager,
        round: &mut Round<'_>,
        site: Site,
        tracer: &mut T,
    ) {
        if self.pass.is_killed() {
            manager.terminate(site.branch);
            tracer.trace_terminate(site.branch, true);
            return;
        }

        for (i, outcome) in self.pass.take_outcomes().into_iter().enumerate() {
            let branch = if i == 0 {
                site.branch
            } else {
                let child = manager.fork(site.branch);
                tracer.trace_fork(site.branch, child);
                if round.delivered.contains(&site.branch) {
                    round.delivered.insert(child);
                }
                child
            };
            let command = match outcome {
                Outcome::Enter(state) => ExecutionEvent::enter(site.graph, state, branch),
                Outcome::Dive(state, blueprint) => {
                    ExecutionEvent::dive(site.graph, state, blueprint, branch)
                }
                Outcome::Success => ExecutionEvent::success(site.graph, site.state.clone(), branch),
                Outcome::Failure => ExecutionEvent::failure(site.graph, site.state.clone(), branch),
                Outcome::Skip => ExecutionEvent::skip(site.graph, site.state.clone(), branch),
            };
            self.queue.push_back(command);
        }
    }
}
