//! Instrumentation hooks for the executor.
//!
//! The tracer is a zero-cost abstraction: with [`NoopTracer`] every hook is an
//! `#[inline(always)]` empty function and the calls disappear. [`PrintTracer`]
//! collects a human-readable log for tests and debugging, and [`LogTracer`]
//! forwards the same information to the `tracing` ecosystem.

use unidoc_core::BranchId;

use super::execution::ExecutionEvent;

/// Verbosity level for [`PrintTracer`] output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Commands and branch lifecycle. Dive targets are not rendered.
    #[default]
    Default,
    /// Adds dive targets and the leaves handed back to the caller.
    Verbose,
    /// Adds garbage collection.
    VeryVerbose,
}

/// Executor instrumentation.
///
/// Each method is called at a specific point during execution:
/// - `trace_command` - before dispatching a command from the work list
/// - `trace_fork` - after a handler outcome got its own branch
/// - `trace_merge` - when two branches reached the same position
/// - `trace_await` - when a leaf is handed back to the caller
/// - `trace_accept` - when the root graph matched
/// - `trace_terminate` - when a branch is dropped, `killed` for silent drops
/// - `trace_sweep` - after the end-of-drain collection
pub trait Tracer {
    fn trace_command(&mut self, command: &ExecutionEvent);

    fn trace_fork(&mut self, parent: BranchId, child: BranchId);

    fn trace_merge(&mut self, survivor: BranchId, absorbed: BranchId);

    fn trace_await(&mut self, command: &ExecutionEvent);

    fn trace_accept(&mut self, branch: BranchId);

    fn trace_terminate(&mut self, branch: BranchId, killed: bool);

    fn trace_sweep(&mut self, removed: usize);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_command(&mut self, _command: &ExecutionEvent) {}

    #[inline(always)]
    fn trace_fork(&mut self, _parent: BranchId, _child: BranchId) {}

    #[inline(always)]
    fn trace_merge(&mut self, _survivor: BranchId, _absorbed: BranchId) {}

    #[inline(always)]
    fn trace_await(&mut self, _command: &ExecutionEvent) {}

    #[inline(always)]
    fn trace_accept(&mut self, _branch: BranchId) {}

    #[inline(always)]
    fn trace_terminate(&mut self, _branch: BranchId, _killed: bool) {}

    #[inline(always)]
    fn trace_sweep(&mut self, _removed: usize) {}
}

/// Tracer that collects an execution log.
#[derive(Debug, Default)]
pub struct PrintTracer {
    verbosity: Verbosity,
    lines: Vec<String>,
}

impl PrintTracer {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            lines: Vec::new(),
        }
    }

    /// Collected lines, oldest first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Collected lines joined with newlines.
    pub fn dump(&self) -> String {
        self.lines.join("\n")
    }

    /// Print all trace lines.
    pub fn print(&self) {
        for line in &self.lines {
            println!("{}", line);
        }
    }

    fn add_subline(&mut self, content: String) {
        self.lines.push(format!("    {content}"));
    }
}

impl Tracer for PrintTracer {
    fn trace_command(&mut self, command: &ExecutionEvent) {
        let line = if self.verbosity == Verbosity::Default {
            format!(
                "{} {} {}[{}]",
                command.kind, command.branch, command.graph, command.state
            )
        } else {
            command.to_string()
        };
        self.lines.push(line);
    }

    fn trace_fork(&mut self, parent: BranchId, child: BranchId) {
        self.add_subline(format!("fork {parent} -> {child}"));
    }

    fn trace_merge(&mut self, survivor: BranchId, absorbed: BranchId) {
        self.add_subline(format!("merge {absorbed} into {survivor}"));
    }

    fn trace_await(&mut self, command: &ExecutionEvent) {
        if self.verbosity == Verbosity::Default {
            return;
        }
        self.add_subline(format!(
            "await {} {}[{}]",
            command.branch, command.graph, command.state
        ));
    }

    fn trace_accept(&mut self, branch: BranchId) {
        self.add_subline(format!("accept {branch}"));
    }

    fn trace_terminate(&mut self, branch: BranchId, killed: bool) {
        let verb = if killed { "kill" } else { "terminate" };
        self.add_subline(format!("{verb} {branch}"));
    }

    fn trace_sweep(&mut self, removed: usize) {
        if self.verbosity != Verbosity::VeryVerbose || removed == 0 {
            return;
        }
        self.lines.push(format!("sweep {removed}"));
    }
}

/// Tracer forwarding to `tracing`: commands at trace level, branch lifecycle
/// at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn trace_command(&mut self, command: &ExecutionEvent) {
        tracing::trace!(
            kind = %command.kind,
            branch = %command.branch,
            graph = %command.graph,
            state = %command.state,
            "dispatch"
        );
    }

    fn trace_fork(&mut self, parent: BranchId, child: BranchId) {
        tracing::debug!(%parent, %child, "fork");
    }

    fn trace_merge(&mut self, survivor: BranchId, absorbed: BranchId) {
        tracing::debug!(%survivor, %absorbed, "merge");
    }

    fn trace_await(&mut self, command: &ExecutionEvent) {
        tracing::trace!(
            branch = %command.branch,
            graph = %command.graph,
            state = %command.state,
            "await"
        );
    }

    fn trace_accept(&mut self, branch: BranchId) {
        tracing::debug!(%branch, "accept");
    }

    fn trace_terminate(&mut self, branch: BranchId, killed: bool) {
        tracing::debug!(%branch, killed, "terminate");
    }

    fn trace_sweep(&mut self, removed: usize) {
        if removed > 0 {
            tracing::trace!(removed, "sweep");
        }
    }
}
