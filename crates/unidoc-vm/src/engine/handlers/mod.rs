//! Per-kind transition handlers.
//!
//! Handlers are stateless: everything they remember lives in the binary
//! [`State`](unidoc_core::State) of the position they are called for. Each
//! handler owns one state layout, validates it on every call and reports a
//! foreign layout as `MalformedState`.

use std::fmt;

use unidoc_core::{Blueprint, BlueprintType, UnidocEvent};

use super::error::ExecutionError;
use super::pass::ValidationContext;

mod disjunction;
mod group;
mod leaf;
mod many;
mod sequence;
mod set;
mod tag;

pub use disjunction::DisjunctionHandler;
pub use group::GroupHandler;
pub use leaf::{EndHandler, EventHandler};
pub use many::ManyHandler;
pub use sequence::SequenceHandler;
pub use set::SetHandler;
pub use tag::TagHandler;

/// Entry point of a handler, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    Start,
    Enter,
    Event,
    Completion,
    Success,
    Failure,
    Skip,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "on_start",
            Self::Enter => "on_enter",
            Self::Event => "on_event",
            Self::Completion => "on_completion",
            Self::Success => "on_success",
            Self::Failure => "on_failure",
            Self::Skip => "on_skip",
        })
    }
}

/// Transition logic of one blueprint kind.
///
/// `on_start` runs with an empty state. The other hooks run with the state
/// the handler itself entered or dived with. Bubbling hooks (`on_success`,
/// `on_failure`, `on_skip`) receive the state of the position whose subgraph
/// finished.
pub trait Handler: Sync {
    fn kind(&self) -> BlueprintType;

    fn on_start(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError>;

    /// A new position was entered. No outcome means it waits for an event.
    fn on_enter(&self, _cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        Ok(())
    }

    fn on_event(
        &self,
        cx: &mut ValidationContext<'_>,
        _event: &UnidocEvent,
    ) -> Result<(), ExecutionError> {
        Err(cx.unexpected_hook(Hook::Event))
    }

    fn on_completion(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        Err(cx.unexpected_hook(Hook::Completion))
    }

    fn on_success(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        Err(cx.unexpected_hook(Hook::Success))
    }

    /// A failing child fails the parent unless a handler says otherwise.
    fn on_failure(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        cx.failure()
    }

    fn on_skip(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        Err(cx.unexpected_hook(Hook::Skip))
    }
}

const SET: SetHandler = SetHandler::set();
const LENIENT_SEQUENCE: SetHandler = SetHandler::lenient();

/// Handler for blueprints of `kind`.
pub fn handler_for(kind: BlueprintType) -> &'static dyn Handler {
    match kind {
        BlueprintType::Event => &EventHandler,
        BlueprintType::End => &EndHandler,
        BlueprintType::Sequence => &SequenceHandler,
        BlueprintType::Set => &SET,
        BlueprintType::LenientSequence => &LENIENT_SEQUENCE,
        BlueprintType::Disjunction => &DisjunctionHandler,
        BlueprintType::Many => &ManyHandler,
        BlueprintType::Tag => &TagHandler,
        BlueprintType::Group => &GroupHandler,
    }
}

/// Run `hook` of `handler` on `cx`.
pub fn dispatch(
    handler: &dyn Handler,
    hook: Hook,
    cx: &mut ValidationContext<'_>,
    event: Option<&UnidocEvent>,
) -> Result<(), ExecutionError> {
    match (hook, event) {
        (Hook::Start, _) => handler.on_start(cx),
        (Hook::Enter, _) => handler.on_enter(cx),
        (Hook::Event, Some(event)) => handler.on_event(cx, event),
        (Hook::Event, None) => Err(cx.unexpected_hook(Hook::Event)),
        (Hook::Completion, _) => handler.on_completion(cx),
        (Hook::Success, _) => handler.on_success(cx),
        (Hook::Failure, _) => handler.on_failure(cx),
        (Hook::Skip, _) => handler.on_skip(cx),
    }
}

fn mismatch(handler: BlueprintType, blueprint: &Blueprint) -> ExecutionError {
    ExecutionError::HandlerMismatch {
        handler,
        blueprint: blueprint.blueprint_type(),
    }
}

/// Operand index stored in a one-byte slot.
fn operand_index(index: usize) -> u8 {
    // `Executor::start` validates blueprints, capping operand lists at u8::MAX.
    index as u8
}
