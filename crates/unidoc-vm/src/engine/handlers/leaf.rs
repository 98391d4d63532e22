//! Handlers consuming a single event: `EVENT` and `END`.
//!
//! Both wait at the one-byte state `[00]`.

use unidoc_core::{BlueprintKind, BlueprintType, UnidocEvent, ValidationMessage};

use super::{Handler, mismatch};
use crate::engine::error::ExecutionError;
use crate::engine::pass::ValidationContext;

fn enter_waiting(cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
    let mut state = cx.new_state();
    state.push_u8(0);
    cx.enter(state)
}

fn check_waiting(cx: &ValidationContext<'_>) -> Result<(), ExecutionError> {
    let state = cx.state();
    if state.len() == 1 && state.get_u8(0) == 0 {
        Ok(())
    } else {
        Err(cx.malformed_state())
    }
}

/// Matches one event against the blueprint's predicate.
#[derive(Debug, Clone, Copy)]
pub struct EventHandler;

impl Handler for EventHandler {
    fn kind(&self) -> BlueprintType {
        BlueprintType::Event
    }

    fn on_start(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        enter_waiting(cx)
    }

    fn on_event(
        &self,
        cx: &mut ValidationContext<'_>,
        event: &UnidocEvent,
    ) -> Result<(), ExecutionError> {
        check_waiting(cx)?;
        let blueprint = cx.blueprint();
        let BlueprintKind::Event(predicate) = blueprint.kind() else {
            return Err(mismatch(self.kind(), blueprint));
        };

        if predicate.matches(event) {
            return cx.success();
        }
        cx.output()
            .produce(ValidationMessage::unexpected_content(blueprint, event));
        cx.failure()
    }

    fn on_completion(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        check_waiting(cx)?;
        let blueprint = cx.blueprint();
        cx.output()
            .produce(ValidationMessage::required_content(blueprint));
        cx.failure()
    }
}

/// Matches the end of the document.
#[derive(Debug, Clone, Copy)]
pub struct EndHandler;

impl Handler for EndHandler {
    fn kind(&self) -> BlueprintType {
        BlueprintType::End
    }

    fn on_start(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        enter_waiting(cx)
    }

    fn on_event(
        &self,
        cx: &mut ValidationContext<'_>,
        event: &UnidocEvent,
    ) -> Result<(), ExecutionError> {
        check_waiting(cx)?;
        let blueprint = cx.blueprint();
        cx.output()
            .produce(ValidationMessage::unnecessary_content(blueprint, Some(event)));
        cx.failure()
    }

    fn on_completion(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        check_waiting(cx)?;
        cx.success()
    }
}
