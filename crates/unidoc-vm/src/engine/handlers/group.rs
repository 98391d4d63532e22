//! `GROUP`: brackets its operand's messages with begin/end group markers.
//!
//! State: `[0]`.

use unidoc_core::{Blueprint, BlueprintKind, BlueprintType};

use super::{Handler, mismatch};
use crate::engine::error::ExecutionError;
use crate::engine::pass::ValidationContext;

#[derive(Debug, Clone, Copy)]
pub struct GroupHandler;

impl GroupHandler {
    fn parts<'p>(
        &self,
        cx: &ValidationContext<'p>,
    ) -> Result<(&'p str, &'p Blueprint), ExecutionError> {
        let blueprint = cx.blueprint();
        match blueprint.kind() {
            BlueprintKind::Group { label, operand } => Ok((label.as_str(), operand)),
            _ => Err(mismatch(self.kind(), blueprint)),
        }
    }

    fn check_state(cx: &ValidationContext<'_>) -> Result<(), ExecutionError> {
        let state = cx.state();
        if state.len() == 1 && state.get_u8(0) == 0 {
            Ok(())
        } else {
            Err(cx.malformed_state())
        }
    }

    fn end(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        let (label, _) = self.parts(cx)?;
        Self::check_state(cx)?;
        cx.output().end_group(label);
        Ok(())
    }
}

impl Handler for GroupHandler {
    fn kind(&self) -> BlueprintType {
        BlueprintType::Group
    }

    fn on_start(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        let (label, operand) = self.parts(cx)?;
        cx.output().begin_group(label);
        let mut state = cx.new_state();
        state.push_u8(0);
        cx.dive(state, operand)
    }

    fn on_success(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        self.end(cx)?;
        cx.success()
    }

    fn on_skip(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        self.end(cx)?;
        cx.skip()
    }

    fn on_failure(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        Self::check_state(cx)?;
        cx.failure()
    }
}
