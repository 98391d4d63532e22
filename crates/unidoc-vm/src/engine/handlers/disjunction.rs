//! `DISJUNCTION`: any one operand. State: `[index u8]`.

use unidoc_core::{Blueprint, BlueprintKind, BlueprintType};

use super::{Handler, mismatch, operand_index};
use crate::engine::error::ExecutionError;
use crate::engine::pass::ValidationContext;

#[derive(Debug, Clone, Copy)]
pub struct DisjunctionHandler;

impl DisjunctionHandler {
    fn operands<'p>(&self, cx: &ValidationContext<'p>) -> Result<&'p [Blueprint], ExecutionError> {
        let blueprint = cx.blueprint();
        match blueprint.kind() {
            BlueprintKind::Disjunction(operands) => Ok(operands),
            _ => Err(mismatch(self.kind(), blueprint)),
        }
    }

    fn check_state(&self, cx: &ValidationContext<'_>) -> Result<(), ExecutionError> {
        let operands = self.operands(cx)?;
        let state = cx.state();
        if state.len() != 1 || state.get_u8(0) as usize >= operands.len() {
            return Err(cx.malformed_state());
        }
        Ok(())
    }
}

impl Handler for DisjunctionHandler {
    fn kind(&self) -> BlueprintType {
        BlueprintType::Disjunction
    }

    fn on_start(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        for (index, operand) in self.operands(cx)?.iter().enumerate() {
            let mut state = cx.new_state();
            state.push_u8(operand_index(index));
            cx.dive(state, operand)?;
        }
        Ok(())
    }

    fn on_success(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        self.check_state(cx)?;
        cx.success()
    }

    fn on_skip(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        self.check_state(cx)?;
        cx.skip()
    }

    fn on_failure(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        self.check_state(cx)?;
        cx.failure()
    }
}
