//! `SEQUENCE`: operands in declaration order.
//!
//! State: `[index u8][consumed u8]`, the operand being matched and whether an
//! earlier operand consumed content.

use unidoc_core::{Blueprint, BlueprintKind, BlueprintType, State};

use super::{Handler, mismatch, operand_index};
use crate::engine::error::ExecutionError;
use crate::engine::pass::ValidationContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SequenceState {
    index: usize,
    consumed: bool,
}

impl SequenceState {
    fn decode(cx: &ValidationContext<'_>, operands: usize) -> Result<Self, ExecutionError> {
        let state = cx.state();
        let index = state.get_u8(0) as usize;
        let consumed = state.get_u8(1);
        if state.len() != 2 || index >= operands || consumed > 1 {
            return Err(cx.malformed_state());
        }
        Ok(Self {
            index,
            consumed: consumed == 1,
        })
    }

    fn encode(self, cx: &ValidationContext<'_>) -> State {
        let mut state = cx.new_state();
        state.push_u8(operand_index(self.index));
        state.push_bool(self.consumed);
        state
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SequenceHandler;

impl SequenceHandler {
    fn operands<'p>(&self, cx: &ValidationContext<'p>) -> Result<&'p [Blueprint], ExecutionError> {
        let blueprint = cx.blueprint();
        match blueprint.kind() {
            BlueprintKind::Sequence(operands) => Ok(operands),
            _ => Err(mismatch(self.kind(), blueprint)),
        }
    }

    /// Operand `index` finished; move on or finish the sequence.
    fn advance(
        &self,
        cx: &mut ValidationContext<'_>,
        consumed_now: bool,
    ) -> Result<(), ExecutionError> {
        let operands = self.operands(cx)?;
        let current = SequenceState::decode(cx, operands.len())?;
        let consumed = current.consumed || consumed_now;

        let next = current.index + 1;
        if next == operands.len() {
            return if consumed { cx.success() } else { cx.skip() };
        }

        let state = SequenceState {
            index: next,
            consumed,
        }
        .encode(cx);
        cx.dive(state, &operands[next])
    }
}

impl Handler for SequenceHandler {
    fn kind(&self) -> BlueprintType {
        BlueprintType::Sequence
    }

    fn on_start(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        let operands = self.operands(cx)?;
        let Some(first) = operands.first() else {
            return cx.skip();
        };
        let state = SequenceState {
            index: 0,
            consumed: false,
        }
        .encode(cx);
        cx.dive(state, first)
    }

    fn on_success(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        self.advance(cx, true)
    }

    fn on_skip(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        self.advance(cx, false)
    }

    fn on_failure(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        let operands = self.operands(cx)?;
        SequenceState::decode(cx, operands.len())?;
        cx.failure()
    }
}
