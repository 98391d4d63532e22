//! `SET` and `LENIENT_SEQUENCE`: every operand exactly once, in any order.
//!
//! State: `[operand u8][consumed u8][bitset]`, one bit per operand. Padding
//! bits past the last operand must be clear.
//!
//! Each branch explores one order: when an operand completes, every operand
//! still missing is dived in parallel. Operands already done are never dived
//! again, so a repeated operand in the document fails in the branches that
//! wait for the missing ones. A completion for an operand already marked done
//! can only come from a foreign state and kills the branch.
//!
//! The lenient variant accepts the same orders but warns when an operand
//! completes before an earlier one.

use unidoc_core::{Blueprint, BlueprintKind, BlueprintType, State, ValidationMessage, bitset_size};

use super::{Handler, mismatch, operand_index};
use crate::engine::error::ExecutionError;
use crate::engine::pass::ValidationContext;

const BITSET_OFFSET: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
struct SetState {
    operand: usize,
    consumed: bool,
    /// One flag per operand.
    done: Vec<bool>,
}

impl SetState {
    fn initial(operand: usize, operands: usize) -> Self {
        Self {
            operand,
            consumed: false,
            done: vec![false; operands],
        }
    }

    fn decode(cx: &ValidationContext<'_>, operands: usize) -> Result<Self, ExecutionError> {
        let state = cx.state();
        let operand = state.get_u8(0) as usize;
        let consumed = state.get_u8(1);
        let size = bitset_size(operands);
        if state.len() != BITSET_OFFSET + size
            || operand >= operands
            || consumed > 1
            || (operands..size * 8).any(|bit| state.get_bit(BITSET_OFFSET, bit))
        {
            return Err(cx.malformed_state());
        }
        Ok(Self {
            operand,
            consumed: consumed == 1,
            done: (0..operands)
                .map(|bit| state.get_bit(BITSET_OFFSET, bit))
                .collect(),
        })
    }

    fn encode(&self, cx: &ValidationContext<'_>) -> State {
        let mut state = cx.new_state();
        state.push_u8(operand_index(self.operand));
        state.push_bool(self.consumed);
        let cursor = state.push_bitset(self.done.len());
        for (bit, &done) in self.done.iter().enumerate() {
            state.set_bit(cursor, bit, done);
        }
        state
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SetHandler {
    lenient: bool,
}

impl SetHandler {
    pub const fn set() -> Self {
        Self { lenient: false }
    }

    pub const fn lenient() -> Self {
        Self { lenient: true }
    }

    fn operands<'p>(&self, cx: &ValidationContext<'p>) -> Result<&'p [Blueprint], ExecutionError> {
        let blueprint = cx.blueprint();
        match (self.lenient, blueprint.kind()) {
            (false, BlueprintKind::Set(operands)) => Ok(operands),
            (true, BlueprintKind::LenientSequence(operands)) => Ok(operands),
            _ => Err(mismatch(self.kind(), blueprint)),
        }
    }

    fn complete(
        &self,
        cx: &mut ValidationContext<'_>,
        consumed_now: bool,
    ) -> Result<(), ExecutionError> {
        let operands = self.operands(cx)?;
        let current = SetState::decode(cx, operands.len())?;
        if current.done[current.operand] {
            return cx.kill();
        }

        let skipped = current.done[..current.operand]
            .iter()
            .position(|&done| !done);
        if let Some(first) = skipped.filter(|_| self.lenient) {
            cx.output()
                .produce(ValidationMessage::preferred_content(&operands[first]));
        }

        let mut next = current;
        next.done[next.operand] = true;
        next.consumed |= consumed_now;

        if next.done.iter().all(|&done| done) {
            return if next.consumed { cx.success() } else { cx.skip() };
        }

        for (operand, blueprint) in operands.iter().enumerate() {
            if next.done[operand] {
                continue;
            }
            next.operand = operand;
            let state = next.encode(cx);
            cx.dive(state, blueprint)?;
        }
        Ok(())
    }
}

impl Handler for SetHandler {
    fn kind(&self) -> BlueprintType {
        if self.lenient {
            BlueprintType::LenientSequence
        } else {
            BlueprintType::Set
        }
    }

    fn on_start(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        let operands = self.operands(cx)?;
        if operands.is_empty() {
            return cx.skip();
        }
        for (operand, blueprint) in operands.iter().enumerate() {
            let state = SetState::initial(operand, operands.len()).encode(cx);
            cx.dive(state, blueprint)?;
        }
        Ok(())
    }

    fn on_success(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        self.complete(cx, true)
    }

    fn on_skip(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        self.complete(cx, false)
    }

    fn on_failure(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        let operands = self.operands(cx)?;
        SetState::decode(cx, operands.len())?;
        cx.failure()
    }
}
