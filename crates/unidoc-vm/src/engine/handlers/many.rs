//! `MANY`: bounded repetition.
//!
//! State: `[consumed u8][count u32]`, whether an iteration consumed content
//! and how many iterations completed. Without a maximum the counter stops at
//! the minimum, so later iterations land on the same state and converge.

use unidoc_core::{Blueprint, BlueprintKind, BlueprintType, State, ValidationMessage};

use super::{Handler, mismatch};
use crate::engine::error::ExecutionError;
use crate::engine::pass::ValidationContext;

const STATE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ManyState {
    consumed: bool,
    count: u32,
}

impl ManyState {
    fn decode(cx: &ValidationContext<'_>) -> Result<Self, ExecutionError> {
        let state = cx.state();
        let consumed = state.get_u8(0);
        if state.len() != STATE_SIZE || consumed > 1 {
            return Err(cx.malformed_state());
        }
        Ok(Self {
            consumed: consumed == 1,
            count: state.get_u32(1),
        })
    }

    fn encode(self, cx: &ValidationContext<'_>) -> State {
        let mut state = cx.new_state();
        state.push_bool(self.consumed);
        state.push_u32(self.count);
        state
    }
}

struct Bounds<'p> {
    operand: &'p Blueprint,
    minimum: u32,
    maximum: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
pub struct ManyHandler;

impl ManyHandler {
    fn bounds<'p>(&self, cx: &ValidationContext<'p>) -> Result<Bounds<'p>, ExecutionError> {
        let blueprint = cx.blueprint();
        match blueprint.kind() {
            BlueprintKind::Many {
                operand,
                minimum,
                maximum,
            } => Ok(Bounds {
                operand,
                minimum: *minimum,
                maximum: *maximum,
            }),
            _ => Err(mismatch(self.kind(), blueprint)),
        }
    }
}

impl Handler for ManyHandler {
    fn kind(&self) -> BlueprintType {
        BlueprintType::Many
    }

    fn on_start(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        let bounds = self.bounds(cx)?;
        let state = ManyState {
            consumed: false,
            count: 0,
        }
        .encode(cx);
        cx.dive(state, bounds.operand)?;
        if bounds.minimum == 0 {
            cx.skip()?;
        }
        Ok(())
    }

    fn on_success(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        let bounds = self.bounds(cx)?;
        let current = ManyState::decode(cx)?;
        let next = current.count.saturating_add(1);

        if bounds.maximum.is_some_and(|maximum| next > maximum) {
            let blueprint = cx.blueprint();
            cx.output()
                .produce(ValidationMessage::unnecessary_content(blueprint, None));
            return cx.failure();
        }

        let count = match bounds.maximum {
            Some(_) => next,
            None => next.min(bounds.minimum),
        };
        let state = ManyState {
            consumed: true,
            count,
        }
        .encode(cx);
        cx.dive(state, bounds.operand)?;
        if next >= bounds.minimum {
            cx.success()?;
        }
        Ok(())
    }

    /// An iteration matched nothing. Repeating it would match nothing again,
    /// so the repetition ends here.
    fn on_skip(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        self.bounds(cx)?;
        let current = ManyState::decode(cx)?;
        if current.consumed {
            cx.success()
        } else {
            cx.skip()
        }
    }

    fn on_failure(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        ManyState::decode(cx)?;
        cx.failure()
    }
}
