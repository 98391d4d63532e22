//! `TAG`: a tag-start, the content, then the matching tag-end.
//!
//! State: `[step u8][name utf16]`. Step 0 waits for the opening tag, step 1 is
//! the dive into the content and step 2 waits for the closing tag. The name
//! recorded at step 1 is the one the closing tag must repeat.

use unidoc_core::{
    Blueprint, BlueprintKind, BlueprintType, Predicate, State, UnidocEvent, ValidationMessage,
};

use super::{Handler, Hook, mismatch};
use crate::engine::error::ExecutionError;
use crate::engine::pass::ValidationContext;

const OPENING: u8 = 0;
const CONTENT: u8 = 1;
const CLOSING: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
struct TagState {
    step: u8,
    name: String,
}

impl TagState {
    fn decode(cx: &ValidationContext<'_>) -> Result<Self, ExecutionError> {
        let state = cx.state();
        let step = state.get_u8(0);
        if step > CLOSING || state.len() != 1 + state.string_size(1) {
            return Err(cx.malformed_state());
        }
        Ok(Self {
            step,
            name: state.get_string(1),
        })
    }

    fn encode(&self, cx: &ValidationContext<'_>) -> State {
        let mut state = cx.new_state();
        state.push_u8(self.step);
        state.push_string(&self.name);
        state
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TagHandler;

impl TagHandler {
    fn parts<'p>(
        &self,
        cx: &ValidationContext<'p>,
    ) -> Result<(&'p Predicate, &'p Blueprint), ExecutionError> {
        let blueprint = cx.blueprint();
        match blueprint.kind() {
            BlueprintKind::Tag { predicate, content } => Ok((predicate, content)),
            _ => Err(mismatch(self.kind(), blueprint)),
        }
    }

    /// The content finished, wait for the closing tag.
    fn close(&self, cx: &mut ValidationContext<'_>, hook: Hook) -> Result<(), ExecutionError> {
        self.parts(cx)?;
        let current = TagState::decode(cx)?;
        if current.step != CONTENT {
            return Err(cx.unexpected_hook(hook));
        }
        let state = TagState {
            step: CLOSING,
            name: current.name,
        }
        .encode(cx);
        cx.enter(state)
    }

    fn reject(cx: &mut ValidationContext<'_>, event: &UnidocEvent) -> Result<(), ExecutionError> {
        let blueprint = cx.blueprint();
        cx.output()
            .produce(ValidationMessage::unexpected_content(blueprint, event));
        cx.failure()
    }
}

impl Handler for TagHandler {
    fn kind(&self) -> BlueprintType {
        BlueprintType::Tag
    }

    fn on_start(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        self.parts(cx)?;
        let state = TagState {
            step: OPENING,
            name: String::new(),
        }
        .encode(cx);
        cx.enter(state)
    }

    fn on_event(
        &self,
        cx: &mut ValidationContext<'_>,
        event: &UnidocEvent,
    ) -> Result<(), ExecutionError> {
        let (predicate, content) = self.parts(cx)?;
        let current = TagState::decode(cx)?;
        match current.step {
            OPENING if event.is_tag_start() && predicate.matches(event) => {
                let state = TagState {
                    step: CONTENT,
                    name: event.tag.clone(),
                }
                .encode(cx);
                cx.dive(state, content)
            }
            CLOSING if event.is_tag_end() && event.tag == current.name => cx.success(),
            OPENING | CLOSING => Self::reject(cx, event),
            _ => Err(cx.unexpected_hook(Hook::Event)),
        }
    }

    fn on_completion(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        self.parts(cx)?;
        let current = TagState::decode(cx)?;
        if current.step == CONTENT {
            return Err(cx.unexpected_hook(Hook::Completion));
        }
        let blueprint = cx.blueprint();
        cx.output()
            .produce(ValidationMessage::required_content(blueprint));
        cx.failure()
    }

    fn on_success(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        self.close(cx, Hook::Success)
    }

    fn on_skip(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        self.close(cx, Hook::Skip)
    }

    fn on_failure(&self, cx: &mut ValidationContext<'_>) -> Result<(), ExecutionError> {
        let current = TagState::decode(cx)?;
        if current.step != CONTENT {
            return Err(cx.unexpected_hook(Hook::Failure));
        }
        cx.failure()
    }
}
