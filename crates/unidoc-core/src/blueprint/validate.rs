//! Structural checks run before a blueprint reaches the automaton.

use super::types::{Blueprint, BlueprintKind, BlueprintType};

/// Largest operand count addressable by a one-byte state index.
pub const MAX_OPERANDS: usize = u8::MAX as usize;

/// Error raised while loading or validating a blueprint.
#[derive(Debug, thiserror::Error)]
pub enum BlueprintError {
    #[error("{kind} has {count} operands, at most {MAX_OPERANDS} are supported")]
    TooManyOperands { kind: BlueprintType, count: usize },

    #[error("disjunction without operands can never match")]
    EmptyDisjunction,

    #[error("repetition bounds {minimum}..={maximum} are empty")]
    InvalidBounds { minimum: u32, maximum: u32 },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("binary decode error: {0}")]
    Binary(postcard::Error),
}

impl Blueprint {
    /// Check every node of the tree.
    pub fn validate(&self) -> Result<(), BlueprintError> {
        let mut stack = vec![self];
        while let Some(blueprint) = stack.pop() {
            check_node(blueprint)?;
            stack.extend(blueprint.operands());
        }
        Ok(())
    }
}

fn check_node(blueprint: &Blueprint) -> Result<(), BlueprintError> {
    let count = blueprint.operands().len();
    if count > MAX_OPERANDS {
        return Err(BlueprintError::TooManyOperands {
            kind: blueprint.blueprint_type(),
            count,
        });
    }

    match blueprint.kind() {
        BlueprintKind::Disjunction(ops) if ops.is_empty() => Err(BlueprintError::EmptyDisjunction),
        BlueprintKind::Many {
            minimum,
            maximum: Some(maximum),
            ..
        } if maximum < minimum => Err(BlueprintError::InvalidBounds {
            minimum: *minimum,
            maximum: *maximum,
        }),
        _ => Ok(()),
    }
}
