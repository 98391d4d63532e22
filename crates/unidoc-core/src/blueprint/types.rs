//! Blueprint type definitions.

use std::fmt;
use std::slice;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::predicate::Predicate;

/// Immutable, shareable grammar rule.
///
/// Cloning is cheap (reference counted). Equality is structural; use
/// [`Blueprint::ptr_eq`] to test identity of a shared instance.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Blueprint(Arc<BlueprintKind>);

/// Blueprint variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlueprintKind {
    /// One event matching the predicate.
    Event(Predicate),
    /// End of document.
    End,
    /// All operands, in order.
    Sequence(Vec<Blueprint>),
    /// All operands, each exactly once, in any order.
    Set(Vec<Blueprint>),
    /// Like `Set`, with a warning when operands come out of order.
    LenientSequence(Vec<Blueprint>),
    /// Any one of the operands.
    Disjunction(Vec<Blueprint>),
    /// Bounded repetition; `maximum: None` is unbounded.
    Many {
        operand: Blueprint,
        minimum: u32,
        maximum: Option<u32>,
    },
    /// A start tag matching `predicate`, `content`, then the same tag's end.
    Tag {
        predicate: Predicate,
        content: Blueprint,
    },
    /// Operand wrapped in a labelled message group.
    Group { label: String, operand: Blueprint },
}

/// Fieldless discriminant used for handler dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlueprintType {
    Event,
    End,
    Sequence,
    Set,
    LenientSequence,
    Disjunction,
    Many,
    Tag,
    Group,
}

impl BlueprintType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Event => "EVENT",
            Self::End => "END",
            Self::Sequence => "SEQUENCE",
            Self::Set => "SET",
            Self::LenientSequence => "LENIENT_SEQUENCE",
            Self::Disjunction => "DISJUNCTION",
            Self::Many => "MANY",
            Self::Tag => "TAG",
            Self::Group => "GROUP",
        }
    }
}

impl fmt::Display for BlueprintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Blueprint {
    pub fn new(kind: BlueprintKind) -> Self {
        Self(Arc::new(kind))
    }

    #[inline]
    pub fn kind(&self) -> &BlueprintKind {
        &self.0
    }

    pub fn blueprint_type(&self) -> BlueprintType {
        match self.kind() {
            BlueprintKind::Event(_) => BlueprintType::Event,
            BlueprintKind::End => BlueprintType::End,
            BlueprintKind::Sequence(_) => BlueprintType::Sequence,
            BlueprintKind::Set(_) => BlueprintType::Set,
            BlueprintKind::LenientSequence(_) => BlueprintType::LenientSequence,
            BlueprintKind::Disjunction(_) => BlueprintType::Disjunction,
            BlueprintKind::Many { .. } => BlueprintType::Many,
            BlueprintKind::Tag { .. } => BlueprintType::Tag,
            BlueprintKind::Group { .. } => BlueprintType::Group,
        }
    }

    /// True when both handles share the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Blueprint) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Direct children of this blueprint, in declaration order.
    pub fn operands(&self) -> &[Blueprint] {
        match self.kind() {
            BlueprintKind::Event(_) | BlueprintKind::End => &[],
            BlueprintKind::Sequence(ops)
            | BlueprintKind::Set(ops)
            | BlueprintKind::LenientSequence(ops)
            | BlueprintKind::Disjunction(ops) => ops,
            BlueprintKind::Many { operand, .. } | BlueprintKind::Group { operand, .. } => {
                slice::from_ref(operand)
            }
            BlueprintKind::Tag { content, .. } => slice::from_ref(content),
        }
    }

    /// Repeat between `minimum` and `maximum` times (inclusive).
    ///
    /// On a `Many` blueprint the bounds are replaced; anything else is wrapped.
    pub fn between(&self, minimum: u32, maximum: u32) -> Blueprint {
        self.with_bounds(minimum, Some(maximum))
    }

    /// Repeat at least `minimum` times.
    pub fn at_least(&self, minimum: u32) -> Blueprint {
        self.with_bounds(minimum, None)
    }

    /// Zero or one occurrence.
    pub fn optional(&self) -> Blueprint {
        self.with_bounds(0, Some(1))
    }

    fn with_bounds(&self, minimum: u32, maximum: Option<u32>) -> Blueprint {
        let operand = match self.kind() {
            BlueprintKind::Many { operand, .. } => operand.clone(),
            _ => self.clone(),
        };
        Blueprint::new(BlueprintKind::Many {
            operand,
            minimum,
            maximum,
        })
    }
}

impl From<BlueprintKind> for Blueprint {
    fn from(kind: BlueprintKind) -> Self {
        Self::new(kind)
    }
}

fn write_operands(f: &mut fmt::Formatter<'_>, name: &str, operands: &[Blueprint]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{operand}")?;
    }
    write!(f, ")")
}

/// Renders the builder notation, e.g. `sequence(tagStart("a"), end())`.
impl fmt::Display for Blueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            BlueprintKind::Event(predicate) => write!(f, "{predicate}"),
            BlueprintKind::End => write!(f, "end()"),
            BlueprintKind::Sequence(ops) => write_operands(f, "sequence", ops),
            BlueprintKind::Set(ops) => write_operands(f, "set", ops),
            BlueprintKind::LenientSequence(ops) => write_operands(f, "lenientSequence", ops),
            BlueprintKind::Disjunction(ops) => write_operands(f, "disjunction", ops),
            BlueprintKind::Many {
                operand,
                minimum,
                maximum,
            } => match (minimum, maximum) {
                (0, None) => write!(f, "many({operand})"),
                (min, None) => write!(f, "many({operand}).atLeast({min})"),
                (min, Some(max)) => write!(f, "many({operand}).between({min}, {max})"),
            },
            BlueprintKind::Tag { predicate, content } => write!(f, "tag({predicate}, {content})"),
            BlueprintKind::Group { label, operand } => write!(f, "group({label:?}, {operand})"),
        }
    }
}

impl fmt::Debug for Blueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blueprint({self})")
    }
}
