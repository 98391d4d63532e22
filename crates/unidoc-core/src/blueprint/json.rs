//! JSON deserialization for blueprint documents.
//!
//! Blueprints and predicates are internally tagged with a `type` field.

use serde::Deserialize;

use super::types::{Blueprint, BlueprintKind};
use super::validate::BlueprintError;
use crate::predicate::Predicate;

impl Blueprint {
    /// Parse and validate a blueprint from JSON.
    pub fn from_json(json: &str) -> Result<Self, BlueprintError> {
        let raw: RawBlueprint = serde_json::from_str(json)?;
        let blueprint = Blueprint::from(raw);
        blueprint.validate()?;
        Ok(blueprint)
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
#[allow(clippy::upper_case_acronyms, non_camel_case_types)]
enum RawBlueprint {
    EVENT {
        predicate: RawPredicate,
    },
    END,
    SEQUENCE {
        operands: Vec<RawBlueprint>,
    },
    SET {
        operands: Vec<RawBlueprint>,
    },
    LENIENT_SEQUENCE {
        operands: Vec<RawBlueprint>,
    },
    DISJUNCTION {
        operands: Vec<RawBlueprint>,
    },
    MANY {
        operand: Box<RawBlueprint>,
        #[serde(default)]
        minimum: u32,
        #[serde(default)]
        maximum: Option<u32>,
    },
    TAG {
        predicate: RawPredicate,
        content: Box<RawBlueprint>,
    },
    GROUP {
        label: String,
        operand: Box<RawBlueprint>,
    },
}

fn convert_all(raw: Vec<RawBlueprint>) -> Vec<Blueprint> {
    raw.into_iter().map(Into::into).collect()
}

impl From<RawBlueprint> for Blueprint {
    fn from(raw: RawBlueprint) -> Self {
        #[allow(clippy::boxed_local)]
        fn conv(content: Box<RawBlueprint>) -> Blueprint {
            Blueprint::from(*content)
        }

        let kind = match raw {
            RawBlueprint::EVENT { predicate } => BlueprintKind::Event(predicate.into()),
            RawBlueprint::END => BlueprintKind::End,
            RawBlueprint::SEQUENCE { operands } => BlueprintKind::Sequence(convert_all(operands)),
            RawBlueprint::SET { operands } => BlueprintKind::Set(convert_all(operands)),
            RawBlueprint::LENIENT_SEQUENCE { operands } => {
                BlueprintKind::LenientSequence(convert_all(operands))
            }
            RawBlueprint::DISJUNCTION { operands } => {
                BlueprintKind::Disjunction(convert_all(operands))
            }
            RawBlueprint::MANY {
                operand,
                minimum,
                maximum,
            } => BlueprintKind::Many {
                operand: conv(operand),
                minimum,
                maximum,
            },
            RawBlueprint::TAG { predicate, content } => BlueprintKind::Tag {
                predicate: predicate.into(),
                content: conv(content),
            },
            RawBlueprint::GROUP { label, operand } => BlueprintKind::Group {
                label,
                operand: conv(operand),
            },
        };
        Blueprint::new(kind)
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
#[allow(clippy::upper_case_acronyms, non_camel_case_types)]
enum RawPredicate {
    ANYTHING,
    TAG_START {
        #[serde(default)]
        tag: Option<String>,
    },
    TAG_END {
        #[serde(default)]
        tag: Option<String>,
    },
    WORD {
        #[serde(default)]
        text: Option<String>,
    },
    WHITESPACE,
    IDENTIFIER {
        identifier: String,
    },
    CLASS {
        class: String,
    },
    NOT {
        operand: Box<RawPredicate>,
    },
    ALL {
        operands: Vec<RawPredicate>,
    },
    ANY {
        operands: Vec<RawPredicate>,
    },
}

impl From<RawPredicate> for Predicate {
    fn from(raw: RawPredicate) -> Self {
        match raw {
            RawPredicate::ANYTHING => Predicate::Anything,
            RawPredicate::TAG_START { tag } => Predicate::TagStart(tag),
            RawPredicate::TAG_END { tag } => Predicate::TagEnd(tag),
            RawPredicate::WORD { text } => Predicate::Word(text),
            RawPredicate::WHITESPACE => Predicate::Whitespace,
            RawPredicate::IDENTIFIER { identifier } => Predicate::Identifier(identifier),
            RawPredicate::CLASS { class } => Predicate::Class(class),
            RawPredicate::NOT { operand } => Predicate::Not(Box::new((*operand).into())),
            RawPredicate::ALL { operands } => {
                Predicate::All(operands.into_iter().map(Into::into).collect())
            }
            RawPredicate::ANY { operands } => {
                Predicate::Any(operands.into_iter().map(Into::into).collect())
            }
        }
    }
}
