//! Free-function builders for composing blueprints in code.
//!
//! ```
//! use unidoc_core::blueprint::builders::*;
//!
//! let article = sequence([tag("h1", many(word_any())), end()]);
//! assert_eq!(article.to_string(), r#"sequence(tag(tagStart("h1"), many(word())), end())"#);
//! ```

use super::types::{Blueprint, BlueprintKind};
use crate::predicate::Predicate;

pub fn event(predicate: Predicate) -> Blueprint {
    Blueprint::new(BlueprintKind::Event(predicate))
}

pub fn tag_start(tag: impl Into<String>) -> Blueprint {
    event(Predicate::tag_start(tag))
}

pub fn tag_end(tag: impl Into<String>) -> Blueprint {
    event(Predicate::tag_end(tag))
}

pub fn word(text: impl Into<String>) -> Blueprint {
    event(Predicate::word(text))
}

/// Any single word.
pub fn word_any() -> Blueprint {
    event(Predicate::Word(None))
}

pub fn whitespace() -> Blueprint {
    event(Predicate::Whitespace)
}

pub fn anything() -> Blueprint {
    event(Predicate::Anything)
}

pub fn end() -> Blueprint {
    Blueprint::new(BlueprintKind::End)
}

pub fn sequence(operands: impl IntoIterator<Item = Blueprint>) -> Blueprint {
    Blueprint::new(BlueprintKind::Sequence(operands.into_iter().collect()))
}

pub fn set(operands: impl IntoIterator<Item = Blueprint>) -> Blueprint {
    Blueprint::new(BlueprintKind::Set(operands.into_iter().collect()))
}

pub fn lenient_sequence(operands: impl IntoIterator<Item = Blueprint>) -> Blueprint {
    Blueprint::new(BlueprintKind::LenientSequence(operands.into_iter().collect()))
}

pub fn disjunction(operands: impl IntoIterator<Item = Blueprint>) -> Blueprint {
    Blueprint::new(BlueprintKind::Disjunction(operands.into_iter().collect()))
}

/// Zero or more repetitions; narrow with `.between()` / `.at_least()`.
pub fn many(operand: Blueprint) -> Blueprint {
    Blueprint::new(BlueprintKind::Many {
        operand,
        minimum: 0,
        maximum: None,
    })
}

/// `<name>` content `</name>`.
pub fn tag(name: impl Into<String>, content: Blueprint) -> Blueprint {
    tag_matching(Predicate::tag_start(name), content)
}

/// A tag whose start event satisfies `predicate`; the end must close the same tag.
pub fn tag_matching(predicate: Predicate, content: Blueprint) -> Blueprint {
    Blueprint::new(BlueprintKind::Tag { predicate, content })
}

pub fn group(label: impl Into<String>, operand: Blueprint) -> Blueprint {
    Blueprint::new(BlueprintKind::Group {
        label: label.into(),
        operand,
    })
}
