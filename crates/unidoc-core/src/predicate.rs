//! Event predicates used by `EVENT` and `TAG` blueprints.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::event::{UnidocEvent, UnidocEventKind};

/// A test over a single document event.
///
/// `None` payloads match any tag name or word text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Predicate {
    Anything,
    TagStart(Option<String>),
    TagEnd(Option<String>),
    Word(Option<String>),
    Whitespace,
    Identifier(String),
    Class(String),
    Not(Box<Predicate>),
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
}

impl Predicate {
    pub fn tag_start(tag: impl Into<String>) -> Self {
        Self::TagStart(Some(tag.into()))
    }

    pub fn tag_end(tag: impl Into<String>) -> Self {
        Self::TagEnd(Some(tag.into()))
    }

    pub fn word(text: impl Into<String>) -> Self {
        Self::Word(Some(text.into()))
    }

    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    pub fn matches(&self, event: &UnidocEvent) -> bool {
        match self {
            Self::Anything => true,
            Self::TagStart(tag) => {
                event.kind == UnidocEventKind::TagStart && name_matches(tag, &event.tag)
            }
            Self::TagEnd(tag) => {
                event.kind == UnidocEventKind::TagEnd && name_matches(tag, &event.tag)
            }
            Self::Word(text) => {
                event.kind == UnidocEventKind::Word && name_matches(text, &event.text)
            }
            Self::Whitespace => event.kind == UnidocEventKind::Whitespace,
            Self::Identifier(identifier) => event.identifier.as_deref() == Some(identifier),
            Self::Class(class) => event.has_class(class),
            Self::Not(inner) => !inner.matches(event),
            Self::All(all) => all.iter().all(|p| p.matches(event)),
            Self::Any(any) => any.iter().any(|p| p.matches(event)),
        }
    }
}

fn name_matches(expected: &Option<String>, actual: &str) -> bool {
    expected.as_deref().is_none_or(|name| name == actual)
}

fn write_list(f: &mut fmt::Formatter<'_>, name: &str, items: &[Predicate]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, ")")
}

fn write_optional(f: &mut fmt::Formatter<'_>, name: &str, value: &Option<String>) -> fmt::Result {
    match value {
        Some(value) => write!(f, "{name}({value:?})"),
        None => write!(f, "{name}()"),
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anything => write!(f, "anything()"),
            Self::TagStart(tag) => write_optional(f, "tagStart", tag),
            Self::TagEnd(tag) => write_optional(f, "tagEnd", tag),
            Self::Word(text) => write_optional(f, "word", text),
            Self::Whitespace => write!(f, "whitespace()"),
            Self::Identifier(identifier) => write!(f, "identifier({identifier:?})"),
            Self::Class(class) => write!(f, "class({class:?})"),
            Self::Not(inner) => write!(f, "not({inner})"),
            Self::All(all) => write_list(f, "all", all),
            Self::Any(any) => write_list(f, "any", any),
        }
    }
}
