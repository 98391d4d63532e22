//! Document events consumed by the validator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a document event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnidocEventKind {
    TagStart,
    TagEnd,
    Word,
    Whitespace,
}

/// One structured event of a document stream.
///
/// Tag events carry the tag name plus optional identifier and classes; word
/// and whitespace events carry their text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnidocEvent {
    /// Position of the event in its stream.
    #[serde(default)]
    pub index: u64,
    pub kind: UnidocEventKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
}

impl UnidocEvent {
    fn new(kind: UnidocEventKind) -> Self {
        Self {
            index: 0,
            kind,
            tag: String::new(),
            identifier: None,
            classes: Vec::new(),
            text: String::new(),
        }
    }

    pub fn tag_start(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::new(UnidocEventKind::TagStart)
        }
    }

    pub fn tag_end(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::new(UnidocEventKind::TagEnd)
        }
    }

    pub fn word(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::new(UnidocEventKind::Word)
        }
    }

    pub fn whitespace(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::new(UnidocEventKind::Whitespace)
        }
    }

    pub fn with_index(mut self, index: u64) -> Self {
        self.index = index;
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    #[inline]
    pub fn is_tag_start(&self) -> bool {
        self.kind == UnidocEventKind::TagStart
    }

    #[inline]
    pub fn is_tag_end(&self) -> bool {
        self.kind == UnidocEventKind::TagEnd
    }

    #[inline]
    pub fn is_tag(&self) -> bool {
        self.is_tag_start() || self.is_tag_end()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

impl fmt::Display for UnidocEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            UnidocEventKind::TagStart => {
                write!(f, "<{}", self.tag)?;
                if let Some(identifier) = &self.identifier {
                    write!(f, " #{identifier}")?;
                }
                for class in &self.classes {
                    write!(f, " .{class}")?;
                }
                write!(f, ">")
            }
            UnidocEventKind::TagEnd => write!(f, "</{}>", self.tag),
            UnidocEventKind::Word => write!(f, "word {:?}", self.text),
            UnidocEventKind::Whitespace => write!(f, "whitespace {:?}", self.text),
        }
    }
}
