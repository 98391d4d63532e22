//! Validation messages and the event log they are recorded into.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::blueprint::Blueprint;
use crate::event::UnidocEvent;

pub const UNEXPECTED_CONTENT: &str = "standard:blueprint:failure:unexpected-content";
pub const UNNECESSARY_CONTENT: &str = "standard:blueprint:failure:unnecessary-content";
pub const REQUIRED_CONTENT: &str = "standard:blueprint:failure:required-content";
pub const PREFERRED_CONTENT: &str = "standard:blueprint:warning:preferred-content";

/// Severity of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    Verbose,
    Information,
    Warning,
    Error,
    Failure,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Verbose => "verbose",
            Self::Information => "information",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Failure => "failure",
        })
    }
}

/// A value attached to a message under a named key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageValue {
    Blueprint(Blueprint),
    Event(UnidocEvent),
    Text(String),
    Count(u64),
}

impl fmt::Display for MessageValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blueprint(blueprint) => write!(f, "{blueprint}"),
            Self::Event(event) => write!(f, "{event}"),
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Count(count) => write!(f, "{count}"),
        }
    }
}

impl From<Blueprint> for MessageValue {
    fn from(value: Blueprint) -> Self {
        Self::Blueprint(value)
    }
}

impl From<UnidocEvent> for MessageValue {
    fn from(value: UnidocEvent) -> Self {
        Self::Event(value)
    }
}

impl From<String> for MessageValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for MessageValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<u64> for MessageValue {
    fn from(value: u64) -> Self {
        Self::Count(value)
    }
}

/// A diagnostic produced on a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub message_type: MessageType,
    pub code: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub data: IndexMap<String, MessageValue>,
}

impl ValidationMessage {
    pub fn new(message_type: MessageType, code: impl Into<String>) -> Self {
        Self {
            message_type,
            code: code.into(),
            data: IndexMap::new(),
        }
    }

    /// Attach `value` under `key`, replacing a previous value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MessageValue>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&MessageValue> {
        self.data.get(key)
    }

    /// Received content did not match the expected blueprint.
    pub fn unexpected_content(blueprint: &Blueprint, event: &UnidocEvent) -> Self {
        Self::new(MessageType::Failure, UNEXPECTED_CONTENT)
            .with("blueprint", blueprint.clone())
            .with("event", event.clone())
    }

    /// Content arrived where nothing more was allowed.
    pub fn unnecessary_content(blueprint: &Blueprint, event: Option<&UnidocEvent>) -> Self {
        let message = Self::new(MessageType::Failure, UNNECESSARY_CONTENT)
            .with("blueprint", blueprint.clone());
        match event {
            Some(event) => message.with("event", event.clone()),
            None => message,
        }
    }

    /// The document ended while `blueprint` still required content.
    pub fn required_content(blueprint: &Blueprint) -> Self {
        Self::new(MessageType::Failure, REQUIRED_CONTENT).with("blueprint", blueprint.clone())
    }

    /// `blueprint` should have come before content that was already accepted.
    pub fn preferred_content(blueprint: &Blueprint) -> Self {
        Self::new(MessageType::Warning, PREFERRED_CONTENT).with("blueprint", blueprint.clone())
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.message_type, self.code)?;
        for (key, value) in &self.data {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}

/// Payload of a recorded validation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationEventKind {
    /// A document event was checked on the branch.
    Validation(UnidocEvent),
    /// The end of the document was checked on the branch.
    DocumentCompletion,
    Message(ValidationMessage),
    BeginGroup(String),
    EndGroup(String),
}

/// One entry of a branch's validation log.
///
/// `index` is monotonic within the log; `batch` counts the `Validation` and
/// `DocumentCompletion` entries seen so far, so entries sharing a batch were
/// produced while handling the same input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationEvent {
    pub index: u64,
    pub batch: u64,
    pub kind: ValidationEventKind,
}

impl ValidationEvent {
    pub fn message(&self) -> Option<&ValidationMessage> {
        match &self.kind {
            ValidationEventKind::Message(message) => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}] ", self.index, self.batch)?;
        match &self.kind {
            ValidationEventKind::Validation(event) => write!(f, "VALIDATION {event}"),
            ValidationEventKind::DocumentCompletion => write!(f, "DOCUMENT_COMPLETION"),
            ValidationEventKind::Message(message) => write!(f, "MESSAGE {message}"),
            ValidationEventKind::BeginGroup(label) => write!(f, "BEGIN_GROUP {label:?}"),
            ValidationEventKind::EndGroup(label) => write!(f, "END_GROUP {label:?}"),
        }
    }
}
