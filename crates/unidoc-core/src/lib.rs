#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for Unidoc blueprint validation.
//!
//! - **Input**: [`UnidocEvent`]s, the structured events of a document
//! - **Grammar**: [`Blueprint`] trees built from [`Predicate`]s over events
//! - **Automaton positions**: [`State`], the byte-wise comparable frontier key
//! - **Output**: [`ValidationMessage`]s recorded as [`ValidationEvent`]s
//! - **Capabilities**: [`BranchManager`] and [`MessageProducer`], implemented
//!   by whoever owns branch identities

pub mod blueprint;
mod branch;
mod event;
mod message;
mod predicate;
mod state;

#[cfg(test)]
mod message_tests;

pub use blueprint::{Blueprint, BlueprintError, BlueprintKind, BlueprintType};
pub use branch::{BranchId, BranchManager, BranchOutput, DiscardOutput, MessageProducer};
pub use event::{UnidocEvent, UnidocEventKind};
pub use message::{
    MessageType, MessageValue, PREFERRED_CONTENT, REQUIRED_CONTENT, UNEXPECTED_CONTENT,
    UNNECESSARY_CONTENT, ValidationEvent, ValidationEventKind, ValidationMessage,
};
pub use predicate::Predicate;
pub use state::{DEFAULT_CAPACITY, ParseStateError, State, bitset_size};
