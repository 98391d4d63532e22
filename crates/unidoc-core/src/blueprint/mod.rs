//! Blueprints: the declarative grammar a document is validated against.
//!
//! This module provides the blueprint tree, builders for writing blueprints in
//! code, JSON loading, and a compact binary form.

mod binary;
pub mod builders;
mod json;
mod types;
mod validate;

#[cfg(test)]
mod binary_tests;
#[cfg(test)]
mod json_tests;
#[cfg(test)]
mod types_tests;

pub use types::{Blueprint, BlueprintKind, BlueprintType};
pub use validate::{BlueprintError, MAX_OPERANDS};
