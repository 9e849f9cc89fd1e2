//! Validation error types for constructing a [`crate::CompilationResult`].
//!
//! There is a single failure kind, [`CompilationError::InvalidArgument`],
//! parameterised by which argument was at fault ([`Argument`]) and which rule
//! it broke ([`Violation`]). Validation is eager: every error is produced at
//! construction time, never later from an accessor.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error parameters
// ---------------------------------------------------------------------------

/// The collection argument of [`crate::CompilationResult::create`] that
/// failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Argument {
    /// The `diagnostics` collection.
    Diagnostics,
    /// The `generated_files` collection.
    GeneratedFiles,
}

impl Argument {
    /// Returns the argument name as it appears in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Diagnostics => "diagnostics",
            Self::GeneratedFiles => "generated_files",
        }
    }
}

impl std::fmt::Display for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The rule an [`Argument`] broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    /// The collection itself was absent.
    Null,
    /// The collection held an absent element.
    NullElement {
        /// Position of the first absent element.
        index: usize,
    },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("cannot be null"),
            Self::NullElement { index } => write!(f, "cannot contain null (element {index})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while constructing a [`crate::CompilationResult`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CompilationError {
    /// An input collection was absent or contained an absent element.
    ///
    /// Produced by: [`crate::CompilationResult::create`] and deserialisation
    /// of a [`crate::CompilationResult`].
    #[error("Argument '{argument}' {violation}")]
    InvalidArgument {
        /// Which argument was rejected.
        argument: Argument,
        /// Which rule it broke.
        violation: Violation,
    },
}

impl CompilationError {
    /// Shorthand for an [`Argument`] that was absent.
    pub fn null(argument: Argument) -> Self {
        Self::InvalidArgument {
            argument,
            violation: Violation::Null,
        }
    }

    /// Shorthand for an [`Argument`] holding an absent element at `index`.
    pub fn null_element(argument: Argument, index: usize) -> Self {
        Self::InvalidArgument {
            argument,
            violation: Violation::NullElement { index },
        }
    }

    /// Returns the argument that failed validation.
    pub fn argument(&self) -> Argument {
        match self {
            Self::InvalidArgument { argument, .. } => *argument,
        }
    }
}
