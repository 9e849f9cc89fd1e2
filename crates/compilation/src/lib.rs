//! Compilation outcome types for Avatar.
//!
//! This crate describes what a compiler run produced: a success flag, the
//! diagnostics it emitted, and the files it generated. It does not run a
//! compiler; the values are supplied by whatever toolchain the caller drives.
//!
//! ## Architectural Layer
//!
//! **Domain types.** This crate has no I/O dependencies. Reading reports from
//! disk and rendering them for humans lives in the `cli` crate.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`ArtifactPath`, `DiagnosticCode`) |
//! | [`types`] | Collaborator value types (`Diagnostic`, `GeneratedFile`, etc.) |
//! | [`result`] | The `CompilationResult` value object and its summary |
//! | [`errors`] | Validation error types |

pub mod errors;
pub mod identifiers;
pub mod result;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{Argument, CompilationError, Violation};
pub use identifiers::{ArtifactPath, DiagnosticCode};
pub use result::{CompilationResult, CompilationSummary};
pub use types::{Diagnostic, DiagnosticSeverity, FileKind, GeneratedFile, SourcePosition};
