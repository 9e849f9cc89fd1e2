//! The [`CompilationResult`] value object.
//!
//! A result is an immutable snapshot of one compilation: whether it
//! succeeded, what the compiler said, and which files it wrote. It is built
//! once, either from already-typed collections ([`CompilationResult::new`]) or
//! from collections whose presence is not yet known
//! ([`CompilationResult::create`]), and never changes afterwards.
//!
//! ## Serialised form
//!
//! ```json
//! { "success": false,
//!   "diagnostics": [ { "severity": "error", "message": "..." } ],
//!   "generated_files": [ { "path": "gen/Foo.java", "kind": "source" } ] }
//! ```
//!
//! Deserialisation runs through [`CompilationResult::create`], so a report
//! with a `null` collection or element is rejected with the same
//! [`CompilationError`] a caller would get in-process.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    Argument, ArtifactPath, CompilationError, Diagnostic, DiagnosticSeverity, GeneratedFile,
};

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// The outcome of compiling one or more source files.
///
/// Two results are equal (and hash identically) iff their success flag,
/// diagnostics, and generated files are equal, element by element and in
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCompilationResult")]
pub struct CompilationResult {
    success: bool,
    diagnostics: Vec<Diagnostic>,
    generated_files: Vec<GeneratedFile>,
}

/// Unvalidated wire form: collections and their elements may be `null`.
#[derive(Deserialize)]
struct RawCompilationResult {
    success: bool,
    #[serde(default)]
    diagnostics: Option<Vec<Option<Diagnostic>>>,
    #[serde(default)]
    generated_files: Option<Vec<Option<GeneratedFile>>>,
}

impl TryFrom<RawCompilationResult> for CompilationResult {
    type Error = CompilationError;

    fn try_from(raw: RawCompilationResult) -> Result<Self, Self::Error> {
        Self::create(raw.success, raw.diagnostics, raw.generated_files)
    }
}

impl CompilationResult {
    /// Creates a result from collections that are already known to be present
    /// and free of absent elements.
    pub fn new(
        success: bool,
        diagnostics: Vec<Diagnostic>,
        generated_files: Vec<GeneratedFile>,
    ) -> Self {
        trace!(
            success,
            diagnostics = diagnostics.len(),
            generated_files = generated_files.len(),
            "compilation result created"
        );
        Self {
            success,
            diagnostics,
            generated_files,
        }
    }

    /// Creates a result, validating that neither collection is absent and
    /// that neither contains an absent element.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// `diagnostics` absent, `generated_files` absent, an absent element in
    /// `diagnostics`, an absent element in `generated_files`.
    ///
    /// # Errors
    ///
    /// Returns [`CompilationError::InvalidArgument`] naming the offending
    /// [`Argument`] and the broken rule.
    pub fn create<D, G>(
        success: bool,
        diagnostics: Option<D>,
        generated_files: Option<G>,
    ) -> Result<Self, CompilationError>
    where
        D: IntoIterator<Item = Option<Diagnostic>>,
        G: IntoIterator<Item = Option<GeneratedFile>>,
    {
        let validated = validate(success, diagnostics, generated_files);
        if let Err(err) = &validated {
            debug!(argument = %err.argument(), error = %err, "rejected compilation result");
        }
        validated
    }

    /// Returns `true` if compilation completed without a fatal error.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Returns `true` if compilation did not succeed.
    pub fn is_failure(&self) -> bool {
        !self.success
    }

    /// Returns the diagnostics emitted during compilation, in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns the files generated by compilation, in the order reported.
    pub fn generated_files(&self) -> &[GeneratedFile] {
        &self.generated_files
    }

    /// Iterates over the diagnostics with exactly the given severity.
    pub fn diagnostics_with_severity(
        &self,
        severity: DiagnosticSeverity,
    ) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity == severity)
    }

    /// Iterates over error diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics_with_severity(DiagnosticSeverity::Error)
    }

    /// Iterates over warnings, mandatory warnings included.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics.iter().filter(|d| d.severity.is_warning())
    }

    /// Returns `true` if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Looks up a generated file by its path.
    pub fn generated_file(&self, path: &ArtifactPath) -> Option<&GeneratedFile> {
        self.generated_files.iter().find(|f| &f.path == path)
    }

    /// Counts diagnostics by severity and generated files.
    pub fn summary(&self) -> CompilationSummary {
        let mut summary = CompilationSummary {
            success: self.success,
            generated_files: self.generated_files.len(),
            ..CompilationSummary::default()
        };
        for diagnostic in &self.diagnostics {
            match diagnostic.severity {
                DiagnosticSeverity::Error => summary.errors += 1,
                DiagnosticSeverity::Warning | DiagnosticSeverity::MandatoryWarning => {
                    summary.warnings += 1
                }
                DiagnosticSeverity::Note => summary.notes += 1,
                DiagnosticSeverity::Other => summary.others += 1,
            }
        }
        summary
    }
}

fn validate<D, G>(
    success: bool,
    diagnostics: Option<D>,
    generated_files: Option<G>,
) -> Result<CompilationResult, CompilationError>
where
    D: IntoIterator<Item = Option<Diagnostic>>,
    G: IntoIterator<Item = Option<GeneratedFile>>,
{
    let Some(diagnostics) = diagnostics else {
        return Err(CompilationError::null(Argument::Diagnostics));
    };
    let Some(generated_files) = generated_files else {
        return Err(CompilationError::null(Argument::GeneratedFiles));
    };

    let diagnostics = collect_present(Argument::Diagnostics, diagnostics)?;
    let generated_files = collect_present(Argument::GeneratedFiles, generated_files)?;

    Ok(CompilationResult::new(success, diagnostics, generated_files))
}

/// Collects `items`, failing on the first absent element.
fn collect_present<T>(
    argument: Argument,
    items: impl IntoIterator<Item = Option<T>>,
) -> Result<Vec<T>, CompilationError> {
    let mut present = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        match item {
            Some(item) => present.push(item),
            None => return Err(CompilationError::null_element(argument, index)),
        }
    }
    Ok(present)
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Per-severity counts for a [`CompilationResult`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationSummary {
    /// Copy of [`CompilationResult::success`].
    pub success: bool,
    /// Number of [`DiagnosticSeverity::Error`] diagnostics.
    pub errors: usize,
    /// Number of warnings, mandatory warnings included.
    pub warnings: usize,
    /// Number of [`DiagnosticSeverity::Note`] diagnostics.
    pub notes: usize,
    /// Number of [`DiagnosticSeverity::Other`] diagnostics.
    pub others: usize,
    /// Number of generated files.
    pub generated_files: usize,
}

impl std::fmt::Display for CompilationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.success { "succeeded" } else { "failed" };
        write!(
            f,
            "compilation {status}: {}, {}, {}",
            plural(self.errors, "error"),
            plural(self.warnings, "warning"),
            plural(self.notes, "note"),
        )?;
        if self.others > 0 {
            write!(f, ", {} other", self.others)?;
        }
        write!(f, "; {} generated", plural(self.generated_files, "file"))
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
