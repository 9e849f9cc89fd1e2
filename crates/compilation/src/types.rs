//! Value types carried by a [`crate::CompilationResult`].
//!
//! These are the collaborator types a compiler toolchain hands back: the
//! messages it emitted ([`Diagnostic`]) and the files it wrote
//! ([`GeneratedFile`]). Both have structural equality and hashing so that a
//! result containing them can itself be hashed.

use serde::{Deserialize, Serialize};

use crate::{ArtifactPath, DiagnosticCode};

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// The kind of message a compiler emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticSeverity {
    /// A problem that prevents normal completion of compilation.
    Error,
    /// A problem the language rules require the compiler to report.
    MandatoryWarning,
    /// A problem that does not prevent compilation from completing.
    Warning,
    /// Informative message.
    Note,
    /// Any message that fits none of the other kinds.
    Other,
}

impl DiagnosticSeverity {
    /// Returns `true` for [`Self::Warning`] and [`Self::MandatoryWarning`].
    pub fn is_warning(self) -> bool {
        matches!(self, Self::Warning | Self::MandatoryWarning)
    }
}

impl std::fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Error => "error",
            Self::MandatoryWarning => "mandatory warning",
            Self::Warning => "warning",
            Self::Note => "note",
            Self::Other => "other",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------

/// A 1-based line/column location within a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct SourcePosition {
    line: u32,
    column: u32,
}

#[derive(Deserialize)]
struct RawPosition {
    line: u32,
    column: u32,
}

impl SourcePosition {
    /// Creates a [`SourcePosition`], returning `None` if either coordinate is zero.
    #[must_use]
    pub fn new(line: u32, column: u32) -> Option<Self> {
        if line == 0 || column == 0 {
            None
        } else {
            Some(Self { line, column })
        }
    }

    /// Returns the 1-based line number.
    pub fn line(self) -> u32 {
        self.line
    }

    /// Returns the 1-based column number.
    pub fn column(self) -> u32 {
        self.column
    }
}

impl TryFrom<RawPosition> for SourcePosition {
    type Error = String;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        let RawPosition { line, column } = raw;
        Self::new(line, column)
            .ok_or_else(|| format!("source position {line}:{column} is not 1-based"))
    }
}

impl std::fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

// ---------------------------------------------------------------------------

/// A message emitted by a compiler, tied to a severity and (optionally) a
/// location in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Kind of message.
    pub severity: DiagnosticSeverity,

    /// Source file the message relates to.
    ///
    /// `None` for messages that are not file-specific (e.g. a bad compiler flag).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ArtifactPath>,

    /// Location within `source`. `None` when the message applies to the whole file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<SourcePosition>,

    /// Compiler-specific message key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<DiagnosticCode>,

    /// Human-readable message text.
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic with no source location or code.
    pub fn new(severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            source: None,
            position: None,
            code: None,
            message: message.into(),
        }
    }

    /// Attaches the source file and position this diagnostic refers to.
    #[must_use]
    pub fn at(mut self, source: ArtifactPath, position: Option<SourcePosition>) -> Self {
        self.source = Some(source);
        self.position = position;
        self
    }

    /// Attaches a compiler-specific message key.
    #[must_use]
    pub fn with_code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }
}

impl std::fmt::Display for Diagnostic {
    /// Formats as `severity[code] source:line:column: message`, omitting any
    /// part that is absent. A position without a source prints as `line:column`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(code) = &self.code {
            write!(f, "[{code}]")?;
        }
        match (&self.source, self.position) {
            (Some(source), Some(position)) => write!(f, " {source}:{position}")?,
            (Some(source), None) => write!(f, " {source}")?,
            (None, Some(position)) => write!(f, " {position}")?,
            (None, None) => {}
        }
        write!(f, ": {}", self.message)
    }
}

// ---------------------------------------------------------------------------
// Generated files
// ---------------------------------------------------------------------------

/// Broad classification of a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// Source code (e.g. output of an annotation processor or code generator).
    Source,
    /// Compiled class or object file.
    Class,
    /// HTML documentation.
    Html,
    /// Anything else.
    Other,
}

impl FileKind {
    /// Infers a kind from a file extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "java" | "kt" | "rs" | "c" | "h" | "cc" | "cpp" | "hpp" | "go" | "scala" => {
                Self::Source
            }
            "class" | "o" | "obj" => Self::Class,
            "html" | "htm" => Self::Html,
            _ => Self::Other,
        }
    }
}

// ---------------------------------------------------------------------------

/// Reference to a file produced by compilation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawGeneratedFile")]
pub struct GeneratedFile {
    /// Where the file was written.
    pub path: ArtifactPath,
    /// What kind of file it is.
    pub kind: FileKind,
}

#[derive(Deserialize)]
struct RawGeneratedFile {
    path: ArtifactPath,
    #[serde(default)]
    kind: Option<FileKind>,
}

impl From<RawGeneratedFile> for GeneratedFile {
    fn from(raw: RawGeneratedFile) -> Self {
        match raw.kind {
            Some(kind) => Self::new(raw.path, kind),
            None => Self::from_path(raw.path),
        }
    }
}

impl GeneratedFile {
    /// Creates a reference with an explicit kind.
    pub fn new(path: ArtifactPath, kind: FileKind) -> Self {
        Self { path, kind }
    }

    /// Creates a reference whose kind is inferred from the path's extension.
    pub fn from_path(path: ArtifactPath) -> Self {
        let kind = path
            .extension()
            .map_or(FileKind::Other, FileKind::from_extension);
        Self { path, kind }
    }
}

impl std::fmt::Display for GeneratedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(p: &str) -> ArtifactPath {
        ArtifactPath::new(p).unwrap()
    }

    #[test]
    fn source_position_rejects_zero() {
        assert!(SourcePosition::new(0, 1).is_none());
        assert!(SourcePosition::new(1, 0).is_none());

        let pos = SourcePosition::new(42, 5).unwrap();
        assert_eq!((pos.line(), pos.column()), (42, 5));
        assert_eq!(pos.to_string(), "42:5");
    }

    #[test]
    fn source_position_deserialisation_enforces_one_based() {
        let err = serde_json::from_str::<SourcePosition>(r#"{"line":0,"column":3}"#).unwrap_err();
        assert!(err.to_string().contains("not 1-based"));

        let pos: SourcePosition = serde_json::from_str(r#"{"line":7,"column":3}"#).unwrap();
        assert_eq!(pos, SourcePosition::new(7, 3).unwrap());
    }

    #[test]
    fn diagnostic_display_includes_present_parts() {
        let bare = Diagnostic::new(DiagnosticSeverity::Note, "processing round 1");
        assert_eq!(bare.to_string(), "note: processing round 1");

        let located = Diagnostic::new(DiagnosticSeverity::Error, "cannot find symbol")
            .at(path("src/Foo.java"), SourcePosition::new(12, 9))
            .with_code(DiagnosticCode::new("compiler.err.cant.resolve").unwrap());
        assert_eq!(
            located.to_string(),
            "error[compiler.err.cant.resolve] src/Foo.java:12:9: cannot find symbol"
        );

        let file_only = Diagnostic::new(DiagnosticSeverity::MandatoryWarning, "unchecked call");
        let file_only = file_only.at(path("src/Bar.java"), None);
        assert_eq!(
            file_only.to_string(),
            "mandatory warning src/Bar.java: unchecked call"
        );
    }

    #[test]
    fn diagnostic_display_keeps_position_without_source() {
        let mut positioned = Diagnostic::new(DiagnosticSeverity::Error, "x");
        positioned.position = SourcePosition::new(3, 4);

        assert_eq!(positioned.to_string(), "error 3:4: x");
    }

    #[test]
    fn warning_classification() {
        assert!(DiagnosticSeverity::Warning.is_warning());
        assert!(DiagnosticSeverity::MandatoryWarning.is_warning());
        assert!(!DiagnosticSeverity::Error.is_warning());
        assert!(!DiagnosticSeverity::Note.is_warning());
    }

    #[test]
    fn diagnostic_omits_absent_fields_when_serialised() {
        let diag = Diagnostic::new(DiagnosticSeverity::Warning, "deprecated API");
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "severity": "warning", "message": "deprecated API" })
        );
    }

    #[test]
    fn generated_file_kind_is_inferred_from_extension() {
        let kind = |p: &str| GeneratedFile::from_path(path(p)).kind;

        assert_eq!(kind("gen/Foo_Impl.java"), FileKind::Source);
        assert_eq!(kind("out/Foo.CLASS"), FileKind::Class);
        assert_eq!(kind("doc/index.htm"), FileKind::Html);
        assert_eq!(kind("META-INF/services"), FileKind::Other);
    }

    #[test]
    fn generated_file_kind_may_be_omitted_on_the_wire() {
        let inferred: GeneratedFile =
            serde_json::from_str(r#"{"path":"gen/Foo.java"}"#).unwrap();
        assert_eq!(inferred.kind, FileKind::Source);

        let explicit: GeneratedFile =
            serde_json::from_str(r#"{"path":"gen/Foo.java","kind":"other"}"#).unwrap();
        assert_eq!(explicit.kind, FileKind::Other);
    }
}
