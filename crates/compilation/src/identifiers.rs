//! Newtype identifiers for compilation artefacts.
//!
//! A generated file's path and a compiler's message key are both strings under
//! the hood, but they are never interchangeable. Each gets its own newtype so
//! the compiler catches a [`DiagnosticCode`] passed where an [`ArtifactPath`]
//! is expected.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display,
// TryFrom<String> (used by serde so the non-empty rule holds on the wire too).
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value).ok_or_else(|| {
                    concat!(stringify!($name), " cannot be empty").to_string()
                })
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

string_id! {
    /// A file-system path identifying a compilation artefact.
    ///
    /// Used both for the source file a [`crate::Diagnostic`] refers to and for
    /// the location of a [`crate::GeneratedFile`]. The path is kept verbatim;
    /// no normalisation is applied, so `a/b.rs` and `./a/b.rs` are distinct.
    ArtifactPath
}

impl ArtifactPath {
    /// Returns the file extension (without the leading dot), if any.
    ///
    /// A leading dot on the final component (e.g. `.gitignore`) is not treated
    /// as an extension.
    pub fn extension(&self) -> Option<&str> {
        let file_name = self.0.rsplit(['/', '\\']).next().unwrap_or(self.0.as_str());
        match file_name.rfind('.') {
            Some(0) | None => None,
            Some(dot) => Some(&file_name[dot + 1..]),
        }
    }
}

string_id! {
    /// A compiler-specific message key (e.g. `"E0308"`,
    /// `"compiler.err.cant.resolve"`).
    DiagnosticCode
}
