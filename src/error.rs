//! Error types for schema construction, validation, and document loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while constructing a schema.
///
/// These describe mistakes in the schema definition itself, never in the
/// value being validated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("anyOf requires at least one schema")]
    EmptyUnion,

    #[error("allOf requires at least one schema")]
    EmptyIntersection,

    #[error("enum requires at least one value")]
    EmptyEnum,

    #[error("enum values must all be of the same literal type: expected {expected}, found {found}")]
    MixedEnum {
        expected: &'static str,
        found: &'static str,
    },

    #[error("literal only allows string, number or boolean values, got {actual}")]
    NonScalarLiteral { actual: &'static str },

    #[error("numbers in schemas must be finite")]
    NonFiniteNumber,

    #[error("invalid schema document{}: {message}", location(.path))]
    InvalidDocument { path: String, message: String },
}

fn location(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" at {}", path)
    }
}

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Value has the wrong runtime type.
    TypeMismatch,
    /// Strict object carries a key no schema covers.
    UnexpectedKey,
    /// Value is not one of the enum's literals.
    NotAllowed,
    /// No `anyOf` branch accepted the value.
    NoUnionMatch,
    /// An enforced `pattern`, `minimum` or `maximum` rejected the value.
    Refinement,
    /// Nesting went past the configured maximum depth.
    DepthExceeded,
}

/// Single validation failure with path context.
///
/// Returned as an ordinary value; the validator never panics on bad input.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ValidationError {
    /// Dot-joined path to the offending value, empty at the root.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
    pub kind: ErrorKind,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors while loading a schema document or payload.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    InvalidSchema(#[from] BuildError),
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors while exporting a schema as a standard JSON Schema document.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("exported document rejected by JSON Schema compiler: {message}")]
    Rejected { message: String },
}
