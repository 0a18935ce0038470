//! Error types for facade schema linearization and rendering.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while linearizing a schema node.
///
/// Every variant is an input-malformation error and carries the path label
/// at which it was detected (empty for the root).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinearizeError {
    #[error("unsupported $ref at \"{path}\": {reference} (expected #/definitions/<name>)")]
    UnsupportedReferenceForm { path: String, reference: String },

    #[error("unresolved $ref at \"{path}\": no definition named '{name}'")]
    UnresolvedReference { path: String, name: String },

    #[error("array at \"{path}\" has no items schema")]
    MissingArrayItems { path: String },

    #[error("malformed schema node at \"{path}\": {reason}")]
    MalformedNode { path: String, reason: String },

    #[error("unknown type \"{type_name}\" at \"{path}\"")]
    UnknownScalarType { path: String, type_name: String },
}

impl LinearizeError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }

    /// Path label at which the error was detected.
    pub fn path(&self) -> &str {
        match self {
            Self::UnsupportedReferenceForm { path, .. }
            | Self::UnresolvedReference { path, .. }
            | Self::MissingArrayItems { path }
            | Self::MalformedNode { path, .. }
            | Self::UnknownScalarType { path, .. } => path,
        }
    }
}

/// Errors while loading a facade document.
#[derive(Debug, Error)]
pub enum DocumentError {
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

    #[error("invalid facade document: {source}")]
    InvalidDocument {
        #[source]
        source: serde_json::Error,
    },
}

impl DocumentError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            DocumentError::FileNotFound { .. } | DocumentError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            DocumentError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors while rendering one input file to its output listings.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("{}: {source}", file.display())]
    Linearize {
        file: PathBuf,
        #[source]
        source: LinearizeError,
    },

    #[error("cannot write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            RenderError::Document(e) => e.exit_code(),
            RenderError::Linearize { source, .. } => source.exit_code(),
            RenderError::WriteError { .. } => 3,
        }
    }
}
