//! Rendering facade documents to per-audience text listings.
//!
//! For every input document matching a file-name pattern, the formatted
//! listing for each audience is written next to the input, replacing its
//! extension: `schemas-juju-3.3.json` becomes
//! `schemas-juju-3.3.model-user.txt` and `schemas-juju-3.3.controller-user.txt`.
//!
//! Each input is rendered all-or-nothing; a failing input does not stop the
//! others.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{DocumentError, LinearizeError, RenderError};
use crate::facade::{format_facades, parse_facades, Facade};
use crate::loader::load_document;
use crate::types::LinearizeOptions;

/// Default file-name pattern for input documents.
pub const DEFAULT_PATTERN: &str = "schemas-juju-*.json";

/// A file-name pattern with at most one `*` wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPattern {
    prefix: String,
    suffix: Option<String>,
}

impl InputPattern {
    /// Parse a pattern such as `schemas-juju-*.json`.
    ///
    /// Text after a second `*` is treated literally.
    pub fn new(pattern: &str) -> Self {
        match pattern.split_once('*') {
            Some((prefix, suffix)) => Self {
                prefix: prefix.to_string(),
                suffix: Some(suffix.to_string()),
            },
            None => Self {
                prefix: pattern.to_string(),
                suffix: None,
            },
        }
    }

    /// Returns true if `file_name` matches the pattern.
    pub fn matches(&self, file_name: &str) -> bool {
        match &self.suffix {
            Some(suffix) => {
                file_name.len() >= self.prefix.len() + suffix.len()
                    && file_name.starts_with(&self.prefix)
                    && file_name.ends_with(suffix.as_str())
            }
            None => file_name == self.prefix,
        }
    }
}

impl Default for InputPattern {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}

/// Status of a rendered input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Error,
}

/// Result of rendering a single input file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Exit code of the failure, if any.
    #[serde(skip)]
    pub exit_code: Option<i32>,
}

/// Result of rendering a directory.
#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    pub dir: PathBuf,
    pub files_checked: usize,
    pub rendered: usize,
    pub failed: usize,
    pub results: Vec<FileReport>,
}

impl RenderReport {
    /// Returns true if every input rendered.
    pub fn is_ok(&self) -> bool {
        self.failed == 0
    }
}

/// Find input documents directly inside `dir` whose file name matches
/// `pattern`, sorted by path.
///
/// # Errors
///
/// Returns `DocumentError::FileNotFound` if `dir` doesn't exist, or
/// `DocumentError::ReadError` if it can't be listed.
pub fn discover_inputs(dir: &Path, pattern: &InputPattern) -> Result<Vec<PathBuf>, DocumentError> {
    if !dir.exists() {
        return Err(DocumentError::FileNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|source| DocumentError::ReadError {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(|name| pattern.matches(name))
                .unwrap_or(false)
        })
        .collect();
    files.sort();

    tracing::debug!(dir = %dir.display(), count = files.len(), "discovered inputs");
    Ok(files)
}

/// Output path for `input` rendered for `audience`.
pub fn output_path(input: &Path, audience: &str) -> PathBuf {
    input.with_extension(format!("{}.txt", audience))
}

/// Render one document for each audience.
///
/// Returns `(audience, text)` pairs; each text is the formatted lines joined
/// with newlines.
///
/// # Errors
///
/// Returns the first `LinearizeError` for any audience.
pub fn render_document(
    facades: &[Facade],
    audiences: &[&str],
    options: &LinearizeOptions,
) -> Result<Vec<(String, String)>, LinearizeError> {
    audiences
        .iter()
        .map(|audience| {
            let lines = format_facades(facades, audience, options)?;
            Ok((audience.to_string(), lines.join("\n")))
        })
        .collect()
}

/// Render a single input file, writing one output per audience.
///
/// Nothing is written unless every audience renders, and outputs already
/// written are removed again if a later one can't be written.
///
/// # Errors
///
/// Returns `RenderError` if the input can't be loaded or linearized, or an
/// output can't be written.
pub fn render_file(
    input: &Path,
    audiences: &[&str],
    options: &LinearizeOptions,
) -> Result<Vec<PathBuf>, RenderError> {
    let facades = parse_facades(load_document(input)?)?;
    let rendered =
        render_document(&facades, audiences, options).map_err(|source| RenderError::Linearize {
            file: input.to_path_buf(),
            source,
        })?;

    let mut outputs: Vec<PathBuf> = Vec::with_capacity(rendered.len());
    for (audience, text) in rendered {
        let path = output_path(input, &audience);
        if let Err(source) = std::fs::write(&path, text) {
            // Drop the listings already written for this input.
            for written in &outputs {
                if let Err(e) = std::fs::remove_file(written) {
                    tracing::warn!(output = %written.display(), error = %e, "cannot remove partial listing");
                }
            }
            return Err(RenderError::WriteError { path, source });
        }
        tracing::info!(input = %input.display(), output = %path.display(), "wrote listing");
        outputs.push(path);
    }

    Ok(outputs)
}

/// Render every input in `dir` matching `pattern`.
///
/// # Errors
///
/// Returns `DocumentError` only if `dir` can't be listed; per-file failures
/// are recorded in the report.
pub fn render_dir(
    dir: &Path,
    pattern: &InputPattern,
    audiences: &[&str],
    options: &LinearizeOptions,
) -> Result<RenderReport, DocumentError> {
    let files = discover_inputs(dir, pattern)?;
    let mut results = Vec::with_capacity(files.len());

    for file in &files {
        let report = match render_file(file, audiences, options) {
            Ok(outputs) => FileReport {
                file: file.clone(),
                status: FileStatus::Ok,
                outputs,
                error: None,
                exit_code: None,
            },
            Err(e) => {
                tracing::warn!(input = %file.display(), error = %e, "render failed");
                FileReport {
                    file: file.clone(),
                    status: FileStatus::Error,
                    outputs: Vec::new(),
                    error: Some(e.to_string()),
                    exit_code: Some(e.exit_code()),
                }
            }
        };
        results.push(report);
    }

    let failed = results
        .iter()
        .filter(|r| r.status == FileStatus::Error)
        .count();

    Ok(RenderReport {
        dir: dir.to_path_buf(),
        files_checked: files.len(),
        rendered: files.len() - failed,
        failed,
        results,
    })
}
