//! Error type shared by the todo engine.
//!
//! Configuration problems are surfaced to the caller as-is. Log decoding
//! errors exist as values but replay recovers from them locally (the bad
//! line is skipped), so they rarely escape the storage layer.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while resolving config or reading/writing todo storage.
pub enum TodoError {
    /// A manifest-embedded config and a sidecar rc file are both present.
    #[error(
        "lint-todo config found in both {} and {}; keep only one",
        .manifest.display(),
        .sidecar.display()
    )]
    ConfigConflict { manifest: PathBuf, sidecar: PathBuf },
    /// Resolved decay days are not strictly increasing.
    #[error("invalid decay config for {scope}: warn ({warn}) must be less than error ({error})")]
    ConfigInvalid { scope: String, warn: u32, error: u32 },
    /// A config source exists but cannot be parsed.
    #[error("failed to parse {}: {message}", .path.display())]
    ConfigParse { path: PathBuf, message: String },
    /// The project manifest is required but absent.
    #[error("package.json not found in {}", .0.display())]
    ManifestMissing(PathBuf),
    /// An operation line does not have the fixed field layout.
    #[error("malformed operation at line {line}: {reason}")]
    MalformedOperationLine { line: usize, reason: String },
    /// Filesystem failure other than a missing log file.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A lint result lacks the fields needed to build a todo.
    #[error("invalid lint result: {0}")]
    InvalidViolation(String),
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TodoError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TodoError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by the user's configuration rather than I/O.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            TodoError::ConfigConflict { .. }
                | TodoError::ConfigInvalid { .. }
                | TodoError::ConfigParse { .. }
                | TodoError::ManifestMissing(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TodoError>;
