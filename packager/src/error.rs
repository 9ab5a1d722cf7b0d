//! Error types for the packager.
//!
//! Validation failures are not errors here: a manifest that breaks the
//! schema is a normal outcome and is reported through
//! [`crate::pipeline::ValidationOutcome`]. The variants below cover the
//! fatal cases that end a run before any verdict is reached or that stop an
//! archive from being written.

use crate::archive::ArchiveError;
use crate::scanner::ScanError;
use crate::state::TransitionError;
use camino::Utf8PathBuf;
use skillpack::ConfigError;
use thiserror::Error;

/// Fatal errors raised by validate and package runs.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// The skill manifest is missing or unreadable.
    #[error("failed to read manifest {path}: {source}")]
    ManifestRead {
        /// Expected manifest location.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The skill path cannot be used as a skill directory.
    #[error("invalid skill path {path}: {reason}")]
    InvalidSkillPath {
        /// The path given by the caller.
        path: Utf8PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The skill directory could not be scanned.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The archive could not be written or hashed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// The run attempted an illegal lifecycle step.
    #[error("internal state error: {0}")]
    State(#[from] TransitionError),

    /// Failed to write the report.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using [`PackagerError`].
pub type Result<T> = std::result::Result<T, PackagerError>;
