//! Error types for attn_core operations.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for attn_core operations.
///
/// Expected empty cases (no trackable files, no store yet) are not errors;
/// they are reported through [`crate::Outcome`].
#[derive(Error, Debug)]
pub enum AttnError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A file vanished or could not be read while computing its identity.
    #[error("cannot read {}: {}", path.display(), reason)]
    FileUnreadable {
        /// Path to the unreadable file
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// A store file could not be parsed.
    #[error("malformed store file {} at line {}: {}", path.display(), line, reason)]
    MalformedStoreFile {
        /// Path to the store file
        path: PathBuf,
        /// 1-based line number of the offending line
        line: usize,
        /// Description of what's wrong
        reason: String,
    },

    /// Invalid hex string for ContentId parsing.
    #[error("invalid content id: {0}")]
    InvalidContentId(String),

    /// Version control could not answer a query.
    ///
    /// Never surfaced by the identity resolver, which falls back to the
    /// manual blob hash instead.
    #[error("version control unavailable: {0}")]
    VcsUnavailable(String),

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// An exclusion pattern failed to compile.
    #[error("invalid exclude pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Parser message
        reason: String,
    },

    /// A directory outside the tracked root was passed in.
    #[error("path is outside the tracked root: {}", .0.display())]
    OutsideRoot(PathBuf),
}

impl AttnError {
    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::MalformedStoreFile { .. } => Some(
                "Fix the offending line by hand. Sections look like [Name] and entries like key=0.5.",
            ),
            Self::ConfigError(_) => Some("Check .attention.toml at the tree root, or delete it to use defaults."),
            Self::InvalidPattern { .. } => {
                Some("Exclude patterns use shell glob syntax, e.g. 'spec/**/*' or '*_test.rb'.")
            }
            Self::OutsideRoot(_) => Some("Pass a directory inside the tree given with --root."),
            _ => None,
        }
    }
}

/// Convenience Result type for attn_core operations.
pub type Result<T> = std::result::Result<T, AttnError>;
