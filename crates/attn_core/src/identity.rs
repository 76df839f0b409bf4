//! Content identity resolution with a manual fallback.

use crate::config::VcsConfig;
use crate::content_id::ContentId;
use crate::error::{AttnError, Result};
use crate::vcs::{GitCli, VcsBackend};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Computes [`ContentId`]s for files in a tracked tree.
///
/// When the tree is under version control the hash is delegated to it;
/// otherwise, or whenever that fails, the blob hash is computed in-process.
/// Both paths yield identical ids for identical bytes.
pub struct IdentityResolver {
    vcs: Option<Box<dyn VcsBackend>>,
}

impl IdentityResolver {
    /// Creates a resolver for the tree at `root`.
    ///
    /// Probes for a git repository once, up front, unless disabled in config.
    pub fn new(root: &Path, config: &VcsConfig) -> Self {
        if !config.enabled {
            return Self::manual();
        }

        let git = GitCli::new(root, config.timeout());
        if git.is_repository() {
            debug!("{} is a git repository, delegating content hashing", root.display());
            Self::with_backend(Box::new(git))
        } else {
            debug!("{} is not under version control, hashing manually", root.display());
            Self::manual()
        }
    }

    /// Creates a resolver that never consults version control.
    pub fn manual() -> Self {
        Self { vcs: None }
    }

    /// Creates a resolver delegating to the given backend.
    pub fn with_backend(backend: Box<dyn VcsBackend>) -> Self {
        Self { vcs: Some(backend) }
    }

    /// Returns true if hashing is delegated to version control.
    pub fn is_vcs_managed(&self) -> bool {
        self.vcs.as_ref().is_some_and(|vcs| vcs.is_repository())
    }

    /// Returns the content identity of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `FileUnreadable` only when the file itself cannot be read.
    pub fn identity(&self, path: &Path) -> Result<ContentId> {
        if let Some(vcs) = &self.vcs {
            match vcs.hash_object(path) {
                Ok(id) => return Ok(id),
                Err(e) => debug!("falling back to manual hash for {}: {}", path.display(), e),
            }
        }
        manual_identity(path)
    }
}

/// Hashes a file's bytes directly, without version control.
pub fn manual_identity(path: &Path) -> Result<ContentId> {
    let data = fs::read(path).map_err(|e| AttnError::FileUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(ContentId::hash_blob(&data))
}
