//! CLI commands.

pub mod apply;
pub mod cleanup;
pub mod dump;
pub mod refresh;
pub mod report;
pub mod scan;
pub mod stats;

use anyhow::{Context, Result};
use attn_core::Workspace;
use std::path::{Path, PathBuf};

/// Opens the tracked tree at `root`.
pub fn open_workspace(root: &Path) -> Result<Workspace> {
    Workspace::open(root).with_context(|| format!("failed to open {}", root.display()))
}

/// The directory a per-directory command targets; the root when omitted.
pub fn target_dir(dir: Option<&Path>) -> PathBuf {
    dir.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."))
}
