//! Apply a JSON export back onto the tree.

use super::dump::Dump;
use super::open_workspace;
use anyhow::{bail, Context, Result};
use attn_core::{StoreKind, Workspace};
use console::style;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Writes each directory's non-empty maps from `input` as store files.
///
/// Returns the number of directories visited.
pub fn apply_dump(ws: &Workspace, input: &Path) -> Result<usize> {
    let path = ws.root().join(input);
    if !path.exists() {
        bail!("input file not found: {}", path.display());
    }

    let content =
        fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let dump: Dump = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    for (key, entry) in &dump.data {
        if !entry.attributes.is_empty() {
            let written = ws
                .write_store(key, StoreKind::Attributes, &entry.attributes)
                .with_context(|| format!("failed to write attributes for {}", key))?;
            debug!("wrote {}", written.display());
        }
        if !entry.priorities.is_empty() {
            let written = ws
                .write_store(key, StoreKind::Priorities, &entry.priorities)
                .with_context(|| format!("failed to write priorities for {}", key))?;
            debug!("wrote {}", written.display());
        }
    }

    Ok(dump.data.len())
}

/// Write store files from a JSON export.
pub fn run(root: &Path, input: &Path) -> Result<()> {
    let ws = open_workspace(root)?;
    let count = apply_dump(&ws, input)?;

    println!(
        "{} Applied data to {} paths from {}",
        style("✓").green(),
        style(count).cyan(),
        ws.root().join(input).display()
    );
    Ok(())
}
