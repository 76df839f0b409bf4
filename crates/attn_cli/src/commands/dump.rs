//! JSON export of resolved data.

use super::open_workspace;
use anyhow::{Context, Result};
use attn_core::{FacetMap, ResolvedData, Workspace};
use console::style;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Dump file used when none is given.
pub const DEFAULT_DUMP_FILE: &str = "attention_dump.json";

/// On-disk export format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dump {
    pub generated_at: String,
    pub root_path: String,
    pub data: BTreeMap<String, DumpEntry>,
}

/// Resolved attributes and priorities of one directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DumpEntry {
    #[serde(default)]
    pub attributes: FacetMap,
    #[serde(default)]
    pub priorities: FacetMap,
}

impl Dump {
    /// Builds a dump from resolved data, one entry per directory key.
    pub fn from_resolved(root: &Path, data: &ResolvedData, generated_at: String) -> Self {
        let entries = data
            .paths()
            .into_iter()
            .map(|key| {
                let entry = DumpEntry {
                    attributes: data.attributes.get(key).cloned().unwrap_or_default(),
                    priorities: data.priorities.get(key).cloned().unwrap_or_default(),
                };
                (key.to_string(), entry)
            })
            .collect();

        Self {
            generated_at,
            root_path: root.display().to_string(),
            data: entries,
        }
    }
}

/// Writes the resolved tree to `output` (relative to the root) and returns its path.
pub fn write_dump(ws: &Workspace, output: &Path) -> Result<(PathBuf, usize)> {
    let data = ws.resolve().context("failed to resolve attributes")?;
    let generated_at = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%z").to_string();
    let dump = Dump::from_resolved(ws.root(), &data, generated_at);

    let path = ws.root().join(output);
    let json = serde_json::to_string_pretty(&dump)?;
    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok((path, dump.data.len()))
}

/// Export resolved data to JSON.
pub fn run(root: &Path, output: &Path) -> Result<()> {
    let ws = open_workspace(root)?;
    let (path, count) = write_dump(&ws, output)?;

    println!(
        "{} Dumped data for {} paths to {}",
        style("✓").green(),
        style(count).cyan(),
        path.display()
    );
    Ok(())
}
