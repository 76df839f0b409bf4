//! Facet statistics command.

use super::{open_workspace, target_dir};
use anyhow::{Context, Result};
use attn_core::Outcome;
use console::style;
use std::path::Path;

/// Show facet counts for a directory.
pub fn run(root: &Path, dir: Option<&Path>) -> Result<()> {
    let ws = open_workspace(root)?;
    let dir = target_dir(dir);

    let outcome = ws
        .synchronizer()?
        .statistics(&dir)
        .with_context(|| format!("failed to read {}", dir.display()))?;

    let stats = match outcome {
        Outcome::Done(stats) => stats,
        Outcome::Skipped(reason) => {
            println!("{} {}: {}", style("→").cyan(), dir.display(), reason);
            return Ok(());
        }
    };

    println!("{}", style("Facet Statistics:").bold());
    println!("  File facets:    {}", style(stats.file_facets).cyan());
    println!("  Manual facets:  {}", style(stats.manual_facets).cyan());
    println!("  Total:          {}", style(stats.total).cyan());
    println!(
        "  Git managed:    {}",
        if stats.vcs_managed {
            style("yes").green()
        } else {
            style("no").yellow()
        }
    );

    Ok(())
}
