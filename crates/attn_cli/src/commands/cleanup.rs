//! Stale facet cleanup command.

use super::{open_workspace, target_dir};
use anyhow::{Context, Result};
use attn_core::Outcome;
use console::style;
use std::path::Path;

/// Remove facets whose backing file is gone.
pub fn run(root: &Path, dir: Option<&Path>) -> Result<()> {
    let ws = open_workspace(root)?;
    let dir = target_dir(dir);

    let outcome = ws
        .synchronizer()?
        .cleanup(&dir)
        .with_context(|| format!("failed to clean up {}", dir.display()))?;

    match outcome {
        Outcome::Done(report) if report.removed == 0 => {
            println!(
                "{} {}: nothing to remove",
                style("✓").green(),
                style(&report.directory).cyan()
            );
        }
        Outcome::Done(report) => {
            println!(
                "{} Removed {} stale facet(s) from {}",
                style("✓").green(),
                style(report.removed).yellow(),
                style(&report.directory).cyan()
            );
        }
        Outcome::Skipped(reason) => {
            println!("{} {}: {}", style("→").cyan(), dir.display(), reason);
        }
    }

    Ok(())
}
