//! Identity refresh command.

use super::{open_workspace, target_dir};
use anyhow::{Context, Result};
use attn_core::Outcome;
use console::style;
use std::path::Path;

/// Recompute identities of existing file facets in a directory.
pub fn run(root: &Path, dir: Option<&Path>) -> Result<()> {
    let ws = open_workspace(root)?;
    let dir = target_dir(dir);

    let outcome = ws
        .synchronizer()?
        .refresh_identities(&dir)
        .with_context(|| format!("failed to refresh {}", dir.display()))?;

    match outcome {
        Outcome::Done(report) => {
            println!(
                "{} Refreshed {}: {} updated",
                style("✓").green(),
                style(&report.directory).cyan(),
                report.updated
            );
            for failure in &report.failed {
                println!(
                    "    {} {}: {}",
                    style("×").red(),
                    failure.filename,
                    failure.reason
                );
            }
        }
        Outcome::Skipped(reason) => {
            println!("{} {}: {}", style("→").cyan(), dir.display(), reason);
        }
    }

    Ok(())
}
