//! File facet scan command.

use super::{open_workspace, target_dir};
use anyhow::{Context, Result};
use attn_core::Outcome;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Sync file facets of a single directory.
pub fn run(root: &Path, dir: Option<&Path>) -> Result<()> {
    let ws = open_workspace(root)?;
    let dir = target_dir(dir);
    let sync = ws.synchronizer()?;

    let outcome = sync
        .sync(&dir)
        .with_context(|| format!("failed to scan {}", dir.display()))?;

    let report = match outcome {
        Outcome::Done(report) => report,
        Outcome::Skipped(reason) => {
            println!("{} {}: {}", style("→").cyan(), dir.display(), reason);
            return Ok(());
        }
    };

    println!(
        "{} Scanned {} ({} files)",
        style("✓").green(),
        style(&report.directory).cyan(),
        report.total
    );
    println!("  Created:  {}", style(report.created).green());
    println!("  Updated:  {}", style(report.updated).yellow());
    for failure in &report.failed {
        println!(
            "    {} {}: {}",
            style("×").red(),
            failure.filename,
            failure.reason
        );
    }

    if sync.is_vcs_managed() {
        println!("  Identities computed by git");
    }

    Ok(())
}

/// Sync file facets of every discovered directory.
pub fn run_all(root: &Path) -> Result<()> {
    let ws = open_workspace(root)?;
    let sync = ws.synchronizer()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Scanning repository...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let report = sync.sync_repository();
    pb.finish_and_clear();
    let report = report.context("repository scan failed")?;

    println!("{}", style("Scan Report:").bold());
    println!("  Directories:  {}", style(report.directories).cyan());
    println!("  Created:      {}", style(report.created).green());
    println!("  Updated:      {}", style(report.updated).yellow());

    if !report.failed.is_empty() {
        println!("  Unreadable:   {}", style(report.failed.len()).red());
        for (dir, failure) in &report.failed {
            println!(
                "    {} {}/{}: {}",
                style("×").red(),
                dir,
                failure.filename,
                failure.reason
            );
        }
    }

    if !report.errors.is_empty() {
        println!("  Skipped:      {}", style(report.errors.len()).red());
        for (dir, error) in &report.errors {
            println!("    {} {}: {}", style("⚠").yellow(), dir, error);
        }
    }

    Ok(())
}
