//! Urgency report command.

use super::open_workspace;
use anyhow::{Context, Result};
use attn_core::{RankingSummary, ScoredItem, UrgencyItem};
use console::style;
use std::path::Path;

const RULE_WIDTH: usize = 120;

/// Print the urgency table, and with `detailed` the score ranking and summary.
pub fn run(root: &Path, detailed: bool, limit: Option<usize>) -> Result<()> {
    let ws = open_workspace(root)?;
    let rankings = ws.rankings().context("failed to resolve attributes")?;

    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    println!("{}", render_urgency(&rankings.urgency, &generated, limit));

    if detailed {
        println!();
        println!("{}", style("Score Ranking (lowest first):").bold());
        println!("{}", render_scores(&rankings.score, limit));
        println!();
        print_summary(&rankings.summary);
    }

    Ok(())
}

/// Renders the fixed-width urgency table.
pub fn render_urgency(items: &[UrgencyItem], generated: &str, limit: Option<usize>) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = vec![
        rule.clone(),
        "ATTENTION PRIORITY REPORT".to_string(),
        format!("Generated: {}", generated),
        rule.clone(),
        String::new(),
    ];

    if items.is_empty() {
        out.push("No items found.".to_string());
        return out.join("\n");
    }

    out.push(format!(
        "{:<25} {:<30} {:<8} {:<8} {:<10} {:<20}",
        "FACET", "ATTRIBUTE", "COMPLETE", "PRIORITY", "URGENCY", "PATH"
    ));
    out.push("-".repeat(RULE_WIDTH));

    let shown = limit.unwrap_or(items.len());
    for item in items.iter().take(shown) {
        out.push(format!(
            "{:<25} {:<30} {:>6.1}% {:>8.2} {:>10.4} {:<20}",
            truncate(&item.facet, 25),
            truncate(&item.attribute, 30),
            item.completion_percent,
            item.priority_value,
            item.urgency,
            truncate(&item.path, 20)
        ));
    }

    out.push(String::new());
    out.push(rule.clone());
    out.push(format!("Total items: {}", items.len()));
    out.push(format!(
        "Items with urgency > 0.5: {}",
        items.iter().filter(|i| i.urgency > 0.5).count()
    ));
    out.push(format!(
        "Items with urgency > 0.8: {}",
        items.iter().filter(|i| i.urgency > 0.8).count()
    ));
    out.push(rule);

    out.join("\n")
}

/// Renders the score ranking as a compact table.
pub fn render_scores(items: &[ScoredItem], limit: Option<usize>) -> String {
    if items.is_empty() {
        return "No items found.".to_string();
    }

    let mut out = vec![format!(
        "{:<25} {:<30} {:<10} {:<8} {:<10} {:<20}",
        "FACET", "ATTRIBUTE", "VALUE", "PRIORITY", "SCORE", "PATH"
    )];
    for item in items.iter().take(limit.unwrap_or(items.len())) {
        out.push(format!(
            "{:<25} {:<30} {:>10.2} {:>8.2} {:>10.4} {:<20}",
            truncate(&item.facet, 25),
            truncate(&item.attribute, 30),
            item.attribute_value,
            item.priority_value,
            item.score,
            truncate(&item.path, 20)
        ));
    }
    out.join("\n")
}

fn print_summary(summary: &RankingSummary) {
    println!("{}", style("Summary:").bold());
    println!("  Total items:         {}", style(summary.total_items).cyan());
    println!("  High urgency:        {}", style(summary.high_urgency).red());
    println!("  Medium urgency:      {}", style(summary.medium_urgency).yellow());
    println!("  Low urgency:         {}", style(summary.low_urgency).green());
    println!("  Average completion:  {:.1}%", summary.average_completion);
    println!("  Average urgency:     {:.4}", summary.average_urgency);
}

/// Shortens `s` to `max` characters, ending in "..." when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}
