//! Command handlers for tag search and download

use anyhow::Result;
use colored::Colorize;

use crate::Opts;
use crate::utils::config::PipelineConsts;

/// Print matching tags as a two-column table.
pub fn handle_search(query: &str, opts: &Opts) -> Result<()> {
    let tags = crate::search_tags(query, opts)?;
    if tags.is_empty() {
        log::warn!("No tags match {query:?}");
        return Ok(());
    }
    let width = PipelineConsts::LABEL_WIDTH;
    println!("{} | {}", format!("{:<width$}", "Tag").bold(), "Post count".bold());
    println!("{}", "-".repeat(width + 14));
    for tag in &tags {
        println!("{:<width$} | {}", tag.name, tag.post_count);
    }
    Ok(())
}

/// Download every post matching `tags` and print the totals.
pub fn handle_download(tags: &[String], opts: &Opts) -> Result<()> {
    let summary = crate::download(tags, opts)?;
    println!(
        "{} {} downloaded, {} already present, {} failed ({} discovered on {} pages)",
        "Done:".green().bold(),
        summary.succeeded,
        summary.skipped,
        summary.failed,
        summary.discovered,
        summary.pages
    );
    if let Some(ref reason) = summary.discovery_error {
        println!("{} {}", "Discovery stopped early:".yellow().bold(), reason);
    }
    Ok(())
}
