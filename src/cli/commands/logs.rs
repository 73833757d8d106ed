//! Crawl log listing.

use console::style;

use crate::config::Settings;

use super::helpers::open_db;

/// Print the `limit` most recent crawl log rows.
pub async fn cmd_logs(settings: &Settings, limit: i64) -> anyhow::Result<()> {
    let ctx = open_db(settings).await?;
    let entries = ctx.crawl_logs().recent(limit.max(1)).await?;

    if entries.is_empty() {
        println!(
            "{} No crawls recorded yet. Run 'gonggo crawl' first.",
            style("!").yellow()
        );
        return Ok(());
    }

    println!("\n{}", style("Crawl Log").bold());
    println!("{}", "-".repeat(52));
    println!("{:<20} {:<12} {:>8} {:>8}", "Crawled", "Source", "Total", "New");
    println!("{}", "-".repeat(52));
    for entry in entries {
        println!(
            "{:<20} {:<12} {:>8} {:>8}",
            entry.crawled_at.format("%Y-%m-%d %H:%M:%S"),
            entry.source,
            entry.total_count,
            entry.new_count
        );
    }
    Ok(())
}
