//! Exclusion list commands.

use console::style;

use crate::config::Settings;

use super::helpers::{open_db, truncate};

pub async fn cmd_exclude_add(
    settings: &Settings,
    user_id: i64,
    url: &str,
    reason: Option<&str>,
) -> anyhow::Result<()> {
    let ctx = open_db(settings).await?;

    match ctx.exclusions().add(user_id, url, reason).await? {
        Some(entry) => println!(
            "{} Excluded {} (id {})",
            style("✓").green(),
            entry.notice_url,
            entry.id
        ),
        None => println!(
            "{} {} is already excluded for user {}",
            style("!").yellow(),
            url,
            user_id
        ),
    }
    Ok(())
}

pub async fn cmd_exclude_list(settings: &Settings, user_id: i64) -> anyhow::Result<()> {
    let ctx = open_db(settings).await?;
    let entries = ctx.exclusions().list(user_id).await?;

    if entries.is_empty() {
        println!("{} No exclusions for user {}", style("!").yellow(), user_id);
        return Ok(());
    }

    println!("\n{}", style(format!("Exclusions for user {}", user_id)).bold());
    println!("{}", "-".repeat(90));
    println!("{:<6} {:<17} {:<45} Reason", "ID", "Added", "URL");
    println!("{}", "-".repeat(90));
    for entry in entries {
        println!(
            "{:<6} {:<17} {:<45} {}",
            entry.id,
            entry.created_at.format("%Y-%m-%d %H:%M"),
            truncate(&entry.notice_url, 44),
            entry.reason.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

pub async fn cmd_exclude_remove(settings: &Settings, user_id: i64, id: i64) -> anyhow::Result<()> {
    let ctx = open_db(settings).await?;

    if ctx.exclusions().remove(user_id, id).await? {
        println!("{} Removed exclusion {}", style("✓").green(), id);
    } else {
        println!("{} Exclusion {} not found", style("✗").red(), id);
    }
    Ok(())
}

pub async fn cmd_exclude_remove_url(
    settings: &Settings,
    user_id: i64,
    url: &str,
) -> anyhow::Result<()> {
    let ctx = open_db(settings).await?;

    if ctx.exclusions().remove_url(user_id, url).await? {
        println!("{} Removed exclusion for {}", style("✓").green(), url);
    } else {
        println!("{} {} is not excluded", style("✗").red(), url);
    }
    Ok(())
}
