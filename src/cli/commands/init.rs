//! Initialize command.

use console::style;

use crate::config::Settings;
use crate::models::SourceTag;

use super::helpers::open_db;

/// Create the data directory and database schema.
pub async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    open_db(settings).await?;

    println!(
        "{} Initialized gonggo in {}",
        style("✓").green(),
        settings.data_dir.display()
    );
    println!("  Database: {}", settings.database_url());

    for warning in settings.missing_credentials(&SourceTag::ALL) {
        println!("{} {}", style("!").yellow(), warning);
    }

    Ok(())
}
