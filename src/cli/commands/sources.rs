//! Agency registry listing.

use console::style;

use crate::config::Settings;
use crate::scrapers::profiles;

use super::helpers::truncate;

/// List the built-in agency profiles, marking the ones this config scrapes.
pub async fn cmd_sources(settings: &Settings) -> anyhow::Result<()> {
    let selected = profiles::select(&settings.agency_sources);

    println!("\n{}", style("Agency Sources").bold());
    println!("{}", "-".repeat(80));
    println!("{:<3}{:<14} {:<26} {:>5}  URL", "", "ID", "Name", "Wait");
    println!("{}", "-".repeat(80));

    for profile in profiles::all() {
        let marker = if selected.iter().any(|p| p.id == profile.id) {
            "*"
        } else {
            ""
        };
        println!(
            "{:<3}{:<14} {:<26} {:>4}s  {}",
            marker,
            profile.id,
            truncate(profile.name, 24),
            profile.settle_interval().as_secs(),
            profile.url
        );
    }

    println!(
        "\n{} of {} sources selected",
        selected.len(),
        profiles::all().len()
    );
    Ok(())
}
