//! One pipeline run from the command line.

use std::sync::Arc;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Settings;
use crate::models::SourceTag;
use crate::pipeline::{Orchestrator, RunCoordinator, RunRequest};
use crate::repository::DbContext;
use crate::scrapers::{profiles, AgencyAdapter, BizinfoAdapter, G2bAdapter};

use super::helpers::open_db;

/// Wire the three adapters and the SQLite stores into an orchestrator.
fn build_orchestrator(settings: &Settings, ctx: &DbContext) -> Orchestrator {
    let agency = AgencyAdapter::new(
        profiles::select(&settings.agency_sources),
        settings.browser.clone(),
        settings.agency.clone(),
    );

    Orchestrator::new(
        Arc::new(ctx.notices()),
        Arc::new(ctx.exclusions()),
        Arc::new(ctx.crawl_logs()),
        RunCoordinator::new(),
    )
    .with_adapter(Box::new(BizinfoAdapter::new(settings.bizinfo.clone())))
    .with_adapter(Box::new(agency))
    .with_adapter(Box::new(G2bAdapter::new(settings.g2b.clone())))
}

/// Requested sources in pipeline order, without repeats. Empty means all.
fn requested_sources(sources: &[SourceTag]) -> Vec<SourceTag> {
    if sources.is_empty() {
        return SourceTag::ALL.to_vec();
    }
    SourceTag::ALL
        .into_iter()
        .filter(|tag| sources.contains(tag))
        .collect()
}

/// Run the pipeline once and print per-source totals.
pub async fn cmd_crawl(settings: &Settings, sources: &[SourceTag], user_id: i64) -> anyhow::Result<()> {
    let ctx = open_db(settings).await?;
    let request = RunRequest {
        sources: requested_sources(sources),
        user_id,
    };

    for warning in settings.missing_credentials(&request.sources) {
        println!("{} {}", style("!").yellow(), warning);
    }

    let orchestrator = build_orchestrator(settings, &ctx);

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")?
            .progress_chars("#>-"),
    );
    pb.enable_steady_tick(Duration::from_millis(120));

    let mut status = orchestrator.coordinator().subscribe();
    let watcher_pb = pb.clone();
    let watcher = tokio::spawn(async move {
        while status.changed().await.is_ok() {
            let current = status.borrow_and_update().clone();
            watcher_pb.set_position(u64::from(current.progress));
            if let Some(source) = current.current_source {
                watcher_pb.set_message(source);
            }
        }
    });

    let result = orchestrator.run(&request).await;
    watcher.abort();
    pb.finish_and_clear();
    let report = result?;

    println!("\n{}", style("Crawl Summary").bold());
    println!("{}", "-".repeat(40));
    println!("{:<12} {:>10} {:>10}", "Source", "Collected", "New");
    println!("{}", "-".repeat(40));
    for tag in &request.sources {
        let counts = report.get(*tag);
        println!(
            "{:<12} {:>10} {:>10}",
            tag.display_name(),
            counts.total,
            counts.new
        );
    }
    println!("{}", "-".repeat(40));
    println!(
        "{} {} new notices ({} stored in total)",
        style("✓").green(),
        report.total_new(),
        ctx.notices().count().await?
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_sources_follow_pipeline_order() {
        assert_eq!(requested_sources(&[]), SourceTag::ALL.to_vec());
        assert_eq!(
            requested_sources(&[SourceTag::G2b, SourceTag::Bizinfo, SourceTag::G2b]),
            vec![SourceTag::Bizinfo, SourceTag::G2b]
        );
    }

    #[test]
    fn test_orchestrator_builds_from_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::with_data_dir(dir.path().to_path_buf());
        let ctx = settings.create_db_context();
        let orchestrator = build_orchestrator(&settings, &ctx);
        assert!(!orchestrator.coordinator().is_running());
    }
}
