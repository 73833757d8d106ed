//! Shared helpers for CLI output.

use crate::config::Settings;
use crate::repository::DbContext;

/// Shorten `s` to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Open the database, creating the schema if needed.
pub async fn open_db(settings: &Settings) -> anyhow::Result<DbContext> {
    settings.ensure_directories()?;
    let ctx = settings.create_db_context();
    ctx.init_schema().await?;
    Ok(ctx)
}
