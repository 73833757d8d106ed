//! Configuration management using the prefer crate for discovery.
//!
//! Precedence, lowest first: built-in defaults, the config file (explicit
//! `--config` path or discovered by prefer), then environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::SourceTag;
use crate::repository::DbContext;
use crate::scrapers::agency::AgencyOptions;
use crate::scrapers::bizinfo::BizinfoOptions;
use crate::scrapers::g2b::G2bOptions;
use crate::scrapers::{profiles, BrowserEngineConfig};

/// Default database filename inside the data directory.
pub const DEFAULT_DATABASE_FILENAME: &str = "gonggo.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// `agency.sources` names ids that are not in the registry.
    #[error("unknown agency source id(s): {}", .0.join(", "))]
    UnknownSource(Vec<String>),

    #[error("{tag} is enabled but {variable} is not set")]
    MissingCredential {
        tag: SourceTag,
        variable: &'static str,
    },
}

/// Funding API section (`[bizinfo]`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BizinfoSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// Procurement API section (`[g2b]`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct G2bSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Query window in days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_items: Option<usize>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// Agency scrape section (`[agency]`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgencySection {
    /// Registry ids to scrape. Empty means all.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rows: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_days: Option<i64>,
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data directory path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Database filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// Pause after each agency page, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_delay_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<BrowserEngineConfig>,
    #[serde(default)]
    pub bizinfo: BizinfoSection,
    #[serde(default)]
    pub g2b: G2bSection,
    #[serde(default)]
    pub agency: AgencySection,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Discover a `gonggo` config file in the standard locations.
    ///
    /// A missing or unreadable discovered file yields the defaults.
    pub async fn load() -> Self {
        match prefer::load("gonggo").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => match Self::load_from_path(path).await {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!("Ignoring config file: {}", e);
                        Self::default()
                    }
                },
                None => Self::default(),
            },
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    ///
    /// `.toml` files are parsed as TOML, everything else as JSON.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let mut config = Self::parse(path, &contents)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let parse_error = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(contents).map_err(|e| parse_error(e.to_string())),
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(contents).map_err(|e| parse_error(e.to_string()))
            }
            _ => serde_json::from_str(contents).map_err(|e| parse_error(e.to_string())),
        }
    }

    /// Fail on agency ids that are not in the registry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unknown = profiles::unknown_ids(&self.agency.sources);
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::UnknownSource(
                unknown.into_iter().map(String::from).collect(),
            ))
        }
    }

    /// Directory relative paths resolve against.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// Paths starting with ~ are expanded.
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref data_dir) = self.data_dir {
            settings.data_dir = self.resolve_path(data_dir, base_dir);
        }
        if let Some(ref database) = self.database {
            settings.database_filename = database.clone();
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.bizinfo.user_agent = Some(user_agent.clone());
            settings.g2b.user_agent = Some(user_agent.clone());
        }
        if let Some(timeout) = self.request_timeout {
            settings.bizinfo.timeout = Duration::from_secs(timeout);
        }
        if let Some(delay) = self.request_delay_ms {
            settings.agency.pause = Duration::from_millis(delay);
        }
        if let Some(ref browser) = self.browser {
            settings.browser = browser.clone();
        }

        if let Some(ref key) = self.bizinfo.api_key {
            settings.bizinfo.api_key = Some(key.clone());
        }
        if let Some(page_size) = self.bizinfo.page_size {
            settings.bizinfo.page_size = page_size;
        }

        if let Some(ref key) = self.g2b.api_key {
            settings.g2b.api_key = Some(key.clone());
        }
        if let Some(days) = self.g2b.days {
            settings.g2b.days = days;
        }
        if let Some(target) = self.g2b.target_items {
            settings.g2b.target_items = target;
        }
        if let Some(timeout) = self.g2b.timeout {
            settings.g2b.timeout = Duration::from_secs(timeout);
        }

        settings.agency_sources = self.agency.sources.clone();
        if let Some(max_rows) = self.agency.max_rows {
            settings.agency.max_rows = max_rows;
        }
        if let Some(days) = self.agency.recent_days {
            settings.agency.recent_days = days;
        }
    }
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    pub database_filename: String,
    /// Overrides `data_dir`/`database_filename` when set.
    pub database_url: Option<String>,
    pub browser: BrowserEngineConfig,
    pub bizinfo: BizinfoOptions,
    pub g2b: G2bOptions,
    pub agency: AgencyOptions,
    /// Registry ids to scrape, empty for all.
    pub agency_sources: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gonggo");

        Self {
            data_dir,
            database_filename: DEFAULT_DATABASE_FILENAME.to_string(),
            database_url: None,
            browser: BrowserEngineConfig::default(),
            bizinfo: BizinfoOptions::default(),
            g2b: G2bOptions::default(),
            agency: AgencyOptions::default(),
            agency_sources: Vec::new(),
        }
    }
}

impl Settings {
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Default::default()
        }
    }

    /// Get the database URL, constructing from path if not explicitly set.
    pub fn database_url(&self) -> String {
        match self.database_url {
            Some(ref url) => url.clone(),
            None => format!("sqlite:{}", self.database_path().display()),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_filename)
    }

    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)
    }

    pub fn create_db_context(&self) -> DbContext {
        DbContext::from_url(&self.database_url())
    }

    /// Apply environment overrides through `lookup`.
    ///
    /// Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(dir) = var("GONGGO_DATA_DIR") {
            self.data_dir = PathBuf::from(shellexpand::tilde(&dir).as_ref());
        }
        if let Some(url) = var("DATABASE_URL") {
            tracing::debug!("Using DATABASE_URL from environment: {}", url);
            self.database_url = Some(url);
        }
        if let Some(key) = var("BIZINFO_API_KEY") {
            self.bizinfo.api_key = Some(key);
        }
        if let Some(key) = var("G2B_API_KEY") {
            self.g2b.api_key = Some(key);
        }
        if let Some(url) = var("BROWSER_URL") {
            self.browser.remote_url = Some(url);
        }
    }

    /// Credentials missing for the given API sources.
    pub fn missing_credentials(&self, sources: &[SourceTag]) -> Vec<ConfigError> {
        sources
            .iter()
            .filter_map(|&tag| {
                let (key, variable) = match tag {
                    SourceTag::Bizinfo => (&self.bizinfo.api_key, "BIZINFO_API_KEY"),
                    SourceTag::G2b => (&self.g2b.api_key, "G2B_API_KEY"),
                    SourceTag::Agency => return None,
                };
                key.is_none()
                    .then_some(ConfigError::MissingCredential { tag, variable })
            })
            .collect()
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides discovery).
    pub config_path: Option<PathBuf>,
}

/// Load and validate settings: defaults, then file, then environment.
pub async fn load_settings(options: LoadOptions) -> Result<(Settings, Config), ConfigError> {
    let config = match options.config_path {
        Some(ref path) => Config::load_from_path(path).await?,
        None => Config::load().await,
    };
    config.validate()?;

    let base_dir = config
        .base_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings, &base_dir);
    settings.apply_env(|name| std::env::var(name).ok());

    Ok((settings, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE: &str = r#"
data_dir = "store"
request_delay_ms = 250

[browser]
headless = false

[bizinfo]
page_size = 100

[g2b]
days = 14
target_items = 50

[agency]
sources = ["kidp", "gdc"]
max_rows = 10
"#;

    #[test]
    fn test_toml_applies_to_settings() {
        let config = Config::parse(Path::new("gonggo.toml"), SAMPLE).unwrap();
        config.validate().unwrap();

        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings, Path::new("/etc/gonggo"));

        assert_eq!(settings.data_dir, PathBuf::from("/etc/gonggo/store"));
        assert_eq!(settings.agency.pause, Duration::from_millis(250));
        assert!(!settings.browser.headless);
        assert_eq!(settings.browser.page_load_timeout, 30);
        assert_eq!(settings.bizinfo.page_size, 100);
        assert_eq!(settings.g2b.days, 14);
        assert_eq!(settings.g2b.target_items, 50);
        assert_eq!(settings.agency_sources, vec!["kidp", "gdc"]);
        assert_eq!(settings.agency.max_rows, 10);
        assert_eq!(settings.agency.recent_days, 60);
    }

    #[test]
    fn test_json_is_the_fallback_format() {
        let config = Config::parse(
            Path::new("gonggo.conf"),
            r#"{"g2b": {"api_key": "abc"}, "agency": {"recent_days": 30}}"#,
        )
        .unwrap();
        assert_eq!(config.g2b.api_key.as_deref(), Some("abc"));
        assert_eq!(config.agency.recent_days, Some(30));

        assert!(matches!(
            Config::parse(Path::new("gonggo.json"), "not json"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_yaml_config() {
        let config = Config::parse(
            Path::new("gonggo.yml"),
            "request_delay_ms: 250\nagency:\n  sources: [kidp]\n",
        )
        .unwrap();
        config.validate().unwrap();
        assert_eq!(config.request_delay_ms, Some(250));
        assert_eq!(config.agency.sources, vec!["kidp".to_string()]);
    }

    #[test]
    fn test_unknown_agency_id_is_fatal() {
        let config = Config {
            agency: AgencySection {
                sources: vec!["kidp".into(), "nowhere".into()],
                ..Default::default()
            },
            ..Default::default()
        };
        match config.validate() {
            Err(ConfigError::UnknownSource(ids)) => assert_eq!(ids, vec!["nowhere"]),
            other => panic!("expected UnknownSource, got {:?}", other),
        }
    }

    #[test]
    fn test_env_overrides_file() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "sqlite:/tmp/override.db"),
            ("G2B_API_KEY", "from-env"),
            ("BIZINFO_API_KEY", ""),
            ("BROWSER_URL", "http://127.0.0.1:9222"),
        ]);

        let mut settings = Settings::default();
        settings.g2b.api_key = Some("from-file".into());
        settings.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(settings.database_url(), "sqlite:/tmp/override.db");
        assert_eq!(settings.g2b.api_key.as_deref(), Some("from-env"));
        assert_eq!(settings.bizinfo.api_key, None);
        assert_eq!(
            settings.browser.remote_url.as_deref(),
            Some("http://127.0.0.1:9222")
        );
    }

    #[test]
    fn test_missing_credentials() {
        let mut settings = Settings::with_data_dir(PathBuf::from("/tmp"));
        settings.g2b.api_key = Some("k".into());

        let missing = settings.missing_credentials(&SourceTag::ALL);
        assert_eq!(missing.len(), 1);
        assert!(matches!(
            missing[0],
            ConfigError::MissingCredential {
                tag: SourceTag::Bizinfo,
                variable: "BIZINFO_API_KEY"
            }
        ));
        assert_eq!(
            settings.database_url(),
            format!("sqlite:{}", Path::new("/tmp/gonggo.db").display())
        );
    }

    #[tokio::test]
    async fn test_load_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gonggo.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.base_dir().as_deref(), Some(dir.path()));

        let missing = Config::load_from_path(&dir.path().join("absent.toml")).await;
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
