// file: src/config.rs
// description: layered configuration (defaults, toml, environment) for the sync daemon
// reference: https://docs.rs/config

use crate::error::{Result, SyncError};
use crate::utils::validation::Validator;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use dotenvy::dotenv;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const DEFAULT_SYNC_DIRECTORY: &str = "/app/data";
pub const DEFAULT_KNOWLEDGE_TOKEN: &str = "your-webui-token-here";
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_ALLOWED_EXTENSIONS: &str = ".md,.txt";

const ENV_PREFIX: &str = "REPO_SYNC";

/// Flat variable names understood for compatibility with existing deployments.
/// Applied as overrides, so they win over the file and prefixed variables.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("GITHUB_TOKEN", "repository.token"),
    ("GITHUB_USERNAME", "repository.username"),
    ("REPO_URL", "repository.url"),
    ("SYNC_DIRECTORY", "repository.local_path"),
    ("WEBUI_URL", "knowledge.base_url"),
    ("TOKEN", "knowledge.token"),
    ("KNOWLEDGE_ID", "knowledge.collection_id"),
    ("SYNC_INTERVAL", "sync.interval_secs"),
    ("ALLOWED_EXTENSIONS", "sync.allowed_extensions"),
];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub repository: RepositoryConfig,
    pub knowledge: KnowledgeConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepositoryConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    pub local_path: PathBuf,
    pub vcs_binary: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KnowledgeConfig {
    pub base_url: String,
    pub token: String,
    pub collection_id: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    pub interval_secs: u64,
    #[serde(deserialize_with = "deserialize_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl KnowledgeConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl SyncConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Config {
    /// Load configuration from `.env`, an optional toml file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();
        Self::load_with_env(path, std::env::vars().collect())
    }

    /// Same as [`Config::load`] but reads variables from `env` instead of the process.
    pub fn load_with_env(path: Option<&Path>, env: HashMap<String, String>) -> Result<Self> {
        let mut builder = with_defaults(config::Config::builder()).map_err(config_error)?;

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path)),
            None => builder
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false)),
        };

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(Some(env.clone())),
        );

        for (var, key) in LEGACY_ENV_KEYS {
            if let Some(value) = env.get(*var) {
                builder = builder
                    .set_override(*key, value.as_str())
                    .map_err(config_error)?;
            }
        }

        let settings = builder.build().map_err(config_error)?;

        let mut config: Config = settings.try_deserialize().map_err(config_error)?;

        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            repository: RepositoryConfig {
                url: None,
                username: None,
                token: None,
                local_path: PathBuf::from(DEFAULT_SYNC_DIRECTORY),
                vcs_binary: "git".to_string(),
            },
            knowledge: KnowledgeConfig {
                base_url: String::new(),
                token: DEFAULT_KNOWLEDGE_TOKEN.to_string(),
                collection_id: String::new(),
                request_timeout_secs: 30,
                max_retries: 1,
                retry_backoff_ms: 1000,
            },
            sync: SyncConfig {
                interval_secs: DEFAULT_SYNC_INTERVAL_SECS,
                allowed_extensions: parse_extensions(DEFAULT_ALLOWED_EXTENSIONS),
            },
        }
    }

    fn normalize(&mut self) {
        let repo = &mut self.repository;
        repo.url = non_blank(repo.url.take());
        repo.username = non_blank(repo.username.take());
        repo.token = non_blank(repo.token.take());
        self.knowledge.base_url = self.knowledge.base_url.trim().to_string();
    }

    fn validate(&self) -> Result<()> {
        if !self.knowledge.base_url.is_empty() {
            Validator::validate_url(&self.knowledge.base_url)?;
        }

        if self.knowledge.request_timeout_secs == 0 {
            return Err(SyncError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.repository.vcs_binary.trim().is_empty() {
            return Err(SyncError::Config("vcs_binary must not be empty".to_string()));
        }

        Ok(())
    }
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> std::result::Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("repository.local_path", DEFAULT_SYNC_DIRECTORY)?
        .set_default("repository.vcs_binary", "git")?
        .set_default("knowledge.base_url", "")?
        .set_default("knowledge.token", DEFAULT_KNOWLEDGE_TOKEN)?
        .set_default("knowledge.collection_id", "")?
        .set_default("knowledge.request_timeout_secs", 30_i64)?
        .set_default("knowledge.max_retries", 1_i64)?
        .set_default("knowledge.retry_backoff_ms", 1000_i64)?
        .set_default("sync.interval_secs", DEFAULT_SYNC_INTERVAL_SECS as i64)?
        .set_default("sync.allowed_extensions", DEFAULT_ALLOWED_EXTENSIONS)
}

fn config_error(e: ConfigError) -> SyncError {
    SyncError::Config(e.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Split a comma-separated suffix list, trimming entries and dropping empty ones.
pub fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|ext| !ext.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExtensionList {
    Csv(String),
    List(Vec<String>),
}

fn deserialize_extensions<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match ExtensionList::deserialize(deserializer)? {
        ExtensionList::Csv(raw) => parse_extensions(&raw),
        ExtensionList::List(items) => items
            .iter()
            .map(|ext| ext.trim())
            .filter(|ext| !ext.is_empty())
            .map(str::to_string)
            .collect(),
    })
}
