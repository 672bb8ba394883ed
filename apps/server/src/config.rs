//! Server configuration.
//!
//! Settings are read from TOML at `$ADUPLOAD_CONFIG`, falling back to
//! `~/.config/adupload/server.toml`. A missing file means defaults. The
//! environment then overrides:
//! - `PORT`: listen port
//! - `FACEBOOK_ACCESS_TOKEN`: Graph access token (required)

use std::path::{Path, PathBuf};
use std::time::Duration;

use adupload_graph::GraphConfig;
use adupload_protocol::constants::{
    DEFAULT_API_VERSION, DEFAULT_GRAPH_BASE_URL, DEFAULT_MAX_VIDEO_SIZE,
};
use adupload_source::SourceConfig;
use adupload_transfer::DEFAULT_CHUNK_SIZE;
use adupload_uploader::UploadConfig;
use serde::{Deserialize, Serialize};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ADUPLOAD_CONFIG";
/// Environment variable overriding `[server] port`.
pub const PORT_ENV: &str = "PORT";
/// Environment variable carrying the Graph access token.
pub const ACCESS_TOKEN_ENV: &str = "FACEBOOK_ACCESS_TOKEN";

/// Full server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub graph: GraphSection,
    #[serde(default)]
    pub source: SourceSection,
    #[serde(default)]
    pub upload: UploadSection,

    /// Only ever read from the environment.
    #[serde(skip)]
    pub access_token: String,
}

/// `[server]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on one inbound request, upload and polling included.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// `[graph]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Timeout for start, finish and status calls.
    #[serde(default = "default_graph_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Timeout for each chunk transfer.
    #[serde(default = "default_transfer_timeout_secs")]
    pub transfer_timeout_secs: u64,
}

/// `[source]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

/// `[upload]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSection {
    #[serde(default = "default_max_video_size")]
    pub max_video_size: u64,

    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,

    #[serde(default = "default_inter_chunk_delay_ms")]
    pub inter_chunk_delay_ms: u64,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_retry_backoff_secs")]
    pub retry_backoff_secs: u64,
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout_secs() -> u64 {
    1800
}

fn default_base_url() -> String {
    DEFAULT_GRAPH_BASE_URL.into()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.into()
}

fn default_graph_request_timeout_secs() -> u64 {
    60
}

fn default_transfer_timeout_secs() -> u64 {
    120
}

fn default_probe_timeout_secs() -> u64 {
    30
}

fn default_fetch_timeout_secs() -> u64 {
    120
}

fn default_max_video_size() -> u64 {
    DEFAULT_MAX_VIDEO_SIZE
}

fn default_chunk_size() -> u64 {
    DEFAULT_CHUNK_SIZE
}

fn default_inter_chunk_delay_ms() -> u64 {
    300
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_poll_attempts() -> u32 {
    10
}

fn default_max_attempts() -> u32 {
    2
}

fn default_retry_backoff_secs() -> u64 {
    5
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for GraphSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: default_api_version(),
            request_timeout_secs: default_graph_request_timeout_secs(),
            transfer_timeout_secs: default_transfer_timeout_secs(),
        }
    }
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            probe_timeout_secs: default_probe_timeout_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl Default for UploadSection {
    fn default() -> Self {
        Self {
            max_video_size: default_max_video_size(),
            chunk_size: default_chunk_size(),
            inter_chunk_delay_ms: default_inter_chunk_delay_ms(),
            poll_interval_secs: default_poll_interval_secs(),
            poll_attempts: default_poll_attempts(),
            max_attempts: default_max_attempts(),
            retry_backoff_secs: default_retry_backoff_secs(),
        }
    }
}

impl Config {
    /// Loads the config file, applies environment overrides and validates.
    pub fn load() -> anyhow::Result<Self> {
        let path = match std::env::var(CONFIG_ENV) {
            Ok(p) if !p.is_empty() => PathBuf::from(p),
            _ => config_path(),
        };

        let mut config = Self::from_file(&path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`, or returns defaults when it does not exist.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {e}", path.display()))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Applies `PORT` and `FACEBOOK_ACCESS_TOKEN` from `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup(PORT_ENV) {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %port, "ignoring invalid PORT"),
            }
        }
        if let Some(token) = lookup(ACCESS_TOKEN_ENV) {
            self.access_token = token.trim().to_string();
        }
    }

    /// Rejects configurations the server cannot start with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.access_token.is_empty() {
            anyhow::bail!("{ACCESS_TOKEN_ENV} is not set");
        }
        self.upload_config()
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid [upload] section: {e}"))?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    pub fn graph_config(&self) -> GraphConfig {
        GraphConfig {
            base_url: self.graph.base_url.clone(),
            api_version: self.graph.api_version.clone(),
            access_token: self.access_token.clone(),
            request_timeout: Duration::from_secs(self.graph.request_timeout_secs),
            transfer_timeout: Duration::from_secs(self.graph.transfer_timeout_secs),
        }
    }

    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            probe_timeout: Duration::from_secs(self.source.probe_timeout_secs),
            fetch_timeout: Duration::from_secs(self.source.fetch_timeout_secs),
        }
    }

    pub fn upload_config(&self) -> UploadConfig {
        let upload = &self.upload;
        UploadConfig {
            max_video_size: upload.max_video_size,
            chunk_size: upload.chunk_size,
            inter_chunk_delay: Duration::from_millis(upload.inter_chunk_delay_ms),
            poll_interval: Duration::from_secs(upload.poll_interval_secs),
            poll_attempts: upload.poll_attempts,
            max_attempts: upload.max_attempts,
            retry_backoff: Duration::from_secs(upload.retry_backoff_secs),
        }
    }
}

/// Default configuration file path.
fn config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("adupload").join("server.toml")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("adupload")
            .join("server.toml")
    }
}
