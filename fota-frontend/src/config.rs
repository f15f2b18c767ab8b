use std::path::Path;
use std::sync::OnceLock;

use anyhow::Context;
use fota_common::SessionContext;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://api.fortsontheair.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("fota-frontend/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Stands in for the browser's callsign cookie when driving views from the
/// command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub callsign: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            session: SessionConfig::default(),
            log_level: default_log_level(),
            log_dir: default_log_dir(),
        }
    }
}

impl FrontendConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: FrontendConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn session(&self) -> SessionContext {
        self.session
            .callsign
            .as_deref()
            .map(SessionContext::for_callsign)
            .unwrap_or_default()
    }
}

pub static CONFIG: OnceLock<FrontendConfig> = OnceLock::new();

/// Load the process-wide configuration. A missing file means defaults; a
/// malformed one is an error. It can be loaded once per process; later calls
/// fail instead of returning the first configuration.
pub fn read_config(path: impl AsRef<Path>) -> anyhow::Result<&'static FrontendConfig> {
    let path = path.as_ref();
    let config = if path.exists() {
        FrontendConfig::from_file(path)?
    } else {
        FrontendConfig::default()
    };

    CONFIG
        .set(config)
        .map_err(|_| anyhow::anyhow!("Configuration already loaded, ignoring {}", path.display()))?;
    CONFIG.get().context("Configuration missing after load")
}
