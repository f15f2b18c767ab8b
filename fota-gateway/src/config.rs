use fota_frontend::config::ApiConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Port to bind the server to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether to bind to all interfaces (0.0.0.0) or just localhost
    #[serde(default = "default_bind_all")]
    pub bind_all: bool,

    /// Allow cross-origin requests from any origin
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Backend the views are loaded from
    #[serde(default)]
    pub api: ApiConfig,
}

fn default_port() -> u16 {
    3030
}

fn default_bind_all() -> bool {
    true
}

fn default_enable_cors() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_all: default_bind_all(),
            enable_cors: default_enable_cors(),
            log_level: default_log_level(),
            api: ApiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file. A missing file means defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        Ok(config)
    }

    pub fn bind_ip(&self) -> [u8; 4] {
        if self.bind_all {
            [0, 0, 0, 0]
        } else {
            [127, 0, 0, 1]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_overrides() {
        let config: Config = toml::from_str(
            r#"
port = 8081
bind_all = false

[api]
base_url = "http://localhost:8080"
"#,
        )
        .unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.bind_ip(), [127, 0, 0, 1]);
        assert!(config.enable_cors);
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("does-not-exist.toml").unwrap();
        assert_eq!(config.port, 3030);
        assert_eq!(config.log_level, "info");
    }
}
