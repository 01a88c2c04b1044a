use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::warn;

use crate::error::ConsoleError;

pub const CONFIG_PATH_ENV: &str = "BACKLOG_CONSOLE_CONFIG";
pub const API_URL_ENV: &str = "BACKLOG_CONSOLE_API_URL";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ConsoleConfig {
    pub api: ApiConf,
    pub polling: PollingConf,
    pub logs: LogsConf,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConf {
    pub base_url: String, // ex: "http://127.0.0.1:8000"
    pub timeout_secs: Option<u64>, // aucun timeout par défaut
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PollingConf {
    pub interval_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogsConf {
    pub dashboard_limit: usize,
    pub page_limit: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api: ApiConf::default(),
            polling: PollingConf::default(),
            logs: LogsConf::default(),
        }
    }
}

impl Default for ApiConf {
    fn default() -> Self {
        Self { base_url: "http://127.0.0.1:8000".into(), timeout_secs: None }
    }
}

impl Default for PollingConf {
    fn default() -> Self {
        Self { interval_secs: 30 }
    }
}

impl Default for LogsConf {
    fn default() -> Self {
        Self { dashboard_limit: 5, page_limit: 50 }
    }
}

impl ConsoleConfig {
    pub fn from_yaml_str(txt: &str) -> Result<Self, ConsoleError> {
        if txt.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: ConsoleConfig =
            serde_yaml::from_str(txt).map_err(|e| ConsoleError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConsoleError> {
        if self.polling.interval_secs == 0 {
            return Err(ConsoleError::Config("polling.interval_secs must be > 0".into()));
        }
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://")) {
            return Err(ConsoleError::Config(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.polling.interval_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.api.timeout_secs.map(Duration::from_secs)
    }

    /// Surcharge par variable d'environnement (après lecture du fichier)
    pub fn apply_env(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url.trim().to_string();
            }
        }
        self
    }
}

/// Charge la config depuis un chemin ; fichier absent ou invalide = défauts
pub async fn load_config_from<P: AsRef<Path>>(path: P) -> ConsoleConfig {
    let path = path.as_ref();
    if !path.exists() {
        warn!("no config at {}, using defaults", path.display());
        return ConsoleConfig::default();
    }
    let txt = fs::read_to_string(path).await.unwrap_or_default();
    ConsoleConfig::from_yaml_str(&txt).unwrap_or_else(|e| {
        warn!("invalid config {}: {}", path.display(), e);
        ConsoleConfig::default()
    })
}

pub async fn load_config() -> ConsoleConfig {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "console.yaml".into());
    load_config_from(path).await.apply_env()
}
