use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_API_URL: &str = "http://localhost:3000/api/cotacoes";
const COLLECTION_PATH: &str = "/api/cotacoes";
const HEALTH_PATH: &str = "/health";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid URL for {field}: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("Sync poll_interval_ms must be greater than 0")]
    ZeroPollInterval,

    #[error("Remote request_timeout_secs must be greater than 0")]
    ZeroRequestTimeout,

    #[error("Storage cache_key cannot be empty")]
    EmptyCacheKey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub remote: RemoteConfig,
    pub sync: SyncConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub api_url: String,
    #[serde(default)]
    pub health_url: Option<String>,
    pub request_timeout_secs: u64,
    /// Opaque `Authorization` header value issued by the identity provider.
    #[serde(default, skip_serializing)]
    pub authorization: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub enabled: bool,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    pub cache_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote: RemoteConfig {
                api_url: DEFAULT_API_URL.to_string(),
                health_url: None,
                request_timeout_secs: 10,
                authorization: None,
            },
            sync: SyncConfig {
                enabled: true,
                poll_interval_ms: 3000,
            },
            storage: StorageConfig {
                data_dir: default_data_dir(),
                cache_key: "cotacoes_frete".to_string(),
            },
        }
    }
}

impl RemoteConfig {
    /// Liveness endpoint: explicit `health_url`, else `/health` on the API host.
    pub fn health_endpoint(&self) -> String {
        if let Some(url) = self.health_url.as_deref().filter(|u| !u.trim().is_empty()) {
            return url.trim().to_string();
        }
        let api_url = self.api_url.trim().trim_end_matches('/');
        if api_url.contains(COLLECTION_PATH) {
            return api_url.replacen(COLLECTION_PATH, HEALTH_PATH, 1);
        }
        match Url::parse(api_url) {
            Ok(mut url) => {
                url.set_path(HEALTH_PATH);
                url.set_query(None);
                url.to_string()
            }
            Err(_) => format!("{api_url}{HEALTH_PATH}"),
        }
    }
}

impl StorageConfig {
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("COTACOES_API_URL") {
            if !v.trim().is_empty() {
                cfg.remote.api_url = v.trim().to_string();
            }
        }
        if let Ok(v) = std::env::var("COTACOES_HEALTH_URL") {
            if !v.trim().is_empty() {
                cfg.remote.health_url = Some(v.trim().to_string());
            }
        }
        if let Ok(v) = std::env::var("COTACOES_REQUEST_TIMEOUT_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.remote.request_timeout_secs = value;
            }
        }
        if let Ok(v) = std::env::var("COTACOES_AUTHORIZATION") {
            if !v.trim().is_empty() {
                cfg.remote.authorization = Some(v.trim().to_string());
            }
        }

        if let Ok(v) = std::env::var("COTACOES_SYNC_ENABLED") {
            cfg.sync.enabled = parse_bool(&v, cfg.sync.enabled);
        }
        if let Ok(v) = std::env::var("COTACOES_POLL_INTERVAL_MS") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.poll_interval_ms = value;
            }
        }

        if let Ok(v) = std::env::var("COTACOES_DATA_DIR") {
            if !v.trim().is_empty() {
                cfg.storage.data_dir = v.trim().to_string();
            }
        }
        if let Ok(v) = std::env::var("COTACOES_CACHE_KEY") {
            cfg.storage.cache_key = v.trim().to_string();
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if Url::parse(&self.remote.api_url).is_err() {
            return Err(ConfigError::InvalidUrl {
                field: "api_url",
                value: self.remote.api_url.clone(),
            });
        }
        let health = self.remote.health_endpoint();
        if Url::parse(&health).is_err() {
            return Err(ConfigError::InvalidUrl {
                field: "health_url",
                value: health,
            });
        }
        if self.remote.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroRequestTimeout);
        }
        if self.sync.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.storage.cache_key.trim().is_empty() {
            return Err(ConfigError::EmptyCacheKey);
        }
        Ok(())
    }
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|dir| dir.join("cotacoes-frete"))
        .unwrap_or_else(|| PathBuf::from("./data"))
        .to_string_lossy()
        .into_owned()
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}
