//! Server configuration.
//!
//! Everything is read from `PIPELINE_TRACE_*` environment variables, with
//! defaults suitable for running next to a local pipeline.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::providers::{default_providers, ProviderSpec};

const DEFAULT_BIND: &str = "0.0.0.0:8787";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Messages live only as long as the process.
    InMemory,
    /// Messages are appended to a JSON-lines file and replayed on start.
    Jsonl(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageConfig,
    /// Directory holding the built UI (`trunk build` output).
    pub static_dir: PathBuf,
    /// How long a routine provider listing may be served from cache.
    pub provider_ttl: Duration,
    pub providers: Vec<ProviderSpec>,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND.parse().unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 8787))),
            storage: StorageConfig::Jsonl(default_data_file()),
            static_dir: PathBuf::from("dist"),
            provider_ttl: Duration::from_secs(300),
            providers: default_providers(),
            cors_origins: Vec::new(),
            log_json: false,
        }
    }
}

impl ServerConfig {
    /// Environment variables:
    /// - `PIPELINE_TRACE_BIND`: listen address (default: 0.0.0.0:8787)
    /// - `PIPELINE_TRACE_DATA_FILE`: JSON-lines message log
    /// - `PIPELINE_TRACE_IN_MEMORY`: "true" to keep messages in memory only
    /// - `PIPELINE_TRACE_STATIC_DIR`: built UI directory (default: dist)
    /// - `PIPELINE_TRACE_PROVIDER_TTL_SECS`: provider cache lifetime (default: 300)
    /// - `PIPELINE_TRACE_CORS_ORIGINS`: comma-separated origins (empty = any)
    /// - `PIPELINE_TRACE_LOG_JSON`: "true" for JSON log lines
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_addr = match env::var("PIPELINE_TRACE_BIND") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                eprintln!("Ignoring PIPELINE_TRACE_BIND={raw}: {e}");
                defaults.bind_addr
            }),
            Err(_) => defaults.bind_addr,
        };

        let storage = if flag("PIPELINE_TRACE_IN_MEMORY") {
            StorageConfig::InMemory
        } else {
            env::var("PIPELINE_TRACE_DATA_FILE")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(|p| StorageConfig::Jsonl(PathBuf::from(p)))
                .unwrap_or(defaults.storage)
        };

        let static_dir = env::var("PIPELINE_TRACE_STATIC_DIR")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        let provider_ttl = env::var("PIPELINE_TRACE_PROVIDER_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.provider_ttl);

        let cors_origins = env::var("PIPELINE_TRACE_CORS_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            bind_addr,
            storage,
            static_dir,
            provider_ttl,
            providers: defaults.providers,
            cors_origins,
            log_json: flag("PIPELINE_TRACE_LOG_JSON"),
        }
    }

    /// In-memory configuration used by tests and embedded servers.
    pub fn in_memory() -> Self {
        Self {
            storage: StorageConfig::InMemory,
            ..Self::default()
        }
    }
}

fn flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn default_data_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pipeline-trace")
        .join("messages.jsonl")
}
