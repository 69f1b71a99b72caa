use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub reports: ReportsConfig,

    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    /// Root of the published artifacts, one directory per player
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,

    /// Static indexes served for non-released statuses
    #[serde(default = "default_fixtures_dir")]
    pub fixtures_dir: PathBuf,

    /// Optional directory with `<template>.smil` overrides
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,

    /// URL devices poll for their index; used for the task schedule subscription
    #[serde(default = "default_public_url")]
    pub public_url: String,

    /// Upper bound for serving one request (default: 30)
    #[serde(default = "default_compile_timeout")]
    pub compile_timeout_secs: u64,
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("./var/index")
}

fn default_fixtures_dir() -> PathBuf {
    PathBuf::from("./resources/smil")
}

fn default_public_url() -> String {
    "http://localhost:8080/smil-index".to_string()
}

fn default_compile_timeout() -> u64 {
    30
}

impl IndexConfig {
    pub fn compile_timeout(&self) -> Duration {
        Duration::from_secs(self.compile_timeout_secs)
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            index_dir: default_index_dir(),
            fixtures_dir: default_fixtures_dir(),
            templates_dir: None,
            public_url: default_public_url(),
            compile_timeout_secs: default_compile_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentConfig {
    /// Timeout for fetching external playlists (default: 5)
    #[serde(default = "default_external_timeout")]
    pub external_timeout_secs: u64,

    /// Deepest allowed playlist nesting
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Most placeholders spliced in one resolution
    #[serde(default = "default_max_expansions")]
    pub max_expansions: usize,
}

fn default_external_timeout() -> u64 {
    5
}

fn default_max_depth() -> usize {
    16
}

fn default_max_expansions() -> usize {
    256
}

impl ContentConfig {
    pub fn external_timeout(&self) -> Duration {
        Duration::from_secs(self.external_timeout_secs)
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            external_timeout_secs: default_external_timeout(),
            max_depth: default_max_depth(),
            max_expansions: default_max_expansions(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportsConfig {
    /// Base URL devices push telemetry to
    #[serde(default = "default_report_server")]
    pub server_url: String,
}

fn default_report_server() -> String {
    "http://localhost:8080/reports".to_string()
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            server_url: default_report_server(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./playout.db")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}
