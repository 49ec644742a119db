//! CLI configuration.
//!
//! Loaded from `config.toml` under the platform config directory, with
//! `FINPAY_*` environment variables taking precedence. Every field has a
//! default so a fresh install works against a local gateway with no config
//! file at all.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_api_base_url() -> String {
    // The API gateway; service prefixes are routed behind it.
    "http://localhost:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the FinPay API gateway.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Directory holding local state (session database). Defaults to the
    /// platform data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Per-request timeout for all HTTP calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            data_dir: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Load from the default config file (if present), then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_file() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Default config file location (`<config dir>/finpayctl/config.toml`).
    pub fn config_file() -> Option<PathBuf> {
        ProjectDirs::from("io", "finpay", "finpayctl")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// `FINPAY_API_URL`, `FINPAY_DATA_DIR`, `FINPAY_TIMEOUT_SECS`.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("FINPAY_API_URL") {
            if !url.is_empty() {
                self.api_base_url = url;
            }
        }
        if let Ok(dir) = std::env::var("FINPAY_DATA_DIR") {
            if !dir.is_empty() {
                self.data_dir = Some(PathBuf::from(dir));
            }
        }
        if let Ok(timeout) = std::env::var("FINPAY_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.request_timeout_secs = secs;
            }
        }
    }

    /// Resolve (and create) the local state directory.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => ProjectDirs::from("io", "finpay", "finpayctl")
                .context("no home directory available")?
                .data_dir()
                .to_path_buf(),
        };
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating data directory {}", dir.display()))?;
        Ok(dir)
    }

    /// Path of the durable session database.
    pub fn session_db_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("session.db"))
    }
}

// ── Tests ────────────────────────────────────────────────────────
