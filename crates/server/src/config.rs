//! Runtime configuration, read from environment variables.
//!
//! | variable               | default          |
//! |------------------------|------------------|
//! | `MATCHING_DATA_DIR`    | `data`           |
//! | `MATCHING_BIND_ADDR`   | `127.0.0.1:3000` |
//! | `MATCHING_LIMIT`       | `5`              |
//! | `OPENAI_API_KEY`       | unset            |
//! | `OPENAI_BASE_URL`      | `https://api.openai.com` |
//! | `MATCHING_MODEL`       | `gpt-4o`         |
//! | `MATCHING_TEMPERATURE` | `0.3`            |
//!
//! Without an API key there is no model backend and every request is
//! scored by the rule engine.
//!
//! Both binaries call `load_env_file` first, so a `.env` file in the working
//! directory can supply any of these. Variables already set in the process
//! environment win over the file.

use llm_client::{LlmConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::orchestrator::DEFAULT_LIMIT;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    /// Maximum number of recommendations per request
    pub limit: usize,
    /// `None` when no API key is configured
    pub llm: Option<LlmConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            limit: DEFAULT_LIMIT,
            llm: None,
        }
    }
}

/// Load `KEY=value` pairs from `path` into the process environment.
///
/// Returns whether a file was loaded. A missing file is not an error.
pub fn load_env_file(path: &Path) -> bool {
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!("Config: loaded variables from {:?}", path);
            true
        }
        Err(e) if e.not_found() => {
            debug!("Config: no env file at {:?}, using process environment", path);
            false
        }
        Err(e) => {
            warn!("Config: could not read {:?}: {}", path, e);
            false
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let mut limit = var_or(&lookup, "MATCHING_LIMIT", defaults.limit);
        if limit == 0 {
            warn!("Config: MATCHING_LIMIT must be at least 1, using {}", DEFAULT_LIMIT);
            limit = DEFAULT_LIMIT;
        }

        let llm = lookup("OPENAI_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .map(|key| {
                LlmConfig::new(key)
                    .with_base_url(var_or(&lookup, "OPENAI_BASE_URL", DEFAULT_BASE_URL.to_string()))
                    .with_model(var_or(&lookup, "MATCHING_MODEL", DEFAULT_MODEL.to_string()))
                    .with_temperature(var_or(&lookup, "MATCHING_TEMPERATURE", DEFAULT_TEMPERATURE))
            });

        Self {
            data_dir: var_or(&lookup, "MATCHING_DATA_DIR", defaults.data_dir),
            bind_addr: var_or(&lookup, "MATCHING_BIND_ADDR", defaults.bind_addr),
            limit,
            llm,
        }
    }
}

/// Parse `key` if set, otherwise (or if it doesn't parse) use `default`
fn var_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
{
    let Some(val) = lookup(key) else {
        return default;
    };
    match val.trim().parse::<T>() {
        Ok(parsed) => {
            debug!("Config: {} = {} (from environment)", key, val.trim());
            parsed
        }
        Err(_) => {
            warn!("Config: {} = '{}' (parse failed, using default)", key, val);
            default
        }
    }
}
