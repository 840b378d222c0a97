//! Session configuration
//!
//! Handles defaults, config-file values, and CLI/env overrides with proper
//! precedence (CLI > Env > File > Defaults). The env layer rides on clap's
//! `env` attribute, so flags and their environment fallbacks arrive here
//! already merged.

use anyhow::{bail, Result};
use serde::Deserialize;

use crate::domain::DEFAULT_MAX_CHUNK_SIZE;

pub mod loader;

pub use loader::load_config;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 90;

/// Values the binary surface may override (flags or their env fallbacks).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub max_chunk_size: Option<usize>,
    pub request_timeout_secs: Option<u64>,
}

/// On-disk config shape; all fields optional, see [`loader`].
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileConfig {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub max_chunk_size: Option<usize>,
    pub request_timeout_secs: Option<u64>,
}

/// Fully-resolved configuration threaded through the session.
///
/// The API credential lives here, not in the process environment: it is
/// acquired once at startup and passed to every component needing it.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub model: String,
    pub base_url: String,
    pub max_chunk_size: usize,
    pub request_timeout_secs: u64,
    pub api_key: String,
}

impl SessionConfig {
    pub fn resolve(cli: &CliOverrides, file: FileConfig, api_key: String) -> Result<Self> {
        let max_chunk_size =
            cli.max_chunk_size.or(file.max_chunk_size).unwrap_or(DEFAULT_MAX_CHUNK_SIZE);
        if max_chunk_size == 0 {
            bail!("max_chunk_size must be positive");
        }

        Ok(Self {
            model: cli.model.clone().or(file.model).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: cli
                .base_url
                .clone()
                .or(file.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            max_chunk_size,
            request_timeout_secs: cli
                .request_timeout_secs
                .or(file.request_timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            api_key,
        })
    }
}
