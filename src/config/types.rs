//! Struct definitions for nanocode configuration.
//!
//! [`FileConfig`] mirrors `config.toml` with every field optional.
//! [`Config`] is the resolved, immutable result handed to the rest of the
//! program.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::provider::ProviderKind;

/// Settings as written in `config.toml`. Absent keys fall back to defaults.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct FileConfig {
    /// Model identifier used when neither `MODEL` nor a provider entry sets one.
    pub model: Option<String>,
    /// Token ceiling for each completion.
    pub max_tokens: Option<u32>,
    /// Maximum model calls per user turn.
    pub max_iterations: Option<usize>,
    /// Timeout for one model request, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Replaces the default system prompt.
    pub system_prompt: Option<String>,
    /// Log filter directive (e.g. `"debug"`), overridden by `RUST_LOG`.
    pub log_level: Option<String>,
    /// Per-provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Provider-specific configuration map.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderConfig {
    /// Configuration for the Anthropic API provider.
    pub anthropic: Option<ProviderEntry>,
    /// Configuration for the OpenRouter API provider.
    pub openrouter: Option<ProviderEntry>,
}

/// Connection details for a single LLM provider.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderEntry {
    /// API key for authentication. The environment variable wins when set.
    pub api_key: Option<String>,
    /// Full messages endpoint URL (useful for proxies).
    pub base_url: Option<String>,
    /// Model identifier to use with this provider.
    pub model: Option<String>,
}

/// Resolved configuration, built once at startup and passed by reference.
#[derive(Clone)]
pub struct Config {
    pub provider: ProviderKind,
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub max_iterations: usize,
    pub request_timeout: Duration,
    pub system_prompt: String,
    pub log_level: String,
    /// Directory the file tools and shell commands operate in.
    pub working_dir: PathBuf,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("max_iterations", &self.max_iterations)
            .field("request_timeout", &self.request_timeout)
            .field("log_level", &self.log_level)
            .field("working_dir", &self.working_dir)
            .finish()
    }
}
