//! Provider kind enumeration and per-provider defaults.
//!
//! Both supported providers speak the same Messages API shape; they differ
//! only in endpoint, authentication header and default model.

use crate::constants::{
    ANTHROPIC_API_URL, DEFAULT_ANTHROPIC_MODEL, DEFAULT_OPENROUTER_MODEL, OPENROUTER_API_URL,
};

/// Identifies which LLM provider to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Anthropic (Claude models), authenticated with `x-api-key`.
    Anthropic,
    /// OpenRouter (multi-provider gateway), authenticated with a bearer token.
    OpenRouter,
}

impl ProviderKind {
    /// Human-readable name for the startup banner.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Anthropic => "Anthropic",
            Self::OpenRouter => "OpenRouter",
        }
    }

    /// Default model identifier for this provider.
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Anthropic => DEFAULT_ANTHROPIC_MODEL,
            Self::OpenRouter => DEFAULT_OPENROUTER_MODEL,
        }
    }

    /// Default messages endpoint for this provider.
    pub fn api_url(&self) -> &'static str {
        match self {
            Self::Anthropic => ANTHROPIC_API_URL,
            Self::OpenRouter => OPENROUTER_API_URL,
        }
    }

    /// Authentication header name and value for the given key.
    pub fn auth_header(&self, api_key: &str) -> (&'static str, String) {
        match self {
            Self::Anthropic => ("x-api-key", api_key.to_string()),
            Self::OpenRouter => ("authorization", format!("Bearer {}", api_key)),
        }
    }
}
