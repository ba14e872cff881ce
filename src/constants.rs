//! Centralized constants for nanocode.
//!
//! All magic numbers, default strings, and configuration constants live here
//! so they can be changed in one place.

/// Application name used in CLI output and directory paths.
pub const APP_NAME: &str = "nanocode";

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Readline history filename.
pub const HISTORY_FILENAME: &str = "history.txt";

/// Log filename, written under the local data directory.
pub const LOG_FILENAME: &str = "nanocode.log";

/// Default log level when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// --- Provider defaults ---

/// Environment variable holding the OpenRouter key. Its presence selects OpenRouter.
pub const OPENROUTER_KEY_VAR: &str = "OPENROUTER_API_KEY";

/// Environment variable holding the Anthropic key.
pub const ANTHROPIC_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Environment variable overriding the model identifier.
pub const MODEL_VAR: &str = "MODEL";

/// Messages endpoint for Anthropic.
pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Messages endpoint for OpenRouter (Anthropic-compatible).
pub const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/messages";

/// Default model identifier for Anthropic.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-opus-4-5";

/// Default model identifier for OpenRouter.
pub const DEFAULT_OPENROUTER_MODEL: &str = "anthropic/claude-opus-4.5";

/// Value of the `anthropic-version` header sent with every request.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Maximum tokens for LLM completions.
pub const MAX_TOKENS: u32 = 8192;

/// Timeout for one model request.
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Maximum model calls per user turn before the loop gives up.
pub const MAX_AGENT_ITERATIONS: usize = 50;

// --- Tool limits ---

/// Deadline for the `bash` tool.
pub const BASH_TIMEOUT_SECS: u64 = 30;

/// Deadline for the `gh` tool.
pub const GH_TIMEOUT_SECS: u64 = 60;

/// Timeout for the web search request.
pub const SEARCH_TIMEOUT_SECS: u64 = 10;

/// Maximum number of search results returned to the model.
pub const SEARCH_MAX_RESULTS: usize = 5;

/// DuckDuckGo HTML results endpoint.
pub const SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

/// User agent sent with search requests.
pub const SEARCH_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// --- Display ---

/// Characters of the first argument shown in a tool action notice.
pub const ARG_PREVIEW_CHARS: usize = 50;

/// Characters of the first result line shown in a tool result preview.
pub const RESULT_PREVIEW_CHARS: usize = 60;

/// Maximum width of the separator line.
pub const SEPARATOR_MAX_WIDTH: usize = 80;
