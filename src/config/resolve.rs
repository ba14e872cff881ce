//! Environment variable substitution and provider/model resolution.

use std::path::PathBuf;
use std::time::Duration;

use super::types::{Config, FileConfig, ProviderEntry};
use crate::constants::{
    ANTHROPIC_KEY_VAR, DEFAULT_LOG_LEVEL, MAX_AGENT_ITERATIONS, MAX_TOKENS, MODEL_VAR,
    OPENROUTER_KEY_VAR, REQUEST_TIMEOUT_SECS,
};
use crate::provider::ProviderKind;

impl FileConfig {
    /// Resolve `{env:VAR_NAME}` patterns in string fields.
    pub(super) fn resolve_substitutions(&mut self, env: &dyn Fn(&str) -> Option<String>) {
        for field in [&mut self.model, &mut self.system_prompt, &mut self.log_level] {
            if let Some(value) = field {
                *value = resolve_str(value, env);
            }
        }
        for entry in [&mut self.provider.anthropic, &mut self.provider.openrouter] {
            if let Some(e) = entry {
                resolve_provider_entry(e, env);
            }
        }
    }

    fn entry(&self, provider: ProviderKind) -> Option<&ProviderEntry> {
        match provider {
            ProviderKind::Anthropic => self.provider.anthropic.as_ref(),
            ProviderKind::OpenRouter => self.provider.openrouter.as_ref(),
        }
    }
}

fn resolve_provider_entry(entry: &mut ProviderEntry, env: &dyn Fn(&str) -> Option<String>) {
    for field in [&mut entry.api_key, &mut entry.base_url, &mut entry.model] {
        if let Some(value) = field {
            *value = resolve_str(value, env);
        }
    }
}

/// Replace `{env:VAR}` with the environment variable value (empty when unset).
fn resolve_str(s: &str, env: &dyn Fn(&str) -> Option<String>) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("{env:") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 5..start + end];
        let value = env(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Freeze file settings and environment into a [`Config`].
    ///
    /// An OpenRouter key (env var first, then config file) selects OpenRouter;
    /// otherwise Anthropic is used, with a possibly empty key. Model precedence:
    /// `MODEL` > provider entry > top-level `model` > provider default.
    pub fn resolve(
        mut file: FileConfig,
        env: &dyn Fn(&str) -> Option<String>,
        working_dir: PathBuf,
    ) -> Self {
        file.resolve_substitutions(env);

        let openrouter_key = non_empty(env(OPENROUTER_KEY_VAR)).or_else(|| {
            non_empty(file.entry(ProviderKind::OpenRouter).and_then(|e| e.api_key.clone()))
        });

        let (provider, api_key) = match openrouter_key {
            Some(key) => (ProviderKind::OpenRouter, key),
            None => {
                let key = non_empty(env(ANTHROPIC_KEY_VAR))
                    .or_else(|| file.entry(ProviderKind::Anthropic).and_then(|e| e.api_key.clone()))
                    .unwrap_or_default();
                (ProviderKind::Anthropic, key)
            }
        };

        let entry = file.entry(provider);
        let model = non_empty(env(MODEL_VAR))
            .or_else(|| non_empty(entry.and_then(|e| e.model.clone())))
            .or_else(|| non_empty(file.model.clone()))
            .unwrap_or_else(|| provider.default_model().to_string());
        let api_url = non_empty(entry.and_then(|e| e.base_url.clone()))
            .unwrap_or_else(|| provider.api_url().to_string());

        let system_prompt = file
            .system_prompt
            .clone()
            .unwrap_or_else(|| format!("Concise coding assistant. cwd: {}", working_dir.display()));

        Self {
            provider,
            api_key,
            api_url,
            model,
            max_tokens: file.max_tokens.unwrap_or(MAX_TOKENS),
            max_iterations: file.max_iterations.unwrap_or(MAX_AGENT_ITERATIONS).max(1),
            request_timeout: Duration::from_secs(
                file.request_timeout_secs.unwrap_or(REQUEST_TIMEOUT_SECS),
            ),
            system_prompt,
            log_level: file
                .log_level
                .clone()
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            working_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_anthropic_is_default() {
        let config = Config::resolve(FileConfig::default(), &env_of(&[]), PathBuf::from("/w"));
        assert_eq!(config.provider, ProviderKind::Anthropic);
        assert_eq!(config.model, "claude-opus-4-5");
        assert_eq!(config.api_url, "https://api.anthropic.com/v1/messages");
        assert_eq!(config.api_key, "");
        assert_eq!(config.system_prompt, "Concise coding assistant. cwd: /w");
        assert_eq!(config.max_tokens, 8192);
    }

    #[test]
    fn test_openrouter_key_selects_openrouter() {
        let env = env_of(&[("OPENROUTER_API_KEY", "sk-or"), ("ANTHROPIC_API_KEY", "sk-ant")]);
        let config = Config::resolve(FileConfig::default(), &env, PathBuf::from("."));
        assert_eq!(config.provider, ProviderKind::OpenRouter);
        assert_eq!(config.api_key, "sk-or");
        assert_eq!(config.model, "anthropic/claude-opus-4.5");
        assert_eq!(config.api_url, "https://openrouter.ai/api/v1/messages");
    }

    #[test]
    fn test_empty_openrouter_key_is_ignored() {
        let env = env_of(&[("OPENROUTER_API_KEY", ""), ("ANTHROPIC_API_KEY", "sk-ant")]);
        let config = Config::resolve(FileConfig::default(), &env, PathBuf::from("."));
        assert_eq!(config.provider, ProviderKind::Anthropic);
        assert_eq!(config.api_key, "sk-ant");
    }

    #[test]
    fn test_model_env_overrides_everything() {
        let file = FileConfig {
            model: Some("file-model".into()),
            ..Default::default()
        };
        let env = env_of(&[("MODEL", "env-model")]);
        let config = Config::resolve(file, &env, PathBuf::from("."));
        assert_eq!(config.model, "env-model");
    }

    #[test]
    fn test_file_entry_and_substitution() {
        let mut file = FileConfig::default();
        file.provider.anthropic = Some(ProviderEntry {
            api_key: Some("{env:MY_KEY}".into()),
            base_url: Some("http://localhost:8080/v1/messages".into()),
            model: None,
        });
        file.model = Some("claude-haiku".into());
        let env = env_of(&[("MY_KEY", "secret")]);
        let config = Config::resolve(file, &env, PathBuf::from("."));
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.api_url, "http://localhost:8080/v1/messages");
        assert_eq!(config.model, "claude-haiku");
    }

    #[test]
    fn test_resolve_str_handles_unterminated_pattern() {
        let env = env_of(&[("A", "1")]);
        assert_eq!(resolve_str("x{env:A}y", &env), "x1y");
        assert_eq!(resolve_str("{env:MISSING}", &env), "");
        assert_eq!(resolve_str("{env:A", &env), "{env:A");
    }

    #[test]
    fn test_iteration_ceiling_is_at_least_one() {
        let file = FileConfig {
            max_iterations: Some(0),
            ..Default::default()
        };
        let config = Config::resolve(file, &env_of(&[]), PathBuf::from("."));
        assert_eq!(config.max_iterations, 1);
    }
}
