//! File loading for nanocode configuration.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::types::{Config, FileConfig};

impl FileConfig {
    /// Loads `config.toml` from the given path.
    ///
    /// A missing file is not an error: the program runs on defaults and
    /// environment variables alone.
    pub(super) fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: FileConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {:?}", path))?;
        Ok(config)
    }

    /// Loads the global config from `~/.config/nanocode/config.toml`.
    pub(super) fn load_global() -> Result<Self> {
        Self::load_from(&Config::config_path()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(config.model.is_none());
        assert!(config.provider.anthropic.is_none());
    }

    #[test]
    fn test_parses_provider_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
max_iterations = 7

[provider.openrouter]
api_key = "sk-or"
model = "openai/gpt-5"
"#,
        )
        .unwrap();
        let config = FileConfig::load_from(&path).unwrap();
        assert_eq!(config.max_iterations, Some(7));
        let entry = config.provider.openrouter.unwrap();
        assert_eq!(entry.api_key.as_deref(), Some("sk-or"));
        assert_eq!(entry.model.as_deref(), Some("openai/gpt-5"));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_tokens = \"lots\"").unwrap();
        let err = FileConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
