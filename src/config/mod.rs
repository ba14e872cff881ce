//! Configuration for nanocode.
//!
//! Settings come from built-in defaults, an optional TOML file at the XDG
//! config path (e.g. `~/.config/nanocode/config.toml` on Linux), and the
//! environment. They are resolved once at startup into an immutable
//! [`Config`].

mod loader;
mod paths;
mod resolve;
mod types;

pub use types::{Config, FileConfig};

use anyhow::Result;

impl Config {
    /// Load config with precedence: environment > config file > defaults.
    pub fn load() -> Result<Self> {
        let file = FileConfig::load_global()?;
        let working_dir = std::env::current_dir()?;
        Ok(Self::resolve(file, &|key: &str| std::env::var(key).ok(), working_dir))
    }
}
