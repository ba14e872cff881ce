use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use super::{parse_input, Param, ParamKind, Tool};

const PARAMS: &[Param] = &[Param::required("pattern", ParamKind::String)];

#[derive(Deserialize)]
struct GlobInput {
    pattern: String,
}

/// Result text when nothing matches.
pub const NO_MATCHES: &str = "(no matches)";

pub struct GlobTool {
    project_root: PathBuf,
}

impl GlobTool {
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }
}

#[async_trait::async_trait]
impl Tool for GlobTool {
    fn name(&self) -> &'static str {
        "glob"
    }

    fn description(&self) -> &'static str {
        "Find files matching pattern (supports **)"
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    async fn execute(&self, args: &Map<String, Value>) -> Result<String> {
        let GlobInput { pattern } = parse_input(args)?;
        let relative = !Path::new(&pattern).is_absolute();
        // The root is a literal path; only the model's pattern may glob.
        let full_pattern = if relative {
            let root = Pattern::escape(&self.project_root.to_string_lossy());
            format!("{}/{}", root.trim_end_matches('/'), pattern)
        } else {
            pattern.clone()
        };

        // Like shell globbing, `*` does not match a leading dot.
        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };
        let entries = glob::glob_with(&full_pattern, options)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?;

        let mut paths: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| {
                // Show relative patterns' matches relative to the project root
                let shown = if relative {
                    entry.strip_prefix(&self.project_root).unwrap_or(entry.as_path())
                } else {
                    entry.as_path()
                };
                shown.display().to_string()
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            Ok(NO_MATCHES.to_string())
        } else {
            Ok(paths.join("\n"))
        }
    }
}
