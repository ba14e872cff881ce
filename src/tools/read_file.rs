use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

use super::{parse_input, resolve_path, Param, ParamKind, Tool};

const PARAMS: &[Param] = &[Param::required("path", ParamKind::String)];

#[derive(Deserialize)]
struct ReadFileInput {
    path: String,
}

pub struct ReadFileTool {
    /// Relative paths are resolved against this directory.
    project_root: PathBuf,
}

impl ReadFileTool {
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }
}

/// Prefixes every line with its right-aligned 1-based number: `"   1 | ..."`.
pub fn number_lines(content: &str) -> String {
    content
        .split('\n')
        .enumerate()
        .map(|(i, line)| format!("{:>4} | {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait::async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &'static str {
        "read_file"
    }

    fn description(&self) -> &'static str {
        "Read file content with line numbers"
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    async fn execute(&self, args: &Map<String, Value>) -> Result<String> {
        let ReadFileInput { path } = parse_input(args)?;
        let resolved = resolve_path(&self.project_root, &path);
        if !resolved.exists() {
            return Ok(format!("error: file not found: {}", path));
        }

        let content = std::fs::read_to_string(&resolved)
            .with_context(|| format!("failed to read {}", path))?;
        Ok(number_lines(&content))
    }
}
