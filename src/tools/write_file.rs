//! Write-file tool — writes content to a file, creating parent directories as needed.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

use super::{parse_input, resolve_path, Param, ParamKind, Tool};

const PARAMS: &[Param] = &[
    Param::required("path", ParamKind::String),
    Param::required("content", ParamKind::String),
];

#[derive(Deserialize)]
struct WriteFileInput {
    path: String,
    content: String,
}

/// Tool that writes string content to a file, overwriting it.
///
/// Missing parent directories are created. The confirmation reports the
/// number of `\n`-separated lines written.
pub struct WriteFileTool {
    /// Relative paths are resolved against this directory.
    project_root: PathBuf,
}

impl WriteFileTool {
    /// Create a new `WriteFileTool` rooted at the given directory.
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }
}

#[async_trait::async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &'static str {
        "write_file"
    }

    fn description(&self) -> &'static str {
        "Write content to file (creates dirs if needed)"
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    async fn execute(&self, args: &Map<String, Value>) -> Result<String> {
        let WriteFileInput { path, content } = parse_input(args)?;
        let resolved = resolve_path(&self.project_root, &path);

        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directories for {}", path))?;
        }
        fs::write(&resolved, &content).with_context(|| format!("failed to write {}", path))?;

        let lines = content.split('\n').count();
        Ok(format!("wrote {} lines to {}", lines, path))
    }
}
