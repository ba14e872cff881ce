//! GitHub CLI tool — runs `gh` subcommands through the streaming shell executor.

use anyhow::Result;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::time::Duration;

use super::{parse_input, shell, Param, ParamKind, Tool};

use crate::constants::GH_TIMEOUT_SECS;
use crate::output;

const PARAMS: &[Param] = &[Param::required("cmd", ParamKind::String)];

#[derive(Deserialize)]
struct GhInput {
    cmd: String,
}

pub struct GhTool {
    project_root: PathBuf,
    timeout: Duration,
}

impl GhTool {
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project_root,
            timeout: Duration::from_secs(GH_TIMEOUT_SECS),
        }
    }
}

/// Prefixes `gh ` unless the command already invokes it.
fn with_gh_prefix(cmd: &str) -> String {
    let trimmed = cmd.trim();
    if trimmed == "gh" || trimmed.starts_with("gh ") {
        cmd.to_string()
    } else {
        format!("gh {}", cmd)
    }
}

#[async_trait::async_trait]
impl Tool for GhTool {
    fn name(&self) -> &'static str {
        "gh"
    }

    fn description(&self) -> &'static str {
        "Execute GitHub CLI (gh) commands. Examples: 'gh repo view', 'gh issue list', \
'gh pr create', 'gh pr list', 'gh release list'"
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    async fn execute(&self, args: &Map<String, Value>) -> Result<String> {
        let input: GhInput = parse_input(args)?;
        let cmd = with_gh_prefix(&input.cmd);
        shell::run_streaming(&cmd, &self.project_root, self.timeout, output::stream_line).await
    }
}
