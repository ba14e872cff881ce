//! Bash tool — shell command execution with a 30 second deadline.

use anyhow::Result;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::time::Duration;

use super::{parse_input, shell, Param, ParamKind, Tool};

use crate::constants::BASH_TIMEOUT_SECS;
use crate::output;

const PARAMS: &[Param] = &[Param::required("cmd", ParamKind::String)];

#[derive(Deserialize)]
struct BashInput {
    cmd: String,
}

/// Tool that runs a shell command, echoing its output live.
///
/// Commands run in the project root; output beyond the deadline is cut off
/// with a `(timed out after 30s)` marker.
pub struct BashTool {
    project_root: PathBuf,
    timeout: Duration,
}

impl BashTool {
    /// Create a new `BashTool` rooted at `project_root`.
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project_root,
            timeout: Duration::from_secs(BASH_TIMEOUT_SECS),
        }
    }
}

#[async_trait::async_trait]
impl Tool for BashTool {
    fn name(&self) -> &'static str {
        "bash"
    }

    fn description(&self) -> &'static str {
        "Run shell command"
    }

    fn params(&self) -> &'static [Param] {
        PARAMS
    }

    async fn execute(&self, args: &Map<String, Value>) -> Result<String> {
        let input: BashInput = parse_input(args)?;
        shell::run_streaming(&input.cmd, &self.project_root, self.timeout, output::stream_line).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_is_thirty_seconds() {
        let tool = BashTool::new(PathBuf::from("."));
        assert_eq!(shell::timeout_marker(tool.timeout), "(timed out after 30s)");
    }
}
