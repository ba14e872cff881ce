pub mod bash_tool;
pub mod gh_tool;
pub mod glob_tool;
pub mod read_file;
pub mod shell;
pub mod web_search;
pub mod write_file;

use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

use bash_tool::BashTool;
use gh_tool::GhTool;
use glob_tool::GlobTool;
use read_file::ReadFileTool;
use web_search::WebSearchTool;
use write_file::WriteFileTool;

/// Primitive type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    Boolean,
}

impl ParamKind {
    /// JSON Schema type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }

    /// Type name with its indefinite article, for error messages.
    fn described(&self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Integer => "an integer",
            Self::Boolean => "a boolean",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

/// One entry of a tool's parameter table.
#[derive(Debug, Clone, Copy)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamKind,
    pub optional: bool,
}

impl Param {
    pub const fn required(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            optional: false,
        }
    }

    #[cfg(test)]
    pub const fn optional(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            optional: true,
        }
    }
}

/// Definition sent to the LLM so it knows what tools are available.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub input_schema: Value, // JSON Schema
}

/// Failures at the dispatch boundary. All of them become result text.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("{0:#}")]
    Execution(#[from] anyhow::Error),

    #[error("tool panicked: {0}")]
    Panicked(String),
}

/// Every tool implements this trait.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Unique name the LLM uses to call this tool.
    fn name(&self) -> &'static str;

    /// Description shown to the model.
    fn description(&self) -> &'static str;

    /// Declared parameters; the JSON Schema is derived from this table.
    fn params(&self) -> &'static [Param];

    /// Execute the tool with arguments already checked against [`Tool::params`].
    async fn execute(&self, args: &Map<String, Value>) -> anyhow::Result<String>;
}

/// Builds the schema for one tool from its parameter table.
pub fn schema_for(tool: &dyn Tool) -> ToolSchema {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for param in tool.params() {
        properties.insert(param.name.to_string(), json!({ "type": param.kind.as_str() }));
        if !param.optional {
            required.push(param.name);
        }
    }
    ToolSchema {
        name: tool.name().to_string(),
        description: tool.description().to_string(),
        input_schema: json!({
            "type": "object",
            "properties": properties,
            "required": required,
        }),
    }
}

/// Checks `input` against a parameter table, returning the argument object.
pub fn validate_args<'a>(params: &[Param], input: &'a Value) -> Result<&'a Map<String, Value>, ToolError> {
    let args = input
        .as_object()
        .ok_or_else(|| ToolError::InvalidArguments("expected a JSON object".into()))?;
    for param in params {
        match args.get(param.name) {
            None | Some(Value::Null) if param.optional => {}
            None | Some(Value::Null) => {
                return Err(ToolError::InvalidArguments(format!(
                    "missing required parameter '{}'",
                    param.name
                )));
            }
            Some(value) if !param.kind.accepts(value) => {
                return Err(ToolError::InvalidArguments(format!(
                    "parameter '{}' must be {}",
                    param.name,
                    param.kind.described()
                )));
            }
            Some(_) => {}
        }
    }
    Ok(args)
}

/// Deserializes validated arguments into a tool's input struct.
pub(crate) fn parse_input<T: DeserializeOwned>(args: &Map<String, Value>) -> anyhow::Result<T> {
    serde_json::from_value(Value::Object(args.clone())).map_err(Into::into)
}

/// Resolves a model-supplied path: absolute paths as-is, others against `root`.
pub(crate) fn resolve_path(root: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Holds all registered tools and dispatches calls by name.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool. Called during startup only.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        debug_assert!(
            self.get(tool.name()).is_none(),
            "duplicate tool name {}",
            tool.name()
        );
        self.tools.push(Arc::from(tool));
    }

    /// Produce schemas for the LLM (sent in every API request).
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|t| schema_for(t.as_ref())).collect()
    }

    fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Look up a tool by name and execute it.
    ///
    /// Any failure is rendered as `"error: <message>"` so every invocation
    /// yields a result for the model.
    pub async fn dispatch(&self, name: &str, input: &Value) -> String {
        match self.try_dispatch(name, input).await {
            Ok(output) => output,
            Err(e) => {
                warn!(tool = name, error = %e, "dispatch: tool failed");
                format!("error: {}", e)
            }
        }
    }

    async fn try_dispatch(&self, name: &str, input: &Value) -> Result<String, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        let args = validate_args(tool.params(), input)?;
        debug!(tool = name, "dispatch: executing");

        match AssertUnwindSafe(tool.execute(args)).catch_unwind().await {
            Ok(result) => Ok(result?),
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Err(ToolError::Panicked(message))
            }
        }
    }

    /// How many tools are registered.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

impl ToolRegistry {
    /// Create a registry with all built-in tools.
    pub fn with_builtins(config: &Config) -> Self {
        let root = config.working_dir.clone();
        let mut registry = Self::new();
        registry.register(Box::new(BashTool::new(root.clone())));
        registry.register(Box::new(ReadFileTool::new(root.clone())));
        registry.register(Box::new(WriteFileTool::new(root.clone())));
        registry.register(Box::new(GlobTool::new(root.clone())));
        registry.register(Box::new(WebSearchTool::duckduckgo()));
        registry.register(Box::new(GhTool::new(root)));
        registry
    }
}
