//! The agentic tool-calling loop.
//!
//! [`run_turn`] drives one user turn: call the model, show its narration,
//! dispatch each tool invocation, append the assistant turn and the matching
//! tool results to history, and repeat until the model answers without
//! requesting tools.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::format;
use crate::message::{ContentBlock, Message};
use crate::output::Renderer;
use crate::provider::{ModelClient, ModelError};
use crate::tools::ToolRegistry;

/// Why a turn ended without a final answer.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("stopped after {iterations} model calls without a final answer")]
    LoopExhausted { iterations: usize },
}

/// Counters for one completed turn.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TurnSummary {
    pub model_calls: usize,
    pub tool_calls: usize,
}

/// Runs the inner loop for the latest user message in `history`.
///
/// Every tool invocation in an assistant turn gets exactly one result, in
/// the same order, in the user turn that follows it. On error, turns already
/// appended stay in history; the failed call appends nothing.
pub async fn run_turn(
    client: &dyn ModelClient,
    tools: &ToolRegistry,
    history: &mut Vec<Message>,
    system_prompt: &str,
    renderer: &mut dyn Renderer,
    max_iterations: usize,
) -> Result<TurnSummary, AgentError> {
    let mut summary = TurnSummary::default();

    loop {
        if summary.model_calls >= max_iterations {
            warn!(iterations = summary.model_calls, "run_turn: iteration ceiling reached");
            return Err(AgentError::LoopExhausted {
                iterations: summary.model_calls,
            });
        }

        let blocks = client.send(history, system_prompt).await?;
        summary.model_calls += 1;
        debug!(call = summary.model_calls, blocks = blocks.len(), "run_turn: response received");

        let mut results = Vec::new();
        for block in &blocks {
            match block {
                ContentBlock::Text { text } => renderer.text(text),
                ContentBlock::ToolUse { id, name, input } => {
                    renderer.tool_start(name, &format::arg_preview(input));
                    let output = tools.dispatch(name, input).await;
                    renderer.tool_result(&format::result_preview(&output));
                    results.push(ContentBlock::tool_result(id.clone(), output));
                }
                ContentBlock::ToolResult { .. } => {
                    warn!("run_turn: ignoring tool_result block in assistant turn");
                }
            }
        }

        history.push(Message::assistant(blocks));
        if results.is_empty() {
            info!(
                model_calls = summary.model_calls,
                tool_calls = summary.tool_calls,
                "run_turn: done"
            );
            return Ok(summary);
        }
        summary.tool_calls += results.len();
        history.push(Message::tool_results(results));
    }
}
