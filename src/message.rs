//! Message types for the conversation history.
//!
//! A [`Message`] is one turn: a [`Role`] plus [`Content`], which is either
//! plain narration or an ordered list of [`ContentBlock`]s. The serde shape
//! matches the provider's Messages API, so history is sent as-is.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: Content,
}

/// The role of a message sender in the conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Message content: a narration string or a sequence of blocks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// The smallest unit of a turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Narration produced by the model.
    Text { text: String },
    /// A tool invocation requested by the model.
    ToolUse {
        /// Correlation id, unique within the response.
        id: String,
        /// Name of the tool to invoke.
        name: String,
        /// Argument object: parameter name to string, integer or boolean.
        input: Value,
    },
    /// The outcome of a tool invocation, sent back to the model.
    ToolResult { tool_use_id: String, content: String },
}

impl ContentBlock {
    /// Wire names of the block types a model may send back.
    pub const RESPONSE_TYPES: [&'static str; 2] = ["text", "tool_use"];

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn tool_use(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self::ToolUse {
            id: id.into(),
            name: name.into(),
            input,
        }
    }

    pub fn tool_result(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::ToolResult {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
        }
    }
}

impl Message {
    /// A user turn carrying typed input.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Content::Text(text.into()),
        }
    }

    /// An assistant turn holding the model's full block sequence.
    pub fn assistant(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content: Content::Blocks(blocks),
        }
    }

    /// A user turn carrying tool results for the preceding assistant turn.
    pub fn tool_results(results: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content: Content::Blocks(results),
        }
    }

    /// The content blocks of this message; empty for plain text content.
    #[cfg(test)]
    pub fn blocks(&self) -> &[ContentBlock] {
        match &self.content {
            Content::Text(_) => &[],
            Content::Blocks(blocks) => blocks,
        }
    }
}
