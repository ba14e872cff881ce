//! LLM provider access for nanocode.
//!
//! Wraps the Messages API behind the [`ModelClient`] trait, keeping
//! endpoint and authentication details out of the conversation loop.
//! Supports Anthropic and OpenRouter via [`ProviderKind`].

mod client;
mod error;
mod kind;
#[cfg(test)]
pub(crate) mod scripted;

pub use client::{HttpModelClient, ModelClient};
pub use error::ModelError;
pub use kind::ProviderKind;
