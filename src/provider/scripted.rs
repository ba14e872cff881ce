//! A [`ModelClient`] that replays canned responses, for loop tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::client::ModelClient;
use super::error::ModelError;
use crate::message::{ContentBlock, Message};

/// Replays queued responses in order and records every history it was sent.
#[derive(Default)]
pub struct ScriptedClient {
    responses: Mutex<VecDeque<Result<Vec<ContentBlock>, ModelError>>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedClient {
    pub fn new(responses: Vec<Result<Vec<ContentBlock>, ModelError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queues one more response.
    pub fn push(&self, response: Result<Vec<ContentBlock>, ModelError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Histories received so far, one per call.
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn send(
        &self,
        history: &[Message],
        _system_prompt: &str,
    ) -> Result<Vec<ContentBlock>, ModelError> {
        self.requests.lock().unwrap().push(history.to_vec());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::InvalidResponse("script exhausted".into())))
    }
}
