//! Interactive chat REPL for nanocode.
//!
//! Provides the outer conversation loop using [`rustyline`] for readline
//! support (history, line editing). Each accepted line becomes a user
//! message and is handed to [`agent::run_turn`], which sees the whole
//! history so the model keeps context across turns.

mod commands;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::agent;
use crate::config::Config;
use crate::constants::HISTORY_FILENAME;
use crate::format;
use crate::message::Message;
use crate::output::{Renderer, StdoutRenderer};
use crate::provider::ModelClient;
use crate::tools::ToolRegistry;

use commands::Input;

/// Ordered history plus the system prompt fixed at startup.
#[derive(Debug)]
pub struct Conversation {
    history: Vec<Message>,
    system_prompt: String,
}

impl Conversation {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            history: Vec::new(),
            system_prompt: system_prompt.into(),
        }
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.history.push(Message::user(text));
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }
}

/// Where the REPL goes after handling a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplState {
    AwaitingInput,
    Terminated,
}

/// One REPL session: the conversation and what it talks to.
pub struct ChatSession<'a> {
    client: &'a dyn ModelClient,
    tools: &'a ToolRegistry,
    conversation: Conversation,
    max_iterations: usize,
}

impl<'a> ChatSession<'a> {
    pub fn new(
        client: &'a dyn ModelClient,
        tools: &'a ToolRegistry,
        system_prompt: impl Into<String>,
        max_iterations: usize,
    ) -> Self {
        Self {
            client,
            tools,
            conversation: Conversation::new(system_prompt),
            max_iterations,
        }
    }

    #[cfg(test)]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Handles one input line, running a full agent turn for messages.
    ///
    /// Turn failures are shown through `renderer` and never end the session.
    pub async fn handle_line(&mut self, line: &str, renderer: &mut dyn Renderer) -> ReplState {
        match commands::parse_input(line) {
            Input::Empty => ReplState::AwaitingInput,
            Input::Quit => ReplState::Terminated,
            Input::Clear => {
                self.conversation.clear();
                info!("chat: conversation cleared");
                renderer.notice("Cleared conversation");
                ReplState::AwaitingInput
            }
            Input::Message(text) => {
                self.conversation.push_user(text);
                let Conversation {
                    history,
                    system_prompt,
                } = &mut self.conversation;
                match agent::run_turn(
                    self.client,
                    self.tools,
                    history,
                    system_prompt.as_str(),
                    renderer,
                    self.max_iterations,
                )
                .await
                {
                    Ok(summary) => debug!(
                        ?summary,
                        history_len = self.conversation.history().len(),
                        "chat: turn complete"
                    ),
                    Err(e) => {
                        warn!(error = %e, "chat: turn failed");
                        renderer.error(&e.to_string());
                    }
                }
                renderer.turn_end();
                ReplState::AwaitingInput
            }
        }
    }
}

/// Where readline history lives, or `None` when there is no cache directory.
///
/// Losing history is not worth refusing to start over.
fn history_file(cache_dir: Result<PathBuf>) -> Option<PathBuf> {
    match cache_dir {
        Ok(dir) => Some(dir.join(HISTORY_FILENAME)),
        Err(e) => {
            warn!(error = %e, "chat: readline history disabled");
            None
        }
    }
}

/// Runs the interactive chat REPL until `/q`, `exit`, Ctrl+C or Ctrl+D.
///
/// Readline history is persisted to `~/.cache/nanocode/history.txt`.
pub async fn run_chat(config: &Config, client: &dyn ModelClient, tools: &ToolRegistry) -> Result<()> {
    let mut session = ChatSession::new(
        client,
        tools,
        config.system_prompt.clone(),
        config.max_iterations,
    );
    let mut renderer = StdoutRenderer;

    // Set up readline with persistent history
    let mut rl = DefaultEditor::new()?;
    let history_path = history_file(Config::cache_dir());
    if let Some(path) = history_path.as_deref().filter(|p| p.exists()) {
        let _ = rl.load_history(path);
    }

    let prompt = format!("{} ", "❯".blue().bold());
    loop {
        println!("{}", format::separator());
        let readline = rl.readline(&prompt);
        println!("{}", format::separator());

        match readline {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.trim());
                }
                if session.handle_line(&line, &mut renderer).await == ReplState::Terminated {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                break;
            }
        }
    }

    // Save readline history
    if let Some(path) = &history_path {
        let saved = path
            .parent()
            .map_or(Ok(()), std::fs::create_dir_all)
            .map_err(anyhow::Error::from)
            .and_then(|()| rl.save_history(path).map_err(anyhow::Error::from));
        if let Err(e) = saved {
            warn!(error = %e, path = %path.display(), "chat: failed to save readline history");
        }
    }
    info!("chat: session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ContentBlock;
    use crate::output::RecordingRenderer;
    use crate::provider::scripted::ScriptedClient;
    use crate::provider::ModelError;

    fn reply(text: &str) -> std::result::Result<Vec<ContentBlock>, ModelError> {
        Ok(vec![ContentBlock::text(text)])
    }

    #[tokio::test]
    async fn test_clear_resets_history() {
        let client = ScriptedClient::new(vec![reply("one")]);
        let tools = ToolRegistry::new();
        let mut session = ChatSession::new(&client, &tools, "sys", 5);
        let mut renderer = RecordingRenderer::default();

        session.handle_line("first question", &mut renderer).await;
        assert_eq!(session.conversation().history().len(), 2);

        assert_eq!(session.handle_line("/c", &mut renderer).await, ReplState::AwaitingInput);
        assert!(session.conversation().history().is_empty());

        client.push(reply("two"));
        session.handle_line("second question", &mut renderer).await;

        let requests = client.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1], vec![Message::user("second question")]);
        assert_eq!(
            renderer.events,
            vec!["text: one", "notice: Cleared conversation", "text: two"]
        );
    }

    #[test]
    fn test_history_file_without_cache_dir() {
        assert_eq!(history_file(Err(anyhow::anyhow!("no cache dir"))), None);
        assert_eq!(
            history_file(Ok(PathBuf::from("/cache/nanocode"))),
            Some(PathBuf::from("/cache/nanocode/history.txt"))
        );
    }

    #[tokio::test]
    async fn test_quit_commands_terminate() {
        let client = ScriptedClient::default();
        let tools = ToolRegistry::new();
        let mut session = ChatSession::new(&client, &tools, "sys", 5);
        let mut renderer = RecordingRenderer::default();

        assert_eq!(session.handle_line("/q", &mut renderer).await, ReplState::Terminated);
        assert_eq!(session.handle_line(" exit ", &mut renderer).await, ReplState::Terminated);
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_lines_are_ignored() {
        let client = ScriptedClient::default();
        let tools = ToolRegistry::new();
        let mut session = ChatSession::new(&client, &tools, "sys", 5);
        let mut renderer = RecordingRenderer::default();

        assert_eq!(session.handle_line("   ", &mut renderer).await, ReplState::AwaitingInput);
        assert_eq!(client.calls(), 0);
        assert!(session.conversation().history().is_empty());
        assert!(renderer.events.is_empty());
    }

    #[tokio::test]
    async fn test_model_error_is_reported_and_session_continues() {
        let client = ScriptedClient::new(vec![Err(ModelError::Status {
            status: 401,
            message: "invalid x-api-key".into(),
        })]);
        let tools = ToolRegistry::new();
        let mut session = ChatSession::new(&client, &tools, "sys", 5);
        let mut renderer = RecordingRenderer::default();

        let state = session.handle_line("hello", &mut renderer).await;

        assert_eq!(state, ReplState::AwaitingInput);
        assert_eq!(session.conversation().history(), &[Message::user("hello")]);
        assert_eq!(renderer.events.len(), 1);
        assert!(renderer.events[0].starts_with("error: "));
        assert!(renderer.events[0].contains("invalid x-api-key"));
    }
}
