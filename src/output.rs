//! Output rendering abstraction for nanocode.
//!
//! Defines the [`Renderer`] trait that decouples the conversation loop from
//! the terminal. [`StdoutRenderer`] prints with colors; tests record events.

use colored::Colorize;
use std::io::{self, Write};

use crate::format;

/// Receives everything the conversation loop shows the user.
pub trait Renderer {
    /// Model narration.
    fn text(&mut self, text: &str);

    /// A tool is about to run.
    fn tool_start(&mut self, name: &str, arg_preview: &str);

    /// A tool finished; `preview` is a one-line summary of its result.
    fn tool_result(&mut self, preview: &str);

    /// Confirmation of a REPL command.
    fn notice(&mut self, message: &str);

    /// A failed turn.
    fn error(&mut self, message: &str);

    /// The current user turn is over.
    fn turn_end(&mut self) {}
}

/// Prints one line of live tool output, dimmed under a gutter.
pub fn stream_line(line: &str) {
    println!("  {}", format!("│ {}", line).dimmed());
    io::stdout().flush().ok();
}

/// Renders conversation events directly to stdout.
pub struct StdoutRenderer;

impl Renderer for StdoutRenderer {
    fn text(&mut self, text: &str) {
        println!("\n{} {}", "⏺".cyan(), format::render_markdown_lite(text));
    }

    fn tool_start(&mut self, name: &str, arg_preview: &str) {
        println!(
            "\n{}({})",
            format!("⏺ {}", format::capitalize(name)).green(),
            arg_preview.dimmed()
        );
        io::stdout().flush().ok();
    }

    fn tool_result(&mut self, preview: &str) {
        println!("  {}", format!("⎿  {}", preview).dimmed());
    }

    fn notice(&mut self, message: &str) {
        println!("{}", format!("⏺ {}", message).green());
    }

    fn error(&mut self, message: &str) {
        println!("{}", format!("⏺ Error: {}", message).red());
    }

    fn turn_end(&mut self) {
        println!();
    }
}

/// Collects rendered events as strings for assertions.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingRenderer {
    pub events: Vec<String>,
}

#[cfg(test)]
impl Renderer for RecordingRenderer {
    fn text(&mut self, text: &str) {
        self.events.push(format!("text: {}", text));
    }

    fn tool_start(&mut self, name: &str, arg_preview: &str) {
        self.events.push(format!("tool: {}({})", name, arg_preview));
    }

    fn tool_result(&mut self, preview: &str) {
        self.events.push(format!("result: {}", preview));
    }

    fn notice(&mut self, message: &str) {
        self.events.push(format!("notice: {}", message));
    }

    fn error(&mut self, message: &str) {
        self.events.push(format!("error: {}", message));
    }
}
