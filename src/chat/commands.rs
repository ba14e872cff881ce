//! Classification of REPL input lines.

/// What one line of user input asks for.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Input {
    /// Blank line; nothing to do.
    Empty,
    /// `/q` or `exit`.
    Quit,
    /// `/c`: drop the conversation.
    Clear,
    /// Anything else is sent to the model.
    Message(String),
}

/// Classifies a raw line. Surrounding whitespace is ignored.
pub(crate) fn parse_input(line: &str) -> Input {
    match line.trim() {
        "" => Input::Empty,
        "/q" | "exit" => Input::Quit,
        "/c" => Input::Clear,
        text => Input::Message(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands() {
        assert_eq!(parse_input("/q"), Input::Quit);
        assert_eq!(parse_input("  exit "), Input::Quit);
        assert_eq!(parse_input("/c"), Input::Clear);
        assert_eq!(parse_input("   "), Input::Empty);
    }

    #[test]
    fn test_messages_are_trimmed() {
        assert_eq!(parse_input("  list files \n"), Input::Message("list files".into()));
        // Only exact commands count.
        assert_eq!(parse_input("/quit"), Input::Message("/quit".into()));
        assert_eq!(parse_input("exit now"), Input::Message("exit now".into()));
    }
}
