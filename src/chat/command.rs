//! Slash command parsing and autocomplete.

use inquire::autocompletion::{Autocomplete, Replacement};

/// Available slash commands: (command, description)
pub const SLASH_COMMANDS: &[(&str, &str)] = &[
    ("/raw", "Toggle raw mode (show replies as literal text)"),
    ("/multi", "Toggle multi-line mode (compose messages in your editor)"),
    ("/tokens", "Show total and current token usage"),
    ("/last", "Display the last reply again"),
    ("/save", "Save the chat history to a file"),
    ("/system", "Modify the system prompt"),
    ("/timeout", "Modify the API timeout"),
    ("/undo", "Undo the last question and remove its answer"),
    ("/help", "Show this help message"),
    ("/exit", "Exit the application"),
];

/// Slash command autocompleter
#[derive(Clone, Default)]
pub struct SlashCommandCompleter;

impl Autocomplete for SlashCommandCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        if !input.starts_with('/') {
            return Ok(vec![]);
        }

        let suggestions: Vec<String> = SLASH_COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(input))
            .map(|(cmd, desc)| format!("{cmd}  {desc}"))
            .collect();

        Ok(suggestions)
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        let replacement =
            highlighted_suggestion.map(|s| s.split_whitespace().next().unwrap_or("").to_string());
        Ok(replacement)
    }
}

/// A parsed slash command.
///
/// Parsing happens exactly once per input line; dispatch is an exhaustive
/// match, so an unrecognized command is a typed variant rather than a
/// trailing `else`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    ToggleRaw,
    ToggleMulti,
    Tokens,
    Last,
    Save { path: Option<String> },
    System { prompt: Option<String> },
    Timeout { value: Option<String> },
    Undo,
    Help,
    Exit,
    Unknown(String),
}

/// One classified line of input.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Command(SlashCommand),
    Empty,
}

/// Classifies a raw input line.
///
/// The command token is matched lower-cased and must match exactly (no
/// fuzzy prefixes). Tokens after the command name are whitespace-split
/// arguments and keep their original case, so file paths and prompt text
/// survive intact; `/system` re-joins them into free text.
pub fn parse_input(input: &str) -> Input {
    let input = input.trim();

    if input.is_empty() {
        return Input::Empty;
    }

    input
        .strip_prefix('/')
        .map_or_else(|| Input::Text(input.to_string()), parse_slash_command)
}

fn parse_slash_command(cmd: &str) -> Input {
    let mut parts = cmd.split_whitespace();
    let name = parts.next().unwrap_or("").to_lowercase();

    let command = match name.as_str() {
        "raw" => SlashCommand::ToggleRaw,
        "multi" => SlashCommand::ToggleMulti,
        "tokens" => SlashCommand::Tokens,
        "last" => SlashCommand::Last,
        "save" => SlashCommand::Save {
            path: parts.next().map(String::from),
        },
        "system" => {
            let rest: Vec<&str> = parts.collect();
            SlashCommand::System {
                prompt: if rest.is_empty() {
                    None
                } else {
                    Some(rest.join(" "))
                },
            }
        }
        "timeout" => SlashCommand::Timeout {
            value: parts.next().map(String::from),
        },
        "undo" => SlashCommand::Undo,
        "help" => SlashCommand::Help,
        "exit" => SlashCommand::Exit,
        other => SlashCommand::Unknown(other.to_string()),
    };

    Input::Command(command)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(parse_input(""), Input::Empty));
        assert!(matches!(parse_input("   "), Input::Empty));
    }

    #[test]
    fn test_parse_text_input() {
        match parse_input("What is the capital of France?") {
            Input::Text(text) => assert_eq!(text, "What is the capital of France?"),
            _ => panic!("Expected Input::Text"),
        }
    }

    #[test]
    fn test_parse_text_trims_whitespace() {
        match parse_input("  hello  ") {
            Input::Text(text) => assert_eq!(text, "hello"),
            _ => panic!("Expected Input::Text"),
        }
    }

    #[test]
    fn test_parse_bare_commands() {
        assert_eq!(parse_input("/raw"), Input::Command(SlashCommand::ToggleRaw));
        assert_eq!(
            parse_input("/multi"),
            Input::Command(SlashCommand::ToggleMulti)
        );
        assert_eq!(parse_input("/tokens"), Input::Command(SlashCommand::Tokens));
        assert_eq!(parse_input("/last"), Input::Command(SlashCommand::Last));
        assert_eq!(parse_input("/undo"), Input::Command(SlashCommand::Undo));
        assert_eq!(parse_input("/help"), Input::Command(SlashCommand::Help));
        assert_eq!(parse_input("/exit"), Input::Command(SlashCommand::Exit));
    }

    #[test]
    fn test_parse_command_token_is_case_insensitive() {
        assert_eq!(parse_input("/RAW"), Input::Command(SlashCommand::ToggleRaw));
        assert_eq!(parse_input("/Exit"), Input::Command(SlashCommand::Exit));
    }

    #[test]
    fn test_parse_arguments_keep_their_case() {
        assert_eq!(
            parse_input("/save ./Chats/History.json"),
            Input::Command(SlashCommand::Save {
                path: Some("./Chats/History.json".to_string())
            })
        );
        assert_eq!(
            parse_input("/SYSTEM You ARE a pirate"),
            Input::Command(SlashCommand::System {
                prompt: Some("You ARE a pirate".to_string())
            })
        );
    }

    #[test]
    fn test_parse_save_without_path() {
        assert_eq!(
            parse_input("/save"),
            Input::Command(SlashCommand::Save { path: None })
        );
    }

    #[test]
    fn test_parse_save_with_path() {
        assert_eq!(
            parse_input("/save ./history.json"),
            Input::Command(SlashCommand::Save {
                path: Some("./history.json".to_string())
            })
        );
    }

    #[test]
    fn test_parse_system_joins_free_text() {
        assert_eq!(
            parse_input("/system you are a pirate"),
            Input::Command(SlashCommand::System {
                prompt: Some("you are a pirate".to_string())
            })
        );
    }

    #[test]
    fn test_parse_system_without_text() {
        assert_eq!(
            parse_input("/system"),
            Input::Command(SlashCommand::System { prompt: None })
        );
    }

    #[test]
    fn test_parse_timeout_with_value() {
        assert_eq!(
            parse_input("/timeout 30"),
            Input::Command(SlashCommand::Timeout {
                value: Some("30".to_string())
            })
        );
    }

    #[test]
    fn test_parse_timeout_without_value() {
        assert_eq!(
            parse_input("/timeout"),
            Input::Command(SlashCommand::Timeout { value: None })
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        match parse_input("/frobnicate") {
            Input::Command(SlashCommand::Unknown(cmd)) => assert_eq!(cmd, "frobnicate"),
            other => panic!("Expected Unknown, got {other:?}"),
        }
    }

    #[test]
    fn test_no_fuzzy_prefix_matching() {
        // "/sav" must not match "/save"
        assert!(matches!(
            parse_input("/sav"),
            Input::Command(SlashCommand::Unknown(_))
        ));
    }

    #[test]
    fn test_parse_bare_slash() {
        assert!(matches!(
            parse_input("/"),
            Input::Command(SlashCommand::Unknown(_))
        ));
    }

    // SlashCommandCompleter tests

    #[test]
    fn test_completer_no_suggestions_for_regular_text() {
        let mut completer = SlashCommandCompleter;
        let suggestions = completer.get_suggestions("hello").unwrap();
        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_completer_suggestions_for_slash() {
        let mut completer = SlashCommandCompleter;
        let suggestions = completer.get_suggestions("/").unwrap();
        assert_eq!(suggestions.len(), SLASH_COMMANDS.len());
    }

    #[test]
    fn test_completer_suggestions_filter_by_prefix() {
        let mut completer = SlashCommandCompleter;

        let suggestions = completer.get_suggestions("/s").unwrap();
        assert_eq!(suggestions.len(), 2); // /save, /system

        let suggestions = completer.get_suggestions("/to").unwrap();
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].starts_with("/tokens"));
    }

    #[test]
    fn test_completer_completion() {
        let mut completer = SlashCommandCompleter;
        let suggestion = "/timeout  Modify the API timeout".to_string();
        let completion = completer.get_completion("/ti", Some(suggestion)).unwrap();
        assert_eq!(completion, Some("/timeout".to_string()));
    }

    #[test]
    fn test_completer_completion_none() {
        let mut completer = SlashCommandCompleter;
        let completion = completer.get_completion("/x", None).unwrap();
        assert!(completion.is_none());
    }
}
