//! Injected interactive prompt capability.
//!
//! Both the main input line and the sub-prompts that commands raise for a
//! missing argument go through the [`Prompter`] trait, keeping the
//! session loop testable without a real terminal.

use anyhow::Result;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use inquire::{Editor, Text};

use super::is_prompt_cancelled;
use crate::chat::command::SlashCommandCompleter;

/// What one read of the main prompt produced.
#[derive(Debug, PartialEq, Eq)]
pub enum LineEvent {
    /// A submitted line (possibly multi-line in multi-line mode).
    Line(String),
    /// Ctrl+C at the prompt; the loop keeps reading.
    Interrupted,
    /// End of input; the session terminates.
    Eof,
}

/// Interactive prompt capability injected into the session loop.
pub trait Prompter {
    /// Reads one input line. In multi-line mode a non-command line
    /// continues into multi-line composition instead of submitting.
    fn read_line(&self, multi_line: bool) -> Result<LineEvent>;

    /// Asks for a missing command argument, pre-filled with `default`.
    ///
    /// Returns `None` when the user cancels, in which case the command is
    /// silently abandoned.
    fn ask(&self, label: &str, default: &str) -> Result<Option<String>>;
}

/// The real terminal prompter, backed by inquire.
pub struct InquirePrompter;

impl InquirePrompter {
    fn render_config() -> RenderConfig<'static> {
        let prompt_style = Styled::new("❯")
            .with_fg(Color::LightGreen)
            .with_attr(Attributes::BOLD);
        let mut render_config = RenderConfig::default()
            .with_prompt_prefix(prompt_style)
            .with_answered_prompt_prefix(prompt_style);

        // Non-highlighted suggestions: gray
        render_config.option = StyleSheet::new().with_fg(Color::Grey);
        // Highlighted suggestion: purple
        render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));

        render_config
    }
}

impl Prompter for InquirePrompter {
    fn read_line(&self, multi_line: bool) -> Result<LineEvent> {
        let help = if multi_line {
            "Enter continues a message in your editor; /commands submit directly"
        } else {
            "Type a message, /help for commands, Esc to quit"
        };

        let first = Text::new("")
            .with_render_config(Self::render_config())
            .with_autocomplete(SlashCommandCompleter)
            .with_help_message(help)
            .prompt();

        let line = match first {
            Ok(line) => line,
            Err(inquire::InquireError::OperationInterrupted) => return Ok(LineEvent::Interrupted),
            Err(inquire::InquireError::OperationCanceled) => return Ok(LineEvent::Eof),
            Err(e) => return Err(e.into()),
        };

        // Command lines submit on Enter regardless of multi-line mode.
        let trimmed = line.trim();
        if !multi_line || trimmed.is_empty() || trimmed.starts_with('/') {
            return Ok(LineEvent::Line(line));
        }

        match Editor::new("Message")
            .with_render_config(Self::render_config())
            .with_predefined_text(&line)
            .prompt()
        {
            Ok(text) => Ok(LineEvent::Line(text)),
            // Cancelling the editor abandons the message, not the session
            Err(e) if is_prompt_cancelled(&e) => Ok(LineEvent::Interrupted),
            Err(e) => Err(e.into()),
        }
    }

    fn ask(&self, label: &str, default: &str) -> Result<Option<String>> {
        match Text::new(label)
            .with_render_config(Self::render_config())
            .with_initial_value(default)
            .prompt()
        {
            Ok(answer) => Ok(Some(answer)),
            Err(e) if is_prompt_cancelled(&e) => {
                println!(); // Clear line after the abandoned prompt
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
