//! The interactive chat session: a single coordinating state machine.
//!
//! One loop iteration reads a line, classifies it as command or message,
//! routes it to the command handler or the completion client, and decides
//! whether the session continues. Output and interactive prompts go
//! through injected capabilities so the whole loop runs under test.

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::command::{Input, SlashCommand, parse_input};
use super::transcript::Transcript;
use super::ui;
use crate::completion::{CompletionClient, SendOutcome};
use crate::ui::{Console, LineEvent, Prompter, Spinner};

/// Messages that end the session when sent as-is.
const FAREWELLS: &[&str] = &[
    "再见", "bye", "goodbye", "结束", "end", "退出", "exit", "quit",
];

/// Session-wide mutable state, created once at startup and mutated only
/// by slash commands.
#[derive(Debug)]
pub struct Settings {
    /// Show assistant replies as literal text instead of formatted output.
    pub raw_mode: bool,
    /// Continue non-command messages into multi-line composition.
    pub multi_line_mode: bool,
    /// Per-request network timeout in seconds.
    pub timeout: f64,
}

impl Settings {
    pub const fn new(timeout: f64) -> Self {
        Self {
            raw_mode: false,
            multi_line_mode: false,
            timeout,
        }
    }
}

/// Configuration for a chat session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The chat-completions endpoint URL.
    pub endpoint: String,
    /// The model identifier sent with every request.
    pub model: String,
    /// The bearer credential for the endpoint.
    pub api_key: String,
    /// Default per-request timeout in seconds.
    pub timeout: f64,
    /// The initial system prompt.
    pub system_prompt: String,
    /// Start with raw mode enabled.
    pub raw: bool,
    /// Start with multi-line mode enabled.
    pub multi: bool,
    /// Chat history file to preload.
    pub load: Option<PathBuf>,
}

/// An interactive chat session.
///
/// Owns the transcript and settings; the command handler and the
/// completion client borrow them per call.
pub struct ChatSession<'a> {
    config: SessionConfig,
    settings: Settings,
    transcript: Transcript,
    client: CompletionClient,
    console: &'a dyn Console,
    prompter: &'a dyn Prompter,
}

impl<'a> ChatSession<'a> {
    pub fn new(config: SessionConfig, console: &'a dyn Console, prompter: &'a dyn Prompter) -> Self {
        let client = CompletionClient::new(
            config.endpoint.clone(),
            config.api_key.clone(),
            config.model.clone(),
        );
        let settings = Settings::new(config.timeout);
        let transcript = Transcript::with_system_prompt(&config.system_prompt);
        Self {
            config,
            settings,
            transcript,
            client,
            console,
            prompter,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    pub async fn run(&mut self) -> Result<()> {
        self.console.plain(&ui::banner());
        tracing::info!(model = self.client.model(), "session started");

        if self.config.raw {
            self.toggle_raw();
        }
        if self.config.multi {
            self.toggle_multi();
        }
        if let Some(path) = self.config.load.take() {
            self.load_history(&path);
        }

        loop {
            match self.prompter.read_line(self.settings.multi_line_mode)? {
                LineEvent::Interrupted => {}
                LineEvent::Eof => break,
                LineEvent::Line(line) => match parse_input(&line) {
                    Input::Empty => {}
                    Input::Command(command) => {
                        if !self.handle_command(command)? {
                            break;
                        }
                    }
                    Input::Text(message) => {
                        if !self.exchange(&message).await {
                            break;
                        }
                    }
                },
            }
        }

        tracing::info!(
            total_tokens = self.transcript.total_tokens(),
            "session ended"
        );
        self.console
            .plain(&ui::total_tokens_line(self.transcript.total_tokens()));
        Ok(())
    }

    /// Runs one message exchange. Returns `false` when the session must
    /// terminate.
    async fn exchange(&mut self, message: &str) -> bool {
        tracing::info!("> {message}");
        let outcome = {
            let _spinner = Spinner::start("Thinking...");
            self.client
                .send(
                    &mut self.transcript,
                    message,
                    self.settings.timeout,
                    self.console,
                )
                .await
        };

        match outcome {
            SendOutcome::Reply(turn) => {
                tracing::info!("Assistant: {}", turn.content);
                self.console.turn(&turn, self.settings.raw_mode);
            }
            SendOutcome::Failure | SendOutcome::Aborted => {}
            SendOutcome::Fatal => return false,
        }

        // Saying goodbye ends the session whether or not a reply arrived.
        !is_farewell(message)
    }

    /// Executes one slash command. Returns `false` for `/exit`.
    fn handle_command(&mut self, command: SlashCommand) -> Result<bool> {
        match command {
            SlashCommand::ToggleRaw => self.toggle_raw(),
            SlashCommand::ToggleMulti => self.toggle_multi(),
            SlashCommand::Tokens => {
                self.console.notice(&format!(
                    "Total tokens: {}",
                    self.transcript.total_tokens()
                ));
                self.console.notice(&format!(
                    "Current tokens: {}",
                    self.transcript.current_tokens()
                ));
            }
            SlashCommand::Last => match self.transcript.last_turn() {
                Ok(turn) => self.console.turn(turn, self.settings.raw_mode),
                Err(e) => self.console.error(&e.to_string()),
            },
            SlashCommand::Save { path } => self.save_history(path)?,
            SlashCommand::System { prompt } => self.set_system_prompt(prompt)?,
            SlashCommand::Timeout { value } => self.set_timeout(value)?,
            SlashCommand::Undo => self.undo(),
            SlashCommand::Help | SlashCommand::Unknown(_) => self.console.plain(&ui::help()),
            SlashCommand::Exit => return Ok(false),
        }
        Ok(true)
    }

    fn toggle_raw(&mut self) {
        self.settings.raw_mode = !self.settings.raw_mode;
        if self.settings.raw_mode {
            self.console
                .notice("Raw mode enabled, use /last to display the last answer.");
        } else {
            self.console.notice("Raw mode disabled.");
        }
    }

    fn toggle_multi(&mut self) {
        self.settings.multi_line_mode = !self.settings.multi_line_mode;
        if self.settings.multi_line_mode {
            self.console.notice(
                "Multi-line mode enabled, press Enter on a message to continue it in your editor.",
            );
        } else {
            self.console.notice("Multi-line mode disabled.");
        }
    }

    fn save_history(&mut self, path: Option<String>) -> Result<()> {
        let path = match path {
            Some(path) => path,
            None => match self.prompter.ask("Save to:", &default_history_name())? {
                Some(answer) => answer,
                None => return Ok(()),
            },
        };

        let path = PathBuf::from(path);
        match self.transcript.save_to(&path) {
            Ok(()) => {
                self.console
                    .notice(&format!("Chat history saved to: {}", path.display()));
                tracing::info!(path = %path.display(), "chat history saved");
            }
            Err(e) => self.console.error(&format!("{e:#}")),
        }
        Ok(())
    }

    fn set_system_prompt(&mut self, prompt: Option<String>) -> Result<()> {
        let current = self
            .transcript
            .system_prompt()
            .unwrap_or_default()
            .to_string();
        let new_content = match prompt {
            Some(prompt) => prompt,
            None => match self.prompter.ask("System prompt:", &current)? {
                Some(answer) => answer,
                None => return Ok(()),
            },
        };

        if new_content == current {
            self.console.notice("No change.");
            return Ok(());
        }

        match self.transcript.replace_system_prompt(new_content.as_str()) {
            Ok(old) => {
                self.console.notice(&format!(
                    "System prompt has been modified from '{old}' to '{new_content}'."
                ));
                if self.transcript.len() > 1 {
                    self.console.notice(
                        "Note this is not a new chat, modifications to the system prompt \
                         have limited impact on answers.",
                    );
                }
            }
            Err(e) => self.console.error(&e.to_string()),
        }
        Ok(())
    }

    fn set_timeout(&mut self, value: Option<String>) -> Result<()> {
        let current = format!("{}", self.settings.timeout);
        let input = match value {
            Some(value) => value,
            None => match self.prompter.ask("Set API timeout:", &current)? {
                Some(answer) => answer,
                None => return Ok(()),
            },
        };

        if input == current {
            self.console.notice("No change.");
            return Ok(());
        }

        match input.trim().parse::<f64>() {
            Ok(timeout) if timeout.is_finite() && timeout > 0.0 => {
                self.settings.timeout = timeout;
                self.console
                    .notice(&format!("API timeout set to {timeout}s."));
            }
            _ => self.console.error("The timeout must be a positive number."),
        }
        Ok(())
    }

    fn undo(&mut self) {
        // An exchange is a (user, assistant) pair after the system turn
        if self.transcript.len() > 2 {
            let _ = self.transcript.remove_last();
            if let Ok(question) = self.transcript.remove_last() {
                self.console.notice(&format!(
                    "Last question: '{}' and its answer have been removed.",
                    truncate_first_line(&question.content)
                ));
            }
        } else {
            self.console.notice("Nothing to undo.");
        }
    }

    fn load_history(&mut self, path: &Path) {
        match Transcript::load_from(path) {
            Ok(loaded) => {
                self.transcript.replace_turns(loaded.turns().to_vec());
                for turn in self.transcript.turns() {
                    self.console.turn(turn, self.settings.raw_mode);
                }
                self.console.notice(&format!(
                    "Chat history successfully loaded from: {}",
                    path.display()
                ));
                tracing::info!(path = %path.display(), "chat history loaded");
            }
            Err(e) => self.console.error(&format!("{e:#}")),
        }
    }
}

fn default_history_name() -> String {
    let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    format!("./chat_history_{stamp}.json")
}

fn truncate_first_line(content: &str) -> String {
    let first = content.lines().next().unwrap_or_default();
    if content.len() > first.len() {
        format!("{first}...")
    } else {
        first.to_string()
    }
}

fn is_farewell(message: &str) -> bool {
    let lowered = message.trim().to_lowercase();
    FAREWELLS.iter().any(|word| *word == lowered)
}
