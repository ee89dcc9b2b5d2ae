//! Ordered conversation state: turns, token counters, persistence.
//!
//! The transcript is the full conversational context sent to the model on
//! every request. Turn 0, when present, holds the sole system prompt; the
//! turns after it are the user/assistant exchange history.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::fs::atomic_write;

/// The speaker of a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Errors for transcript edit operations.
///
/// Both variants are recoverable: they are reported to the user and the
/// session continues.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranscriptError {
    /// The transcript has no turn that may be removed or displayed.
    #[error("the transcript has no removable turns")]
    Empty,
    /// Turn 0 is not a system turn, so there is no prompt to modify.
    #[error("no system prompt found in the chat history")]
    NoSystemPrompt,
}

/// The ordered conversation state plus token accounting.
///
/// `total_tokens` sums the usage of every successful exchange of the
/// session; `current_tokens` holds only the most recent one. Both are
/// updated exclusively through [`Transcript::record_usage`] on success,
/// so failed exchanges never move them.
#[derive(Debug, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
    total_tokens: u64,
    current_tokens: u64,
}

impl Transcript {
    /// Creates an empty transcript with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transcript whose first turn is the given system prompt.
    pub fn with_system_prompt(content: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::system(content)],
            ..Self::default()
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub const fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    pub const fn current_tokens(&self) -> u64 {
        self.current_tokens
    }

    /// Appends a turn at the end.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Removes and returns the last turn.
    ///
    /// Fails with [`TranscriptError::Empty`] when one turn or fewer
    /// remains, so the system prompt can never be removed this way.
    pub fn remove_last(&mut self) -> Result<Turn, TranscriptError> {
        if self.turns.len() <= 1 {
            return Err(TranscriptError::Empty);
        }
        self.turns.pop().ok_or(TranscriptError::Empty)
    }

    /// Returns the most recent turn.
    pub fn last_turn(&self) -> Result<&Turn, TranscriptError> {
        self.turns.last().ok_or(TranscriptError::Empty)
    }

    /// Swaps the system prompt content in place, returning the old one.
    ///
    /// Fails with [`TranscriptError::NoSystemPrompt`] when turn 0 is
    /// absent or not a system turn; the transcript is left unmodified.
    pub fn replace_system_prompt(
        &mut self,
        new_content: impl Into<String>,
    ) -> Result<String, TranscriptError> {
        match self.turns.first_mut() {
            Some(turn) if turn.role == Role::System => {
                Ok(std::mem::replace(&mut turn.content, new_content.into()))
            }
            _ => Err(TranscriptError::NoSystemPrompt),
        }
    }

    /// Returns the system prompt content, if turn 0 is a system turn.
    pub fn system_prompt(&self) -> Option<&str> {
        match self.turns.first() {
            Some(turn) if turn.role == Role::System => Some(&turn.content),
            _ => None,
        }
    }

    /// Records the token usage of a successful exchange.
    pub const fn record_usage(&mut self, tokens: u64) {
        self.current_tokens = tokens;
        self.total_tokens += tokens;
    }

    /// Replaces the turn list wholesale, e.g. when loading saved history.
    ///
    /// Counters are untouched: loaded history was paid for in a previous
    /// session.
    pub fn replace_turns(&mut self, turns: Vec<Turn>) {
        self.turns = turns;
    }

    /// Opens a scoped transaction over the turn list.
    ///
    /// Turns pushed through the guard are discarded when it is dropped
    /// without [`Transaction::commit`], restoring the length at `begin`.
    /// The guard dereferences to the transcript, so all read/mutate
    /// operations stay available inside the region.
    pub fn begin(&mut self) -> Transaction<'_> {
        let mark = self.turns.len();
        Transaction {
            transcript: self,
            mark,
            committed: false,
        }
    }

    /// Serializes the turn list as pretty-printed JSON.
    ///
    /// Counters are session state, not history, and are not persisted.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.turns).context("Failed to serialize chat history")
    }

    /// Saves the turn list to `path` as indented, human-readable JSON.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        atomic_write(path, &json)
            .with_context(|| format!("Failed to save chat history to: {}", path.display()))
    }

    /// Loads a turn list previously written by [`Transcript::save_to`].
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read chat history: {}", path.display()))?;
        let turns: Vec<Turn> = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid chat history format: {}", path.display()))?;
        Ok(Self {
            turns,
            ..Self::default()
        })
    }
}

/// RAII guard over a tentative region of the transcript.
///
/// Rolls the turn list back to its `begin` length on drop unless
/// [`Transaction::commit`] was called. This replaces pop-on-every-failure
/// bookkeeping with a single guarded region.
pub struct Transaction<'a> {
    transcript: &'a mut Transcript,
    mark: usize,
    committed: bool,
}

impl Transaction<'_> {
    /// Keeps everything pushed since `begin`.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.transcript.turns.truncate(self.mark);
        }
    }
}

impl std::ops::Deref for Transaction<'_> {
    type Target = Transcript;

    fn deref(&self) -> &Transcript {
        self.transcript
    }
}

impl std::ops::DerefMut for Transaction<'_> {
    fn deref_mut(&mut self) -> &mut Transcript {
        self.transcript
    }
}
