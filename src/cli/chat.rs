//! Chat session bootstrap.

use anyhow::Result;
use inquire::Text;
use std::path::PathBuf;

use crate::chat::{ChatSession, SessionConfig};
use crate::config::{ConfigManager, ResolveOptions, resolve_config};
use crate::ui::{InquirePrompter, TermConsole, is_prompt_cancelled};

pub struct ChatOptions {
    pub load: Option<PathBuf>,
    pub key: Option<String>,
    pub raw: bool,
    pub multi: bool,
}

pub async fn run_chat(options: ChatOptions) -> Result<()> {
    let Some(config) = load_session_config(&options)? else {
        // Credential prompt cancelled
        return Ok(());
    };

    let console = TermConsole;
    let prompter = InquirePrompter;
    let mut session = ChatSession::new(config, &console, &prompter);
    session.run().await
}

fn load_session_config(options: &ChatOptions) -> Result<Option<SessionConfig>> {
    let manager = ConfigManager::new();
    let file_config = manager.load_or_default();

    let resolved = resolve_config(
        &ResolveOptions {
            key_env: options.key.clone(),
        },
        &file_config,
    );

    let api_key = match resolved.api_key {
        Some(key) => key,
        None => match Text::new("API key not found, please input:").prompt() {
            Ok(key) => key,
            Err(e) if is_prompt_cancelled(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        },
    };

    Ok(Some(SessionConfig {
        endpoint: resolved.endpoint,
        model: resolved.model,
        api_key,
        timeout: resolved.timeout,
        system_prompt: resolved.system_prompt,
        raw: options.raw,
        multi: options.multi,
        load: options.load.clone(),
    }))
}
