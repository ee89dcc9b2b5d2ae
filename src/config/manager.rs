use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::paths;

/// Environment variable overriding the configured timeout.
pub const TIMEOUT_ENV: &str = "CHAT_API_TIMEOUT";

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_TIMEOUT: f64 = 20.0;
const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Settings in the `[chat]` section of config.toml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// The chat-completions endpoint URL.
    pub endpoint: String,
    /// The model identifier sent with every request.
    pub model: String,
    /// Default per-request timeout in seconds.
    pub timeout: f64,
    /// Environment variable name holding the API key.
    pub api_key_env: String,
    /// The initial system prompt for new sessions.
    pub system_prompt: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/chat/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Default settings.
    #[serde(default)]
    pub chat: ChatConfig,
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Alternate environment variable name for the credential (`--key`).
    pub key_env: Option<String>,
}

/// Resolved configuration after merging CLI flags, environment, and the
/// config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The chat-completions endpoint URL.
    pub endpoint: String,
    /// The model to converse with.
    pub model: String,
    /// Per-request timeout in seconds.
    pub timeout: f64,
    /// The API key, if the credential variable was set and non-empty.
    pub api_key: Option<String>,
    /// The initial system prompt.
    pub system_prompt: String,
}

/// Resolves configuration by merging CLI options, environment variables,
/// and config file settings.
///
/// Priority (highest to lowest): CLI flag, environment, config file,
/// built-in default. A timeout from any source that is not a positive
/// finite number falls back to the configured default.
pub fn resolve_config(options: &ResolveOptions, config_file: &ConfigFile) -> ResolvedConfig {
    let chat = &config_file.chat;

    let key_env = options.key_env.as_deref().unwrap_or(&chat.api_key_env);
    let api_key = std::env::var(key_env).ok().filter(|key| !key.is_empty());

    let timeout = std::env::var(TIMEOUT_ENV)
        .ok()
        .and_then(|value| value.parse::<f64>().ok())
        .unwrap_or(chat.timeout);
    let timeout = if timeout.is_finite() && timeout > 0.0 {
        timeout
    } else {
        DEFAULT_TIMEOUT
    };

    ResolvedConfig {
        endpoint: chat.endpoint.clone(),
        model: chat.model.clone(),
        timeout,
        api_key,
        system_prompt: chat.system_prompt.clone(),
    }
}

/// Manages loading the configuration file.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/chat/config.toml`
    /// or `~/.config/chat/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Self {
        Self {
            config_path: paths::config_dir().join("config.toml"),
        }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    /// Loads the config file, falling back to defaults when it is absent
    /// or unreadable.
    pub fn load_or_default(&self) -> ConfigFile {
        self.load().unwrap_or_default()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
