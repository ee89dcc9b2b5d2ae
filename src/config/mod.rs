//! Configuration file management and environment resolution.

mod manager;

pub use manager::{
    ChatConfig, ConfigFile, ConfigManager, ResolveOptions, ResolvedConfig, TIMEOUT_ENV,
    resolve_config,
};
