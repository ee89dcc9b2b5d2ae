#![allow(clippy::unwrap_used)]
//! Config resolution contract tests.
//!
//! These tests verify the merge priority:
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Config file values
//! 4. Built-in defaults

use serial_test::serial;

use chat_cli::config::{ConfigFile, ResolveOptions, TIMEOUT_ENV, resolve_config};

fn make_config_file() -> ConfigFile {
    let mut file = ConfigFile::default();
    file.chat.endpoint = "http://test.local/v1/chat/completions".to_string();
    file.chat.model = "config_model".to_string();
    file.chat.timeout = 30.0;
    file.chat.api_key_env = "CHAT_TEST_KEY".to_string();
    file.chat.system_prompt = "You are a test assistant.".to_string();
    file
}

#[test]
#[serial]
fn test_file_values_override_defaults() {
    unsafe {
        std::env::remove_var(TIMEOUT_ENV);
        std::env::remove_var("CHAT_TEST_KEY");
    }

    let resolved = resolve_config(&ResolveOptions::default(), &make_config_file());

    assert_eq!(resolved.endpoint, "http://test.local/v1/chat/completions");
    assert_eq!(resolved.model, "config_model");
    assert!((resolved.timeout - 30.0).abs() < f64::EPSILON);
    assert_eq!(resolved.system_prompt, "You are a test assistant.");
    assert!(resolved.api_key.is_none());
}

#[test]
#[serial]
fn test_env_timeout_overrides_file() {
    unsafe { std::env::set_var(TIMEOUT_ENV, "7.5") };

    let resolved = resolve_config(&ResolveOptions::default(), &make_config_file());

    assert!((resolved.timeout - 7.5).abs() < f64::EPSILON);

    unsafe { std::env::remove_var(TIMEOUT_ENV) };
}

#[test]
#[serial]
fn test_invalid_env_timeout_falls_back_to_file() {
    unsafe { std::env::set_var(TIMEOUT_ENV, "not_a_number") };

    let resolved = resolve_config(&ResolveOptions::default(), &make_config_file());

    assert!((resolved.timeout - 30.0).abs() < f64::EPSILON);

    unsafe { std::env::remove_var(TIMEOUT_ENV) };
}

#[test]
#[serial]
fn test_api_key_read_from_configured_env_var() {
    unsafe {
        std::env::remove_var(TIMEOUT_ENV);
        std::env::set_var("CHAT_TEST_KEY", "sk-test-123");
    }

    let resolved = resolve_config(&ResolveOptions::default(), &make_config_file());

    assert_eq!(resolved.api_key.as_deref(), Some("sk-test-123"));

    unsafe { std::env::remove_var("CHAT_TEST_KEY") };
}

#[test]
#[serial]
fn test_cli_key_option_overrides_configured_env_var() {
    unsafe {
        std::env::remove_var(TIMEOUT_ENV);
        std::env::set_var("CHAT_TEST_KEY", "from-config-var");
        std::env::set_var("CHAT_TEST_ALT_KEY", "from-cli-var");
    }

    let options = ResolveOptions {
        key_env: Some("CHAT_TEST_ALT_KEY".to_string()),
    };
    let resolved = resolve_config(&options, &make_config_file());

    assert_eq!(resolved.api_key.as_deref(), Some("from-cli-var"));

    unsafe {
        std::env::remove_var("CHAT_TEST_KEY");
        std::env::remove_var("CHAT_TEST_ALT_KEY");
    }
}

#[test]
#[serial]
fn test_empty_api_key_is_treated_as_missing() {
    unsafe {
        std::env::remove_var(TIMEOUT_ENV);
        std::env::set_var("CHAT_TEST_KEY", "");
    }

    let resolved = resolve_config(&ResolveOptions::default(), &make_config_file());

    assert!(resolved.api_key.is_none());

    unsafe { std::env::remove_var("CHAT_TEST_KEY") };
}
