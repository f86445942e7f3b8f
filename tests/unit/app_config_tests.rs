/*!
 * Tests for application configuration functionality
 */

use std::time::Duration;

use xcstrans::app_config::{Config, LogLevel, ProviderConfig, TranslationProvider};
use xcstrans::errors::AppError;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.translation.provider, TranslationProvider::OpenAI);
    assert_eq!(config.paths.final_file_name, "Localizable.xcstrings");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.concurrency.pace_after_failure);

    let anthropic = config
        .translation
        .get_provider_config(&TranslationProvider::Anthropic)
        .expect("Anthropic provider config should exist");
    assert_eq!(anthropic.endpoint, "https://api.anthropic.com");
    assert!(anthropic.api_key.is_empty());
}

/// Test parsing a hand-written config file with only some sections
#[test]
fn test_config_fromPartialJson_shouldFillDefaults() {
    let json = r#"{
        "paths": { "output_dir": "build/strings" },
        "translation": {
            "provider": "anthropic",
            "available_providers": [
                { "type": "anthropic", "model": "claude-3-5-sonnet-latest", "api_key": "key" }
            ]
        },
        "concurrency": { "max_concurrent_files": 4 },
        "log_level": "debug"
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.paths.output_dir, std::path::PathBuf::from("build/strings"));
    assert_eq!(config.paths.final_file_name, "Localizable.xcstrings");
    assert_eq!(config.translation.get_model(), "claude-3-5-sonnet-latest");
    assert_eq!(config.translation.get_endpoint(), "https://api.anthropic.com");
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.validate().is_ok());

    // Unset values come from the Anthropic profile
    let settings = config.concurrency_settings();
    assert_eq!(settings.max_concurrent_files, 4);
    assert_eq!(settings.max_concurrent_languages, 2);
    assert_eq!(settings.api_delay, Duration::from_millis(150));
    assert_eq!(settings.max_concurrent_calls(), 8);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.concurrency.max_concurrent_languages = Some(0);
    assert!(config.validate().is_err());
    config.concurrency.max_concurrent_languages = None;

    config.translation.active_provider_config_mut().endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
    config.translation.active_provider_config_mut().endpoint = String::new();

    // Empty endpoint falls back to the provider default
    assert!(config.validate().is_ok());

    config.paths.final_file_name = "  ".to_string();
    assert!(config.validate().is_err());
}

/// Test API key resolution order
#[test]
fn test_api_key_withConfigAndEnvironment_shouldPreferConfig() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::OpenAI;
    let env = |var: &str| (var == "OPENAI_API_KEY").then(|| "sk-env".to_string());

    assert_eq!(config.translation.api_key_from(env), "sk-env");

    config.translation.active_provider_config_mut().api_key = "sk-config".to_string();
    assert_eq!(config.translation.api_key_from(env), "sk-config");
}

/// Test a missing API key
#[test]
fn test_require_api_key_withNoKey_shouldNameEnvironmentVariable() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Anthropic;

    let err = config.translation.require_api_key_from(|_| None).unwrap_err();

    match err {
        AppError::MissingCredential { provider, env_var } => {
            assert_eq!(provider, "Anthropic");
            assert_eq!(env_var, "ANTHROPIC_API_KEY");
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// Test that a provider missing from available_providers gets defaults
#[test]
fn test_active_provider_config_mut_withMissingEntry_shouldAddDefaults() {
    let mut config = Config::default();
    config.translation.available_providers = vec![ProviderConfig::new(TranslationProvider::OpenAI)];
    config.translation.provider = TranslationProvider::LMStudio;

    config.translation.active_provider_config_mut().model = "qwen2.5-7b-instruct".to_string();

    assert_eq!(config.translation.available_providers.len(), 2);
    assert_eq!(config.translation.get_model(), "qwen2.5-7b-instruct");
    assert_eq!(config.translation.get_endpoint(), "http://localhost:1234/v1");
}

/// Test saving and loading a config file
#[test]
fn test_config_save_withCustomValues_shouldLoadBack() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.translation.provider = TranslationProvider::LMStudio;
    config.concurrency.api_delay_ms = Some(25);
    config.save(&path).unwrap();

    let (loaded, created) = Config::load_or_create(&path).unwrap();

    assert!(!created);
    assert_eq!(loaded.translation.provider, TranslationProvider::LMStudio);
    assert_eq!(loaded.concurrency.api_delay_ms, Some(25));
}
