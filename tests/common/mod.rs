/*!
 * Common test utilities for the xcstrans test suite
 */

use anyhow::Result;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

use xcstrans::app_config::{Config, TranslationProvider};
use xcstrans::catalog::{Catalog, CatalogLayout, CatalogStore};
use xcstrans::file_utils::FileManager;
use xcstrans::translation::ConcurrencySettings;

/// Route library logs through env_logger when RUST_LOG is set
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A localization entry value in catalog form
pub fn localized(value: &str) -> Value {
    json!({ "stringUnit": { "state": "translated", "value": value } })
}

/// A small catalog: two complete keys and two missing languages
pub fn sample_catalog() -> Value {
    json!({
        "sourceLanguage": "en",
        "version": "1.0",
        "strings": {
            "Hello": {
                "comment": "Greeting on the home screen",
                "localizations": {
                    "en": localized("Hello"),
                    "fr": localized("Bonjour")
                }
            },
            "Goodbye": {
                "localizations": {
                    "en": localized("Goodbye"),
                    "de": localized("Auf Wiedersehen")
                }
            },
            "Settings": {
                "extractionState": "manual",
                "localizations": {
                    "en": localized("Settings"),
                    "fr": localized("Réglages"),
                    "de": localized("Einstellungen")
                }
            },
            "%lld items": {}
        }
    })
}

/// A catalog in which every key has every language
pub fn complete_catalog() -> Value {
    json!({
        "sourceLanguage": "en",
        "version": "1.0",
        "strings": {
            "Cancel": {
                "localizations": {
                    "en": localized("Cancel"),
                    "fr": localized("Annuler")
                }
            },
            "Done": {
                "comment": "Button title",
                "localizations": {
                    "en": localized("Done"),
                    "fr": localized("Terminé")
                }
            },
            "Line\nbreak": {
                "localizations": {
                    "en": localized("Line\nbreak"),
                    "fr": localized("Saut\nde ligne")
                }
            }
        }
    })
}

/// Writes a catalog document as `Localizable.xcstrings`
pub fn write_catalog(dir: &Path, catalog: &Value) -> Result<PathBuf> {
    create_test_file(dir, "Localizable.xcstrings", &serde_json::to_string_pretty(catalog)?)
}

/// Store rooted at `dir/output`
pub fn store_in(dir: &Path) -> CatalogStore {
    CatalogStore::new(CatalogLayout::new(dir.join("output"), "Localizable.xcstrings"))
}

/// Writes one needs-translation descriptor into the store
pub fn write_descriptor(store: &CatalogStore, file_name: &str, key: &str, entry: Value, missing: &[&str]) -> Result<PathBuf> {
    let needs = store.layout().needs_translation_dir();
    FileManager::ensure_dir(&needs)?;
    let chunk = Catalog::new("en", "1.0").chunk(
        key,
        entry,
        Some(missing.iter().map(|l| l.to_string()).collect()),
    );
    let path = needs.join(file_name);
    FileManager::write_json(&path, &chunk)?;
    Ok(path)
}

/// Reads a JSON file as a raw value
pub fn read_value(path: &Path) -> Result<Value> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

/// Concurrency settings without pacing
pub fn settings(files: usize, languages: usize) -> ConcurrencySettings {
    ConcurrencySettings {
        max_concurrent_files: files,
        max_concurrent_languages: languages,
        api_delay: Duration::ZERO,
        pace_after_failure: true,
    }
}

/// Config for a pipeline under `dir`, using a keyless provider
pub fn config_in(dir: &Path) -> Config {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::LMStudio;
    config.paths.input_file = dir.join("Localizable.xcstrings");
    config.paths.output_dir = dir.join("output");
    config.concurrency.api_delay_ms = Some(0);
    config
}
