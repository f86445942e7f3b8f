/*!
 * Tests for the catalog model, descriptors, split and merge
 */

use serde_json::json;

use xcstrans::catalog::merge::merge_documents;
use xcstrans::catalog::split::load_catalog;
use xcstrans::catalog::{
    Catalog, CatalogFragment, TranslationResult, merge_catalog, missing_report, split_catalog,
};
use xcstrans::errors::{AppError, CatalogError};

use crate::common;

/// Test language discovery and missing-language detection on the sample
#[test]
fn test_catalog_languages_withSampleCatalog_shouldListFirstSeenOrder() {
    let catalog: Catalog = serde_json::from_value(common::sample_catalog()).unwrap();

    assert_eq!(catalog.languages(), vec!["en", "fr", "de"]);

    let universe = catalog.languages();
    assert_eq!(catalog.missing_languages(&catalog.strings["Hello"], &universe), vec!["de"]);
    assert_eq!(catalog.missing_languages(&catalog.strings["Goodbye"], &universe), vec!["fr"]);
    assert!(catalog.missing_languages(&catalog.strings["Settings"], &universe).is_empty());
    assert_eq!(catalog.missing_languages(&catalog.strings["%lld items"], &universe), vec!["fr", "de"]);
}

/// Test the report skips keys that were never localized
#[test]
fn test_missing_report_withUnlocalizedKey_shouldSkipIt() {
    let catalog: Catalog = serde_json::from_value(common::sample_catalog()).unwrap();

    let report = missing_report(&catalog);

    assert_eq!(report.source_language, "en");
    assert_eq!(report.total_keys, 4);
    let keys: Vec<&str> = report.keys.iter().map(|k| k.key.as_str()).collect();
    assert_eq!(keys, vec!["Hello", "Goodbye"]);
}

/// Test split routing and chunk contents
#[test]
fn test_split_catalog_withSampleCatalog_shouldRouteChunks() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::write_catalog(temp_dir.path(), &common::sample_catalog()).unwrap();
    let store = common::store_in(temp_dir.path());
    let layout = store.layout();

    let summary = split_catalog(&input, layout).unwrap();

    assert_eq!(summary.languages, vec!["en", "fr", "de"]);
    assert_eq!(summary.complete, 1);
    assert_eq!(summary.needs_translation, 3);

    assert!(layout.complete_dir().join("key_3_Settings.json").is_file());
    let chunk = common::read_value(&layout.needs_translation_dir().join("key_4__lld_items.json")).unwrap();
    assert_eq!(
        chunk,
        json!({
            "sourceLanguage": "en",
            "version": "1.0",
            "strings": { "%lld items": {} },
            "_meta": { "missingLangs": ["fr", "de"] }
        })
    );

    let complete = common::read_value(&layout.complete_dir().join("key_3_Settings.json")).unwrap();
    assert!(complete.get("_meta").is_none());
    assert_eq!(complete["strings"]["Settings"]["extractionState"], "manual");
}

/// Test a catalog without a strings object is rejected
#[test]
fn test_load_catalog_withoutStrings_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(temp_dir.path(), "Broken.xcstrings", r#"{"sourceLanguage":"en"}"#).unwrap();

    let err = load_catalog(&input).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<CatalogError>(),
        Some(CatalogError::InvalidJson { .. })
    ));
}

/// Test that descriptors keep unrelated entry fields when translated
#[test]
fn test_fragment_apply_withExtraFields_shouldPreserveThem() {
    let document = Catalog::new("en", "1.0").chunk(
        "Welcome",
        json!({ "comment": "Title", "extractionState": "manual", "localizations": { "en": common::localized("Welcome!") } }),
        Some(vec!["fr".to_string()]),
    );
    let (unit, mut fragment) = CatalogFragment::from_descriptor(9, "key_9_Welcome.json", document).unwrap();

    assert_eq!(unit.ordinal, 9);
    assert_eq!(unit.source_text, "Welcome!");
    assert_eq!(unit.comment.as_deref(), Some("Title"));

    fragment.apply(&TranslationResult::translated("fr", "Bienvenue !")).unwrap();
    let entry = fragment.entry().unwrap();

    assert_eq!(entry["extractionState"], "manual");
    assert_eq!(entry["localizations"]["en"], common::localized("Welcome!"));
    assert_eq!(entry["localizations"]["fr"], common::localized("Bienvenue !"));
    assert!(fragment.document().meta.is_none());
}

/// Test merge conflict resolution across directories
#[test]
fn test_merge_catalog_withSameKeyInBothDirectories_shouldPreferTranslated() {
    let temp_dir = common::create_temp_dir().unwrap();
    let store = common::store_in(temp_dir.path());
    let layout = store.layout();
    std::fs::create_dir_all(layout.complete_dir()).unwrap();
    std::fs::create_dir_all(layout.translated_dir()).unwrap();

    let header = Catalog::new("en", "1.0");
    let old = header.chunk("Hello", json!({ "localizations": { "fr": common::localized("Salut") } }), None);
    let new = header.chunk("Hello", json!({ "localizations": { "fr": common::localized("Bonjour") } }), None);
    xcstrans::file_utils::FileManager::write_json(layout.complete_dir().join("key_1_Hello.json"), &old).unwrap();
    xcstrans::file_utils::FileManager::write_json(layout.translated_dir().join("key_1_Hello.json"), &new).unwrap();

    let summary = merge_catalog(layout).unwrap();

    assert_eq!(summary.fragments, 2);
    assert_eq!(summary.keys, 1);
    let merged = common::read_value(&layout.final_file()).unwrap();
    assert_eq!(merged["strings"]["Hello"]["localizations"]["fr"]["stringUnit"]["value"], "Bonjour");
}

/// Test merging an empty layout
#[test]
fn test_merge_catalog_withNoFragments_shouldBeNothingToMerge() {
    let temp_dir = common::create_temp_dir().unwrap();
    let store = common::store_in(temp_dir.path());

    let err = merge_catalog(store.layout()).unwrap_err();

    assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::NothingToMerge(..))));
}

/// Test merged key order is byte order, not document order
#[test]
fn test_merge_documents_withMixedCaseKeys_shouldSortByBytes() {
    let header = Catalog::new("en", "1.0");
    let merged = merge_documents(vec![
        header.chunk("zebra", json!({}), None),
        header.chunk("Zebra", json!({}), None),
        header.chunk("%@ items", json!({}), None),
        header.chunk("apple", json!({}), None),
    ]);

    let keys: Vec<&str> = merged.strings.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["%@ items", "Zebra", "apple", "zebra"]);
}
