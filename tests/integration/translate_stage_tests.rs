/*!
 * Translate stage over a prepared catalog store
 */

use serde_json::json;

use xcstrans::errors::AppError;
use xcstrans::providers::mock::MockProvider;
use xcstrans::translation::Orchestrator;

use crate::common;

/// Test the reference scenario: one language translated, one failing
#[tokio::test]
async fn test_translate_withOneFailingLanguage_shouldPersistSuccessOnly() {
    common::init_logging();
    let temp_dir = common::create_temp_dir().unwrap();
    let store = common::store_in(temp_dir.path());
    common::write_descriptor(&store, "key_7_Hello.json", "Hello", json!({}), &["fr", "de"]).unwrap();
    let provider = MockProvider::working()
        .respond("fr", "Bonjour")
        .fail("de", "model overloaded");

    let summary = Orchestrator::new(&store, &provider, common::settings(5, 3))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.units, 1);
    assert_eq!(summary.persisted, 1);
    assert_eq!(summary.languages_translated, 1);
    assert_eq!(summary.languages_failed, 1);
    assert!(summary.failed_units.is_empty());

    let fragment = common::read_value(&store.layout().translated_dir().join("key_7_Hello.json")).unwrap();
    assert_eq!(
        fragment,
        json!({
            "sourceLanguage": "en",
            "version": "1.0",
            "strings": {
                "Hello": {
                    "localizations": {
                        "fr": { "stringUnit": { "state": "translated", "value": "Bonjour" } }
                    }
                }
            }
        })
    );
}

/// Test that a failing language never affects its siblings
#[tokio::test]
async fn test_translate_withThreeLanguages_shouldIsolateFailure() {
    let temp_dir = common::create_temp_dir().unwrap();
    let store = common::store_in(temp_dir.path());
    let entry = json!({
        "comment": "Shown on the paywall",
        "localizations": { "en": common::localized("Upgrade now") }
    });
    common::write_descriptor(&store, "key_1_Upgrade.json", "Upgrade", entry, &["fr", "de", "ja"]).unwrap();
    let provider = MockProvider::working().fail("de", "timeout");

    let summary = Orchestrator::new(&store, &provider, common::settings(1, 3))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.languages_translated, 2);
    assert_eq!(summary.languages_failed, 1);

    let fragment = common::read_value(&store.layout().translated_dir().join("key_1_Upgrade.json")).unwrap();
    let entry = &fragment["strings"]["Upgrade"];
    assert_eq!(entry["comment"], "Shown on the paywall");
    assert_eq!(entry["localizations"]["en"], common::localized("Upgrade now"));
    assert_eq!(entry["localizations"]["fr"], common::localized("[fr] Upgrade now"));
    assert_eq!(entry["localizations"]["ja"], common::localized("[ja] Upgrade now"));
    assert!(entry["localizations"].get("de").is_none());
    assert!(fragment.get("_meta").is_none());
}

/// Test that a key whose every language fails is still persisted
#[tokio::test]
async fn test_translate_withAllLanguagesFailing_shouldPersistEmptyLocalizations() {
    let temp_dir = common::create_temp_dir().unwrap();
    let store = common::store_in(temp_dir.path());
    common::write_descriptor(&store, "key_1_Hi.json", "Hi", json!({}), &["fr", "de"]).unwrap();
    let provider = MockProvider::failing();

    let summary = Orchestrator::new(&store, &provider, common::settings(1, 2))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.persisted, 1);
    assert_eq!(summary.languages_failed, 2);
    let fragment = common::read_value(&store.layout().translated_dir().join("key_1_Hi.json")).unwrap();
    assert_eq!(fragment["strings"]["Hi"], json!({ "localizations": {} }));
}

/// Test processing order follows the ordinal embedded in the file name
#[tokio::test]
async fn test_translate_withShuffledNames_shouldFollowOrdinals() {
    let temp_dir = common::create_temp_dir().unwrap();
    let store = common::store_in(temp_dir.path());
    for (file_name, key) in [
        ("key_100_C.json", "C"),
        ("key_9_B.json", "B"),
        ("key_10_A.json", "A"),
        ("key_1_D.json", "D"),
    ] {
        common::write_descriptor(&store, file_name, key, json!({}), &["fr"]).unwrap();
    }
    let provider = MockProvider::working();

    Orchestrator::new(&store, &provider, common::settings(1, 1))
        .run()
        .await
        .unwrap();

    let texts: Vec<String> = provider.history().into_iter().map(|r| r.text).collect();
    assert_eq!(texts, vec!["D", "B", "A", "C"]);
}

/// Test that a malformed descriptor is reported without stopping the run
#[tokio::test]
async fn test_translate_withMultiKeyDescriptor_shouldSkipItOnly() {
    let temp_dir = common::create_temp_dir().unwrap();
    let store = common::store_in(temp_dir.path());
    common::write_descriptor(&store, "key_1_Ok.json", "Ok", json!({}), &["fr"]).unwrap();
    common::create_test_file(
        &store.layout().needs_translation_dir(),
        "key_2_Two.json",
        r#"{"sourceLanguage":"en","strings":{"a":{},"b":{}},"_meta":{"missingLangs":["fr"]}}"#,
    )
    .unwrap();
    let provider = MockProvider::working();

    let summary = Orchestrator::new(&store, &provider, common::settings(2, 1))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.read, 1);
    assert_eq!(summary.failed_units, vec!["key_2_Two.json".to_string()]);
    assert!(!store.layout().translated_dir().join("key_2_Two.json").exists());
    assert_eq!(provider.request_count(), 1);
}

/// Test that a fragment which cannot be written fails only its own unit
#[tokio::test]
async fn test_translate_withUnwritableFragment_shouldPersistSiblings() {
    let temp_dir = common::create_temp_dir().unwrap();
    let store = common::store_in(temp_dir.path());
    common::write_descriptor(&store, "key_1_A.json", "A", json!({}), &["fr"]).unwrap();
    common::write_descriptor(&store, "key_2_B.json", "B", json!({}), &["fr", "de"]).unwrap();
    // A directory where the fragment file should go makes the write fail
    std::fs::create_dir_all(store.layout().translated_dir().join("key_2_B.json")).unwrap();
    let provider = MockProvider::working();

    let summary = Orchestrator::new(&store, &provider, common::settings(2, 2))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.read, 2);
    assert_eq!(summary.persisted, 1);
    assert_eq!(summary.languages_translated, 3);
    assert_eq!(summary.failed_units, vec!["key_2_B.json".to_string()]);
    let sibling = common::read_value(&store.layout().translated_dir().join("key_1_A.json")).unwrap();
    assert_eq!(sibling["strings"]["A"]["localizations"]["fr"], common::localized("[fr] A"));
    assert!(store.layout().translated_dir().join("key_2_B.json").is_dir());
}

/// Test that descriptors which all fail to load abort the stage
#[tokio::test]
async fn test_translate_withOnlyCorruptDescriptors_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let store = common::store_in(temp_dir.path());
    std::fs::create_dir_all(store.layout().needs_translation_dir()).unwrap();
    for name in ["key_1_A.json", "key_2_B.json"] {
        common::create_test_file(&store.layout().needs_translation_dir(), name, "not json").unwrap();
    }
    let provider = MockProvider::working();

    let result = Orchestrator::new(&store, &provider, common::settings(2, 1)).run().await;

    assert!(matches!(result, Err(AppError::NoUnitsRead(2))));
    assert_eq!(provider.request_count(), 0);
}

/// Test that pacing is applied between calls sharing a slot
#[tokio::test(start_paused = true)]
async fn test_translate_withDelay_shouldPaceCalls() {
    let temp_dir = common::create_temp_dir().unwrap();
    let store = common::store_in(temp_dir.path());
    common::write_descriptor(&store, "key_1_A.json", "A", json!({}), &["fr", "de"]).unwrap();
    common::write_descriptor(&store, "key_2_B.json", "B", json!({}), &["fr", "de"]).unwrap();
    let provider = MockProvider::working();
    let mut settings = common::settings(1, 1);
    settings.api_delay = std::time::Duration::from_millis(100);

    let summary = Orchestrator::new(&store, &provider, settings).run().await.unwrap();

    assert_eq!(summary.languages_translated, 4);
    assert_eq!(summary.peak_calls, 1);
    assert!(summary.elapsed >= std::time::Duration::from_millis(400));
}
