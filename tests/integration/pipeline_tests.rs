/*!
 * End-to-end catalog round trips through split and merge
 */

use xcstrans::catalog::{merge_catalog, split_catalog};

use crate::common;

/// Test that a fully translated catalog survives split and merge unchanged
#[test]
fn test_split_then_merge_withCompleteCatalog_shouldReproduceEntries() {
    common::init_logging();
    let temp_dir = common::create_temp_dir().unwrap();
    let original = common::complete_catalog();
    let input = common::write_catalog(temp_dir.path(), &original).unwrap();
    let store = common::store_in(temp_dir.path());

    let split = split_catalog(&input, store.layout()).unwrap();
    assert_eq!(split.complete, 3);
    assert_eq!(split.needs_translation, 0);

    let merged = merge_catalog(store.layout()).unwrap();
    assert_eq!(merged.keys, 3);
    assert_eq!(merged.incomplete_keys, 0);

    let result = common::read_value(&merged.output).unwrap();
    assert_eq!(result["sourceLanguage"], original["sourceLanguage"]);
    assert_eq!(result["version"], original["version"]);
    assert_eq!(result["strings"], original["strings"]);
    assert_eq!(result["strings"]["Line\nbreak"]["localizations"]["fr"]["stringUnit"]["value"], "Saut\nde ligne");

    let keys: Vec<&String> = result["strings"].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["Cancel", "Done", "Line\nbreak"]);
}

/// Test that merging the same fragments twice gives byte-identical output
#[test]
fn test_merge_twice_withSameFragments_shouldBeByteIdentical() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::write_catalog(temp_dir.path(), &common::sample_catalog()).unwrap();
    let store = common::store_in(temp_dir.path());
    split_catalog(&input, store.layout()).unwrap();

    let first = merge_catalog(store.layout()).unwrap();
    let first_bytes = std::fs::read(&first.output).unwrap();
    let second = merge_catalog(store.layout()).unwrap();
    let second_bytes = std::fs::read(&second.output).unwrap();

    assert_eq!(first_bytes, second_bytes);
    // Only the complete key has been merged so far
    assert_eq!(first.keys, 1);
}

/// Test that splitting again starts from a clean output directory
#[test]
fn test_split_withStaleOutput_shouldRemoveOldFragments() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::write_catalog(temp_dir.path(), &common::complete_catalog()).unwrap();
    let store = common::store_in(temp_dir.path());
    let stale = store.layout().translated_dir();
    std::fs::create_dir_all(&stale).unwrap();
    common::create_test_file(&stale, "key_99_Old.json", "{}").unwrap();

    split_catalog(&input, store.layout()).unwrap();

    assert!(!stale.exists());
    let merged = merge_catalog(store.layout()).unwrap();
    assert_eq!(merged.fragments, 3);
}
