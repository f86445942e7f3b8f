/*!
 * Catalog document model.
 *
 * A catalog is the `.xcstrings` JSON document. String entries are kept as
 * raw JSON objects so that fields this tool does not interpret
 * (`extractionState`, `shouldTranslate`, plural `variations`, ...) pass
 * through split, translate and merge untouched and in their original order.
 */

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CatalogError;

/// State marker written on every machine translation
pub const TRANSLATED_STATE: &str = "translated";

/// Field holding the per-language map inside a string entry
pub const LOCALIZATIONS_FIELD: &str = "localizations";

/// Field holding the developer comment inside a string entry
pub const COMMENT_FIELD: &str = "comment";

/// A localization catalog, or a single-key chunk of one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// Authoring language, never counted as missing
    pub source_language: String,

    /// Catalog format version
    #[serde(default = "default_version")]
    pub version: String,

    /// Key to entry, in document order
    pub strings: Map<String, Value>,

    /// Pending-work metadata, present only on needs-translation chunks
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ChunkMeta>,
}

/// Metadata attached to a chunk that still needs translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMeta {
    /// Language codes without a localization for the chunk's key
    #[serde(rename = "missingLangs")]
    pub missing_langs: Vec<String>,
}

/// One language's value inside `localizations`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Localization {
    pub string_unit: StringUnit,
}

/// Plain (non-plural) localized string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringUnit {
    pub state: String,
    pub value: String,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Localization {
    /// Localization for a freshly translated value
    pub fn translated(value: impl Into<String>) -> Self {
        Self {
            string_unit: StringUnit {
                state: TRANSLATED_STATE.to_string(),
                value: value.into(),
            },
        }
    }

    /// JSON form, as stored in a catalog entry
    pub fn to_value(&self) -> Value {
        let mut unit = Map::new();
        unit.insert("state".to_string(), Value::String(self.string_unit.state.clone()));
        unit.insert("value".to_string(), Value::String(self.string_unit.value.clone()));

        let mut localization = Map::new();
        localization.insert("stringUnit".to_string(), Value::Object(unit));
        Value::Object(localization)
    }
}

impl Catalog {
    /// Empty catalog with the given header
    pub fn new(source_language: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            source_language: source_language.into(),
            version: version.into(),
            strings: Map::new(),
            meta: None,
        }
    }

    /// Single-key chunk sharing this catalog's header
    pub fn chunk(&self, key: &str, entry: Value, missing_langs: Option<Vec<String>>) -> Self {
        let mut strings = Map::new();
        strings.insert(key.to_string(), entry);
        Self {
            source_language: self.source_language.clone(),
            version: self.version.clone(),
            strings,
            meta: missing_langs.map(|missing_langs| ChunkMeta { missing_langs }),
        }
    }

    /// Every language that appears in any entry, in first-seen order
    pub fn languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = Vec::new();
        for entry in self.strings.values() {
            for language in entry_languages(entry) {
                if !languages.iter().any(|known| known == language) {
                    languages.push(language.clone());
                }
            }
        }
        languages
    }

    /// Languages from `universe` that `entry` lacks, excluding the source language
    pub fn missing_languages(&self, entry: &Value, universe: &[String]) -> Vec<String> {
        let available: Vec<&String> = entry_languages(entry).collect();
        universe
            .iter()
            .filter(|language| **language != self.source_language)
            .filter(|language| !available.contains(language))
            .cloned()
            .collect()
    }

    /// Missing language codes recorded in `_meta`, empty when absent
    pub fn missing_langs(&self) -> &[String] {
        self.meta
            .as_ref()
            .map(|meta| meta.missing_langs.as_slice())
            .unwrap_or(&[])
    }
}

/// Language codes present in an entry's `localizations`
pub fn entry_languages(entry: &Value) -> impl Iterator<Item = &String> {
    entry
        .get(LOCALIZATIONS_FIELD)
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|localizations| localizations.keys())
}

/// Whether an entry carries a `localizations` object at all
pub fn has_localizations(entry: &Value) -> bool {
    entry.get(LOCALIZATIONS_FIELD).is_some_and(Value::is_object)
}

/// Developer comment of an entry
pub fn entry_comment(entry: &Value) -> Option<&str> {
    entry
        .get(COMMENT_FIELD)
        .and_then(Value::as_str)
        .filter(|comment| !comment.is_empty())
}

/// `stringUnit.value` for one language of an entry
pub fn entry_value<'a>(entry: &'a Value, language: &str) -> Option<&'a str> {
    entry
        .get(LOCALIZATIONS_FIELD)?
        .get(language)?
        .get("stringUnit")?
        .get("value")?
        .as_str()
}

/// Give an entry an empty `localizations` object if it has none.
///
/// Returns whether the entry changed.
pub fn ensure_localizations(key: &str, entry: &mut Value) -> Result<bool, CatalogError> {
    let object = entry
        .as_object_mut()
        .ok_or_else(|| CatalogError::MalformedEntry(key.to_string()))?;

    if object.get(LOCALIZATIONS_FIELD).is_some_and(Value::is_object) {
        return Ok(false);
    }
    object.insert(LOCALIZATIONS_FIELD.to_string(), Value::Object(Map::new()));
    Ok(true)
}

/// Insert or replace one language's localization in an entry
pub fn set_localization(
    key: &str,
    entry: &mut Value,
    language: &str,
    localization: &Localization,
) -> Result<(), CatalogError> {
    ensure_localizations(key, entry)?;
    if let Some(map) = entry
        .get_mut(LOCALIZATIONS_FIELD)
        .and_then(Value::as_object_mut)
    {
        map.insert(language.to_string(), localization.to_value());
    }
    Ok(())
}
