/*!
 * Work units, translation results and catalog fragments.
 */

use std::fmt;

use serde_json::Value;

use super::model::{
    Catalog, Localization, ensure_localizations, entry_comment, entry_value, set_localization,
};
use crate::errors::CatalogError;

/// One catalog key queued for translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkUnit {
    /// Stable processing ordinal taken from the descriptor file name
    pub ordinal: u64,
    /// Descriptor file name, reused for the persisted fragment
    pub file_name: String,
    /// Catalog key
    pub key: String,
    /// Text sent for translation
    pub source_text: String,
    /// Catalog source language
    pub source_language: String,
    /// Developer comment, passed along as context
    pub comment: Option<String>,
    /// Languages still lacking a localization
    pub missing_languages: Vec<String>,
}

/// How a single (unit, language) translation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The provider returned this text
    Translated(String),
    /// The call failed with this reason
    Failed(String),
}

/// Tagged result of translating one unit into one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub language: String,
    pub outcome: Outcome,
}

impl TranslationResult {
    pub fn translated(language: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            outcome: Outcome::Translated(value.into()),
        }
    }

    pub fn failed(language: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            outcome: Outcome::Failed(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Translated(_))
    }
}

impl fmt::Display for TranslationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Translated(value) => write!(f, "[{}] -> \"{}\"", self.language, value),
            Outcome::Failed(reason) => write!(f, "[{}] failed: {}", self.language, reason),
        }
    }
}

/// A single key's entry being completed by a file task.
///
/// Owned exclusively by the task that read it; results are applied in place
/// and failed languages are simply left out.
#[derive(Debug, Clone)]
pub struct CatalogFragment {
    key: String,
    document: Catalog,
}

impl CatalogFragment {
    /// Split a needs-translation descriptor into its work unit and fragment
    pub fn from_descriptor(
        ordinal: u64,
        file_name: &str,
        descriptor: Catalog,
    ) -> Result<(WorkUnit, Self), CatalogError> {
        if descriptor.strings.len() != 1 {
            return Err(CatalogError::NotSingleKey {
                path: file_name.into(),
                found: descriptor.strings.len(),
            });
        }

        let (key, entry) = descriptor
            .strings
            .iter()
            .next()
            .map(|(key, entry)| (key.clone(), entry))
            .ok_or_else(|| CatalogError::NotSingleKey {
                path: file_name.into(),
                found: 0,
            })?;

        if !entry.is_object() {
            return Err(CatalogError::MalformedEntry(key));
        }

        let source_text = entry_value(entry, &descriptor.source_language)
            .filter(|value| !value.is_empty())
            .unwrap_or(key.as_str())
            .to_string();

        let unit = WorkUnit {
            ordinal,
            file_name: file_name.to_string(),
            key: key.clone(),
            source_text,
            source_language: descriptor.source_language.clone(),
            comment: entry_comment(entry).map(str::to_string),
            missing_languages: descriptor.missing_langs().to_vec(),
        };

        let mut document = descriptor;
        document.meta = None;

        Ok((unit, Self { key, document }))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The entry being completed
    pub fn entry(&self) -> Option<&Value> {
        self.document.strings.get(&self.key)
    }

    /// Give the entry an empty `localizations` object if it has none
    pub fn ensure_localizations(&mut self) -> Result<bool, CatalogError> {
        let entry = self
            .document
            .strings
            .get_mut(&self.key)
            .ok_or_else(|| CatalogError::MalformedEntry(self.key.clone()))?;
        ensure_localizations(&self.key, entry)
    }

    /// Apply one result; returns whether the entry changed
    pub fn apply(&mut self, result: &TranslationResult) -> Result<bool, CatalogError> {
        let Outcome::Translated(value) = &result.outcome else {
            return Ok(false);
        };

        let entry = self
            .document
            .strings
            .get_mut(&self.key)
            .ok_or_else(|| CatalogError::MalformedEntry(self.key.clone()))?;
        set_localization(&self.key, entry, &result.language, &Localization::translated(value.as_str()))?;
        Ok(true)
    }

    /// The document to persist, without `_meta`
    pub fn document(&self) -> &Catalog {
        &self.document
    }

    pub fn into_document(self) -> Catalog {
        self.document
    }
}
