/*!
 * Split stage and missing-translation report.
 *
 * The split stage writes every key of a catalog into its own chunk file,
 * routed by whether any discovered language is still missing.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;

use super::model::{Catalog, has_localizations};
use super::store::CatalogLayout;
use crate::errors::AppError;
use crate::file_utils::FileManager;

/// Counts reported by a split run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitSummary {
    /// Languages discovered across all entries, in first-seen order
    pub languages: Vec<String>,
    /// Keys written to the complete directory
    pub complete: usize,
    /// Keys written to the needs-translation directory
    pub needs_translation: usize,
}

impl SplitSummary {
    pub fn total(&self) -> usize {
        self.complete + self.needs_translation
    }
}

/// A key lacking one or more languages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingKey {
    pub key: String,
    pub missing: Vec<String>,
}

/// Read-only coverage analysis of a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingReport {
    pub source_language: String,
    pub languages: Vec<String>,
    pub total_keys: usize,
    pub keys: Vec<MissingKey>,
}

impl MissingReport {
    pub fn is_complete(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Load a catalog, with the path in the error
pub fn load_catalog(input: &Path) -> Result<Catalog> {
    let catalog: Catalog = FileManager::read_json(input)
        .with_context(|| format!("Failed to load catalog {:?}", input))?;
    debug!(
        "Loaded catalog {:?}: {} keys, source language '{}'",
        input,
        catalog.strings.len(),
        catalog.source_language
    );
    Ok(catalog)
}

/// Refuse an output root that holds the input catalog or the working directory
pub fn check_output_root(input: &Path, root: &Path) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    for protected in [input, cwd.as_path()] {
        if FileManager::is_within(protected, root)? {
            return Err(AppError::UnsafeOutputRoot {
                root: root.to_path_buf(),
                protected: protected.to_path_buf(),
            }
            .into());
        }
    }
    Ok(())
}

/// Split `input` into per-key chunks under the layout's root.
///
/// The output root is removed and recreated first, unless it contains the
/// input or the working directory.
pub fn split_catalog(input: &Path, layout: &CatalogLayout) -> Result<SplitSummary> {
    let catalog = load_catalog(input)?;

    check_output_root(input, layout.root())?;
    FileManager::reset_dir(layout.root())?;
    let needs_dir = layout.needs_translation_dir();
    let complete_dir = layout.complete_dir();
    FileManager::ensure_dir(&needs_dir)?;
    FileManager::ensure_dir(&complete_dir)?;

    let languages = catalog.languages();
    info!("Discovered {} languages: {}", languages.len(), languages.join(", "));
    info!(
        "Source language is '{}', it is never counted as missing",
        catalog.source_language
    );

    let mut summary = SplitSummary {
        languages: languages.clone(),
        ..Default::default()
    };

    for (index, (key, entry)) in catalog.strings.iter().enumerate() {
        let missing = catalog.missing_languages(entry, &languages);
        let file_name = FileManager::chunk_file_name(index + 1, key);

        let (path, chunk) = if missing.is_empty() {
            summary.complete += 1;
            (complete_dir.join(&file_name), catalog.chunk(key, entry.clone(), None))
        } else {
            summary.needs_translation += 1;
            (needs_dir.join(&file_name), catalog.chunk(key, entry.clone(), Some(missing)))
        };

        FileManager::write_json(&path, &chunk)?;
    }

    info!(
        "Split complete: {} keys complete in {:?}, {} keys need translation in {:?}",
        summary.complete, complete_dir, summary.needs_translation, needs_dir
    );
    Ok(summary)
}

/// Per-key missing languages, skipping keys with no localizations at all
pub fn missing_report(catalog: &Catalog) -> MissingReport {
    let languages = catalog.languages();
    let keys = catalog
        .strings
        .iter()
        .filter(|(_, entry)| has_localizations(entry))
        .filter_map(|(key, entry)| {
            let missing = catalog.missing_languages(entry, &languages);
            (!missing.is_empty()).then(|| MissingKey {
                key: key.replace('\n', "\\n"),
                missing,
            })
        })
        .collect();

    MissingReport {
        source_language: catalog.source_language.clone(),
        languages,
        total_keys: catalog.strings.len(),
        keys,
    }
}
