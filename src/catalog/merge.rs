/*!
 * Merge stage: folds complete and translated fragments into the final catalog.
 */

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde_json::Map;
use std::path::PathBuf;

use super::model::Catalog;
use super::store::CatalogLayout;
use crate::errors::AppError;
use crate::file_utils::FileManager;

const DEFAULT_SOURCE_LANGUAGE: &str = "en";
const DEFAULT_VERSION: &str = "1.0";

/// Outcome of a merge run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    /// Fragment files read
    pub fragments: usize,
    /// Distinct keys in the final catalog
    pub keys: usize,
    /// Keys still lacking a discovered language
    pub incomplete_keys: usize,
    /// Where the catalog was written
    pub output: PathBuf,
}

/// Fragment files to merge: the complete directory first, then translated,
/// each in file-name order
pub fn collect_fragments(layout: &CatalogLayout) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for dir in [layout.complete_dir(), layout.translated_dir()] {
        if FileManager::dir_exists(&dir) {
            files.extend(FileManager::find_files(&dir, "json")?);
        }
    }
    Ok(files)
}

/// Fold fragments into one catalog with keys sorted by UTF-16 code units.
///
/// The header comes from the first fragment; later fragments win on
/// duplicate keys.
pub fn merge_documents(fragments: impl IntoIterator<Item = Catalog>) -> Catalog {
    let mut merged: Option<Catalog> = None;

    for fragment in fragments {
        match merged.as_mut() {
            None => {
                let mut first = Catalog::new(fragment.source_language, fragment.version);
                first.strings = fragment.strings;
                merged = Some(first);
            }
            Some(catalog) => {
                for (key, entry) in fragment.strings {
                    catalog.strings.insert(key, entry);
                }
            }
        }
    }

    let mut catalog = merged.unwrap_or_else(|| Catalog::new(DEFAULT_SOURCE_LANGUAGE, DEFAULT_VERSION));

    let mut entries: Vec<_> = std::mem::take(&mut catalog.strings).into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.encode_utf16().cmp(b.encode_utf16()));
    catalog.strings = entries.into_iter().collect::<Map<_, _>>();
    catalog
}

/// Merge every fragment of the layout into its final catalog file
pub fn merge_catalog(layout: &CatalogLayout) -> Result<MergeSummary> {
    let files = collect_fragments(layout)?;
    if files.is_empty() {
        return Err(AppError::NothingToMerge(layout.complete_dir(), layout.translated_dir()).into());
    }
    info!("Found {} fragment files to merge", files.len());

    let mut fragments = Vec::with_capacity(files.len());
    for path in &files {
        let mut fragment: Catalog = FileManager::read_json(path)
            .with_context(|| format!("Failed to read fragment {:?}", path))?;
        if fragment.meta.take().is_some() {
            warn!("Fragment {:?} still carries pending-work metadata", path);
        }
        fragments.push(fragment);
    }

    let catalog = merge_documents(fragments);

    let languages = catalog.languages();
    let incomplete_keys = catalog
        .strings
        .values()
        .filter(|entry| !catalog.missing_languages(entry, &languages).is_empty())
        .count();
    if incomplete_keys > 0 {
        debug!("{} merged keys are still missing at least one language", incomplete_keys);
    }

    let output = layout.final_file();
    FileManager::ensure_dir(layout.final_dir())?;
    FileManager::write_json(&output, &catalog)?;

    info!("Merged {} keys into {:?}", catalog.strings.len(), output);
    Ok(MergeSummary {
        fragments: files.len(),
        keys: catalog.strings.len(),
        incomplete_keys,
        output,
    })
}
