/*!
 * Filesystem-backed catalog store.
 *
 * Layout under the output root:
 * - `1_needs_translation/` pending-work descriptors
 * - `2_complete/` keys with every language present
 * - `3_translated/` fragments written by the translate stage
 * - `4_final_xcstrings/` the merged catalog
 */

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::model::Catalog;
use super::unit::{CatalogFragment, WorkUnit};
use crate::errors::CatalogError;
use crate::file_utils::FileManager;

pub const NEEDS_TRANSLATION_DIR: &str = "1_needs_translation";
pub const COMPLETE_DIR: &str = "2_complete";
pub const TRANSLATED_DIR: &str = "3_translated";
pub const FINAL_DIR: &str = "4_final_xcstrings";

/// Paths of every pipeline stage
#[derive(Debug, Clone)]
pub struct CatalogLayout {
    root: PathBuf,
    final_file_name: String,
}

impl CatalogLayout {
    pub fn new(root: impl Into<PathBuf>, final_file_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            final_file_name: final_file_name.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn needs_translation_dir(&self) -> PathBuf {
        self.root.join(NEEDS_TRANSLATION_DIR)
    }

    pub fn complete_dir(&self) -> PathBuf {
        self.root.join(COMPLETE_DIR)
    }

    pub fn translated_dir(&self) -> PathBuf {
        self.root.join(TRANSLATED_DIR)
    }

    pub fn final_dir(&self) -> PathBuf {
        self.root.join(FINAL_DIR)
    }

    pub fn final_file(&self) -> PathBuf {
        self.final_dir().join(&self.final_file_name)
    }
}

/// A descriptor file waiting in the needs-translation directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDescriptor {
    pub ordinal: u64,
    pub file_name: String,
    pub path: PathBuf,
}

/// Reads descriptors and persists fragments
#[derive(Debug, Clone)]
pub struct CatalogStore {
    layout: CatalogLayout,
}

impl CatalogStore {
    pub fn new(layout: CatalogLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &CatalogLayout {
        &self.layout
    }

    /// Pending descriptors in ascending ordinal order, ties broken by name.
    ///
    /// Directory listing order never leaks into the result.
    pub fn list_pending(&self) -> Result<Vec<PendingDescriptor>> {
        let dir = self.layout.needs_translation_dir();
        if !FileManager::dir_exists(&dir) {
            return Ok(Vec::new());
        }

        let mut pending: Vec<PendingDescriptor> = FileManager::find_files(&dir, "json")?
            .into_iter()
            .filter_map(|path| {
                let file_name = path.file_name()?.to_string_lossy().to_string();
                Some(PendingDescriptor {
                    ordinal: FileManager::key_number(&file_name),
                    file_name,
                    path,
                })
            })
            .collect();

        pending.sort_by(|a, b| a.ordinal.cmp(&b.ordinal).then_with(|| a.file_name.cmp(&b.file_name)));
        Ok(pending)
    }

    /// Load a descriptor as a work unit plus the fragment it will fill
    pub fn read_descriptor(
        &self,
        pending: &PendingDescriptor,
    ) -> Result<(WorkUnit, CatalogFragment), CatalogError> {
        let descriptor: Catalog = FileManager::read_json(&pending.path)?;
        CatalogFragment::from_descriptor(pending.ordinal, &pending.file_name, descriptor)
    }

    /// Persist a fragment into the translated directory under `file_name`
    pub fn write_fragment(
        &self,
        file_name: &str,
        fragment: &CatalogFragment,
    ) -> Result<PathBuf, CatalogError> {
        let dir = self.layout.translated_dir();
        std::fs::create_dir_all(&dir).map_err(|source| CatalogError::Io {
            path: dir.clone(),
            source,
        })?;

        let path = dir.join(file_name);
        FileManager::write_json(&path, fragment.document())?;
        Ok(path)
    }
}
