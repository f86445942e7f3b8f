use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::CatalogError;

// @module: File and directory utilities for the catalog store

/// Characters that are replaced by `_` when a key becomes part of a file name
static UNSAFE_FILE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\n\r\s/\\%:*?"<>|]"#).expect("valid file name pattern"));

/// Leading ordinal of a chunk file name, e.g. `key_12_Hello.json`
static KEY_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^key_(\d+)_").expect("valid key number pattern"));

/// Maximum number of UTF-16 code units of the key kept in a chunk file name
pub const MAX_KEY_UNITS_IN_FILE_NAME: usize = 50;

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @resets: Removes a directory tree (if any) and creates it empty
    pub fn reset_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            fs::remove_dir_all(path)
                .with_context(|| format!("Failed to remove directory: {:?}", path))?;
        }
        Self::ensure_dir(path)
    }

    // @checks: Whether an existing `path` is `dir` itself or lies beneath it
    pub fn is_within<P: AsRef<Path>, Q: AsRef<Path>>(path: P, dir: Q) -> Result<bool> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(false);
        }
        let dir = dir
            .canonicalize()
            .with_context(|| format!("Failed to resolve directory: {:?}", dir))?;
        let path = path.as_ref();
        let path = path
            .canonicalize()
            .with_context(|| format!("Failed to resolve path: {:?}", path))?;
        Ok(path.starts_with(dir))
    }

    /// Find files with a specific extension directly inside a directory,
    /// sorted by file name
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let wanted = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref())
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(wanted))
            {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file, creating parent directories
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Parse a JSON document from disk
    pub fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, CatalogError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CatalogError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| CatalogError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write a value as JSON indented with two spaces
    pub fn write_json<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<(), CatalogError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(value).map_err(|source| CatalogError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })?;

        fs::write(path, json).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    // @generates: Chunk file name for the key at a 1-based ordinal
    pub fn chunk_file_name(ordinal: usize, key: &str) -> String {
        let sanitized = UNSAFE_FILE_CHARS.replace_all(key, "_");
        let mut units = 0;
        let truncated: String = sanitized
            .chars()
            .take_while(|c| {
                units += c.len_utf16();
                units <= MAX_KEY_UNITS_IN_FILE_NAME
            })
            .collect();
        format!("key_{}_{}.json", ordinal, truncated)
    }

    /// Ordinal encoded in a chunk file name; 0 when the name has none
    pub fn key_number(file_name: &str) -> u64 {
        KEY_NUMBER
            .captures(file_name)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    }
}
