//! Project scanner for discovering language directories and their inputs

use crate::config::LocalizeConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const LANGUAGE_DIR_SUFFIX: &str = ".lproj";

/// A `*.lproj` language directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    /// Directory name (e.g., "de.lproj")
    pub name: String,
    /// Full path to the directory
    pub path: PathBuf,
    /// Path of the strings table, whether or not it exists yet
    pub strings_path: PathBuf,
    /// Interface files (.xib, .storyboard) in this directory, sorted
    pub interface_files: Vec<PathBuf>,
}

impl Language {
    /// Whether the strings table already exists
    pub fn has_strings(&self) -> bool {
        self.strings_path.is_file()
    }
}

/// Result of scanning a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Project root that was scanned
    pub root: PathBuf,
    /// Language directories, sorted by name
    pub languages: Vec<Language>,
    /// Source files to extract strings from, sorted
    pub source_files: Vec<PathBuf>,
}

impl ScanResult {
    /// Find a language by directory name
    pub fn find_language(&self, name: &str) -> Option<&Language> {
        self.languages.iter().find(|l| l.name == name)
    }

    /// Get all language names
    pub fn language_names(&self) -> Vec<&str> {
        self.languages.iter().map(|l| l.name.as_str()).collect()
    }
}

/// Scan a project root for language directories and source files
pub fn scan_project<P: AsRef<Path>>(root: P, config: &LocalizeConfig) -> Result<ScanResult> {
    let root = root.as_ref();

    let mut languages = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if !name.ends_with(LANGUAGE_DIR_SUFFIX) {
            continue;
        }

        languages.push(Language {
            name: name.to_string(),
            strings_path: path.join(&config.strings_file),
            interface_files: find_interface_files(&path, &config.interface_extensions)?,
            path,
        });
    }
    languages.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(ScanResult {
        root: root.to_path_buf(),
        languages,
        source_files: find_source_files(root, &config.source_extensions),
    })
}

/// Interface files directly inside a language directory
fn find_interface_files(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, extensions) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Source files anywhere under `root` with one of the given extensions
pub fn find_source_files(root: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && has_extension(e.path(), extensions))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
}
