//! Settings for project-wide localization runs
//!
//! Stored as JSON. Every field has a default, so a config file only needs
//! the values it changes.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for `localize_project`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizeConfig {
    /// Name of the strings table inside each language directory
    pub strings_file: String,
    /// Language directory whose interface files are the templates
    pub template_language: String,
    /// Extensions of source files scanned for localizable strings
    pub source_extensions: Vec<String>,
    /// Extensions of interface files localized with ibtool
    pub interface_extensions: Vec<String>,
    /// String extractor executable
    pub genstrings: String,
    /// Interface builder tool executable
    pub ibtool: String,
    /// Keep the `.old` and `.new` tables after a successful merge
    pub keep_intermediate: bool,
}

impl Default for LocalizeConfig {
    fn default() -> Self {
        Self {
            strings_file: "Localizable.strings".to_string(),
            template_language: "en.lproj".to_string(),
            source_extensions: vec!["m".to_string()],
            interface_extensions: vec!["xib".to_string(), "storyboard".to_string()],
            genstrings: "genstrings".to_string(),
            ibtool: "ibtool".to_string(),
            keep_intermediate: true,
        }
    }
}

impl LocalizeConfig {
    /// Load a config file from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the config to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
