//! strmerge-core: Core library for incremental localization of .strings tables
//!
//! This library provides functionality to:
//! - Parse UTF-16 `.strings` files into ordered, key-indexed tables
//! - Write tables back to `.strings` files
//! - Merge an old translated table with a freshly extracted one, keeping
//!   translations for keys that still exist
//! - Drive a whole project: rotate each language's table, regenerate it with
//!   an external extractor, merge, and rebuild interface files

pub mod config;
pub mod encoding;
pub mod error;
pub mod localize;
pub mod merger;
pub mod parser;
pub mod scanner;
pub mod table;
pub mod writer;

pub use config::LocalizeConfig;
pub use error::{Error, Result};
pub use localize::{
    localize_project, LanguageReport, LocalizeReport, StringsOutcome, Toolchain, XcodeToolchain,
};
pub use merger::{merge_files, merge_tables, MergeReport};
pub use parser::{parse_strings, parse_strings_str};
pub use scanner::{scan_project, Language, ScanResult};
pub use table::{Entry, Table};
pub use writer::{to_strings_string, write_strings};
