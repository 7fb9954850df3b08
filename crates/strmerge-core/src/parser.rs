//! Parser for UTF-16 .strings table files
//!
//! A file is a sequence of records. Each record is zero or more `/* ... */`
//! comment blocks (single or multi-line), one `"KEY" = "VALUE";` line, and
//! optional blank lines.

use crate::encoding::decode_utf16;
use crate::error::{Error, Result};
use crate::table::{Entry, Table};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static TRANSLATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^"(.+)" = "(.*)";$"#).expect("translation pattern is valid")
});

/// Parse a .strings file into a Table
pub fn parse_strings<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let text = decode_utf16(&bytes, path)?;
    parse_records(&text, path)
}

/// Parse .strings content from a string (useful for testing)
pub fn parse_strings_str(content: &str, source_name: &str) -> Result<Table> {
    parse_records(content, Path::new(source_name))
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn opens_comment(line: &str) -> bool {
    line.trim_end().starts_with("/*")
}

fn closes_comment(line: &str) -> bool {
    line.trim_end().ends_with("*/")
}

/// A comment opened and closed on the same line (`/*/` alone does not count)
fn is_single_line_comment(line: &str) -> bool {
    let trimmed = line.trim_end();
    trimmed.len() >= 4 && opens_comment(trimmed) && closes_comment(trimmed)
}

fn parse_records(content: &str, path: &Path) -> Result<Table> {
    let path: PathBuf = path.to_path_buf();
    let mut lines = content.lines().enumerate().map(|(i, line)| (i + 1, line));
    let mut table = Table::new();

    loop {
        // Blank lines between records (and at the start of input)
        let Some(mut current) = lines.by_ref().find(|(_, line)| !is_blank(line)) else {
            break;
        };
        let mut last_line = current.0;

        let mut comments = Vec::new();
        while opens_comment(current.1) {
            let opened_at = current.0;
            comments.push(current.1.to_string());

            if !is_single_line_comment(current.1) {
                loop {
                    let (line_no, line) = lines.next().ok_or_else(|| {
                        Error::format(&path, opened_at, "unterminated comment block")
                    })?;
                    last_line = line_no;
                    comments.push(line.to_string());
                    if closes_comment(line) {
                        break;
                    }
                }
            }

            current = lines.next().ok_or_else(|| {
                Error::format(&path, last_line, "comment is not followed by a translation line")
            })?;
            last_line = current.0;
        }

        let (line_no, line) = current;
        let caps = TRANSLATION.captures(line.trim_end()).ok_or_else(|| {
            Error::format(
                &path,
                line_no,
                format!("expected a \"KEY\" = \"VALUE\"; line, found '{}'", line.trim()),
            )
        })?;

        let key = &caps[1];
        if table.contains_key(key) {
            return Err(Error::format(
                &path,
                line_no,
                format!("duplicate key '{}'", key),
            ));
        }

        table.insert(Entry::new(key, &caps[2], comments));
    }

    Ok(table)
}
