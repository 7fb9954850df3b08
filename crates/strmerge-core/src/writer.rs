//! Serialization of tables back to .strings text

use crate::encoding::encode_utf16;
use crate::error::{Error, Result};
use crate::table::Table;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Render a table as .strings text.
///
/// Each record is its comment lines, its translation line and one blank
/// line. Spacing from the parsed input is not preserved.
pub fn to_strings_string(table: &Table) -> String {
    let mut out = String::new();
    for entry in table.entries() {
        for comment in &entry.comments {
            out.push_str(comment);
            out.push('\n');
        }
        out.push_str(&entry.translation_line());
        out.push_str("\n\n");
    }
    out
}

/// Write a table to a UTF-16 .strings file, replacing any existing file
pub fn write_strings<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let path = path.as_ref();
    let write_error = |e: std::io::Error| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    };

    let bytes = encode_utf16(&to_strings_string(table));

    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes).map_err(write_error)?;
    writer.flush().map_err(write_error)?;

    Ok(())
}
