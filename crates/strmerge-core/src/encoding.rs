//! UTF-16 text handling for .strings files
//!
//! Files are read as UTF-16 in either byte order, using the byte-order mark
//! when present and little endian otherwise. Files are always written as
//! UTF-16LE with a byte-order mark.

use crate::error::{Error, Result};
use encoding_rs::{UTF_16BE, UTF_16LE};
use std::path::Path;

const BOM: char = '\u{FEFF}';

/// Decode UTF-16 bytes into a string, rejecting any other encoding
pub fn decode_utf16(bytes: &[u8], path: &Path) -> Result<String> {
    // decode() sniffs the BOM, so a UTF-8 BOM would silently switch encodings
    let (text, encoding, had_errors) = UTF_16LE.decode(bytes);

    if encoding != UTF_16LE && encoding != UTF_16BE {
        return Err(Error::Encoding {
            path: path.to_path_buf(),
            message: format!("expected UTF-16, found {} byte-order mark", encoding.name()),
        });
    }

    if had_errors {
        return Err(Error::Encoding {
            path: path.to_path_buf(),
            message: "malformed UTF-16 sequence".to_string(),
        });
    }

    Ok(text.into_owned())
}

/// Encode a string as UTF-16LE with a leading byte-order mark
pub fn encode_utf16(text: &str) -> Vec<u8> {
    // encoding_rs never encodes to UTF-16, so go through the std iterator
    std::iter::once(BOM)
        .chain(text.chars())
        .collect::<String>()
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect()
}
