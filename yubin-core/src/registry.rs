//! Postal registry reading.
//!
//! The registry is a comma-separated file with one row per postal area and
//! every text field double-quoted:
//!
//! ```text
//! 13107,"106  ","1060032","トウキョウト","ミナトク","ロッポンギ","東京都","港区","六本木",0,0,0,0,0,0
//!                ^ 2                                             ^ 6      ^ 7    ^ 8
//! ```
//!
//! Only fields 2 (postal code), 6 (prefecture), 7 (city) and 8 (district)
//! are consumed. The file is read whole and decoded strictly, so a single
//! bad byte fails the build instead of silently corrupting keys.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::Path;

use memchr::memchr;
use smallvec::SmallVec;
use yubin_types::{
    PostalCode, RegistryConfig, RegistryEncoding, RegistryError, RegistryRow, FIELD_CITY,
    FIELD_DISTRICT, FIELD_POSTAL_CODE, FIELD_PREFECTURE, MIN_REGISTRY_FIELDS,
};

const UTF8_BOM: char = '\u{feff}';

/// Fields of one record. Registry rows have 15 fields.
pub type Record<'a> = SmallVec<[Cow<'a, str>; 16]>;

/// Why a record was not turned into a [`RegistryRow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Fewer than [`MIN_REGISTRY_FIELDS`] fields.
    TooFewFields,
    /// District field empty or whitespace only.
    EmptyDistrict,
    /// Postal code field is not seven digits.
    InvalidPostalCode,
}

/// Reads and decodes a registry file.
///
/// # Errors
///
/// - [`RegistryError::SourceNotFound`] if `path` does not exist
/// - [`RegistryError::Encoding`] if the bytes are not valid in `config.encoding`
/// - [`RegistryError::Io`] for any other read failure
pub fn read_registry(path: &Path, config: RegistryConfig) -> Result<String, RegistryError> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => RegistryError::SourceNotFound {
            path: path.to_path_buf(),
        },
        _ => RegistryError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    decode_registry(bytes, config.encoding).ok_or_else(|| RegistryError::Encoding {
        path: path.to_path_buf(),
        encoding: config.encoding,
    })
}

/// Decodes registry bytes, returning `None` on any malformed sequence.
pub fn decode_registry(bytes: Vec<u8>, encoding: RegistryEncoding) -> Option<String> {
    match encoding {
        RegistryEncoding::Utf8 => {
            let mut text = String::from_utf8(bytes).ok()?;
            if text.starts_with(UTF8_BOM) {
                text.replace_range(..UTF8_BOM.len_utf8(), "");
            }
            Some(text)
        }
        RegistryEncoding::ShiftJis => {
            let (text, had_errors) = encoding_rs::SHIFT_JIS.decode_without_bom_handling(&bytes);
            (!had_errors).then(|| text.into_owned())
        }
    }
}

/// Splits one record into fields.
///
/// Quoted fields may contain commas and `""` escapes. An unterminated
/// quote runs to the end of the line.
pub fn split_record(line: &str) -> Record<'_> {
    let bytes = line.as_bytes();
    let mut fields = Record::new();
    let mut pos = 0usize;

    loop {
        if bytes.get(pos) == Some(&b'"') {
            let (field, end) = read_quoted(line, pos + 1);
            fields.push(field);
            match memchr(b',', &bytes[end..]) {
                Some(off) => pos = end + off + 1,
                None => break,
            }
        } else {
            match memchr(b',', &bytes[pos..]) {
                Some(off) => {
                    fields.push(Cow::Borrowed(&line[pos..pos + off]));
                    pos += off + 1;
                }
                None => {
                    fields.push(Cow::Borrowed(&line[pos..]));
                    break;
                }
            }
        }
    }

    fields
}

/// Reads a quoted field whose content starts at `start`. Returns the field
/// and the byte offset just past the closing quote.
fn read_quoted(line: &str, start: usize) -> (Cow<'_, str>, usize) {
    let bytes = line.as_bytes();
    let mut unescaped: Option<String> = None;
    let mut segment = start;
    let mut cursor = start;

    while let Some(off) = memchr(b'"', &bytes[cursor..]) {
        let quote = cursor + off;
        if bytes.get(quote + 1) == Some(&b'"') {
            unescaped
                .get_or_insert_with(String::new)
                .push_str(&line[segment..=quote]);
            cursor = quote + 2;
            segment = cursor;
            continue;
        }

        let field = match unescaped {
            Some(mut buf) => {
                buf.push_str(&line[segment..quote]);
                Cow::Owned(buf)
            }
            None => Cow::Borrowed(&line[start..quote]),
        };
        return (field, quote + 1);
    }

    let field = match unescaped {
        Some(mut buf) => {
            buf.push_str(&line[segment..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(&line[start..]),
    };
    (field, bytes.len())
}

/// Extracts the consumed fields of a record.
pub fn parse_row(fields: &[Cow<'_, str>]) -> Result<RegistryRow, SkipReason> {
    if fields.len() < MIN_REGISTRY_FIELDS {
        return Err(SkipReason::TooFewFields);
    }

    let district = fields[FIELD_DISTRICT].trim();
    if district.is_empty() {
        return Err(SkipReason::EmptyDistrict);
    }

    let postal_code =
        PostalCode::parse(&fields[FIELD_POSTAL_CODE]).ok_or(SkipReason::InvalidPostalCode)?;

    Ok(RegistryRow {
        postal_code,
        prefecture: fields[FIELD_PREFECTURE].trim().to_string(),
        city: fields[FIELD_CITY].trim().to_string(),
        district: district.to_string(),
    })
}

/// Parses every line of decoded registry text.
///
/// Yields the 1-based line number with each outcome so callers can report
/// skipped rows.
pub fn rows(text: &str) -> impl Iterator<Item = (usize, Result<RegistryRow, SkipReason>)> + '_ {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, parse_row(&split_record(line))))
}
