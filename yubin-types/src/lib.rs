//! Core types for the Yubin postal code resolver.
//!
//! This crate provides the vocabulary shared by the analyzer and the
//! index. Keeping types separate ensures:
//!
//! - **Small values**: `PostalCode` is a 7-byte `Copy` value, not a `String`
//! - **Cross-crate compatibility**: the core and any transport layer share the same types
//! - **Clean boundaries**: no dependency on regex tables or the index itself

#![warn(missing_docs)]

use core::fmt;
use std::io;
use std::path::PathBuf;

/// Field position of the 7-digit postal code in a registry record.
pub const FIELD_POSTAL_CODE: usize = 2;
/// Field position of the prefecture name.
pub const FIELD_PREFECTURE: usize = 6;
/// Field position of the city name.
pub const FIELD_CITY: usize = 7;
/// Field position of the district name.
pub const FIELD_DISTRICT: usize = 8;
/// Records with fewer fields than this are discarded.
pub const MIN_REGISTRY_FIELDS: usize = 9;

/// A 7-digit Japanese postal code.
///
/// Stored inline as ASCII digits, so it is `Copy` and compares byte-wise.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostalCode([u8; 7]);

impl PostalCode {
    /// Number of digits in a postal code.
    pub const LEN: usize = 7;

    /// Parses a postal code, accepting exactly seven ASCII digits.
    ///
    /// Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.trim().as_bytes();
        if bytes.len() != Self::LEN || !bytes.iter().all(u8::is_ascii_digit) {
            return None;
        }

        let mut digits = [0u8; 7];
        digits.copy_from_slice(bytes);
        Some(Self(digits))
    }

    /// Returns the code as a string slice.
    #[inline(always)]
    pub fn as_str(&self) -> &str {
        // SAFETY: `parse` only admits ASCII digits.
        unsafe { core::str::from_utf8_unchecked(&self.0) }
    }
}

impl fmt::Debug for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PostalCode({})", self.as_str())
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<&str> for PostalCode {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<str> for PostalCode {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

/// One usable line of the postal registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryRow {
    /// Postal code for this area.
    pub postal_code: PostalCode,
    /// Prefecture name, e.g. `東京都`.
    pub prefecture: String,
    /// City, ward, town or village name, e.g. `港区`.
    pub city: String,
    /// District name as written in the registry, qualifiers included.
    pub district: String,
}

/// An address split into its three administrative segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressParts {
    /// Prefecture segment, including its suffix marker.
    pub prefecture: String,
    /// City segment, including county and ward markers.
    pub city: String,
    /// Everything after the city segment. May be empty.
    pub district: String,
}

impl From<AddressParts> for (String, String, String) {
    fn from(parts: AddressParts) -> Self {
        (parts.prefecture, parts.city, parts.district)
    }
}

/// Inclusive range of block numbers (`丁目`) encoded in a registry key,
/// such as `北四条西（１〜１９丁目）`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChomeRange {
    /// First block number covered.
    pub start: u32,
    /// Last block number covered.
    pub end: u32,
}

impl ChomeRange {
    /// Creates a range; `start > end` yields a range that contains nothing.
    #[inline(always)]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Returns `true` if `block` lies within `[start, end]`.
    #[inline(always)]
    pub const fn contains(self, block: u32) -> bool {
        self.start <= block && block <= self.end
    }
}

impl fmt::Display for ChomeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}丁目", self.start, self.end)
    }
}

/// Which search phase produced a postal code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchPhase {
    /// A district variant was a key verbatim.
    Exact,
    /// The block number fell inside a registry chome range.
    ChomeRange,
    /// A registry key started with a district variant.
    Prefix,
    /// A registry key contained a district variant.
    Substring,
    /// A registry key was a prefix of a district variant.
    ReversePrefix,
    /// A catch-all entry of the city answered.
    Generic,
}

impl MatchPhase {
    /// Short lowercase label, stable for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            MatchPhase::Exact => "exact",
            MatchPhase::ChomeRange => "chome-range",
            MatchPhase::Prefix => "prefix",
            MatchPhase::Substring => "substring",
            MatchPhase::ReversePrefix => "reverse-prefix",
            MatchPhase::Generic => "generic",
        }
    }
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successful lookup with the evidence that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The resolved postal code.
    pub postal_code: PostalCode,
    /// Canonical form of the queried address.
    pub normalized: String,
    /// Registry district key that supplied the code.
    pub matched_district: String,
    /// Phase that found the match.
    pub phase: MatchPhase,
}

/// Text encoding of the registry file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistryEncoding {
    /// UTF-8, with or without a byte order mark.
    #[default]
    Utf8,
    /// Shift_JIS, the encoding of the official distribution.
    ShiftJis,
}

impl fmt::Display for RegistryEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryEncoding::Utf8 => f.write_str("UTF-8"),
            RegistryEncoding::ShiftJis => f.write_str("Shift_JIS"),
        }
    }
}

/// Registry loading options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryConfig {
    /// Encoding the registry bytes must decode under.
    pub encoding: RegistryEncoding,
}

impl RegistryConfig {
    /// Configuration for the official Shift_JIS distribution.
    pub const fn shift_jis() -> Self {
        Self {
            encoding: RegistryEncoding::ShiftJis,
        }
    }
}

/// Address segment that segmentation could not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// No `都`, `道`, `府` or `県` marker.
    Prefecture,
    /// No city, ward, county, town or village marker after the prefecture.
    City,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Prefecture => f.write_str("prefecture"),
            Segment::City => f.write_str("city"),
        }
    }
}

/// Errors caused by the address a caller passed in.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// The address was empty or whitespace only.
    #[error("address is empty")]
    InvalidInput,
    /// The address lacks a recognizable prefecture or city segment.
    #[error("no {missing} segment found in address {address:?}")]
    Segmentation {
        /// Which segment was missing.
        missing: Segment,
        /// The address that was being segmented.
        address: String,
    },
}

/// Errors raised while building a resolver from a registry file.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The registry path does not exist.
    #[error("registry file not found: {}", path.display())]
    SourceNotFound {
        /// Path that was opened.
        path: PathBuf,
    },
    /// The registry bytes are not valid in the configured encoding.
    #[error("registry file {} is not valid {encoding}", path.display())]
    Encoding {
        /// Path that was read.
        path: PathBuf,
        /// Encoding that failed to decode.
        encoding: RegistryEncoding,
    },
    /// Any other read failure.
    #[error("failed to read registry file {}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}
