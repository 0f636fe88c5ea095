//! Splits a canonical address into prefecture, city and district.
//!
//! The prefecture ends at the first `都`/`道`/`府`/`県`. The city is found by
//! trying [`CITY_PATTERNS`] in order against the rest; the first pattern
//! that matches wins and everything after it is the district.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;
use yubin_types::{AddressError, AddressParts, Segment};

/// City segmentation patterns, tried in order. Each is anchored at the
/// start of the text that follows the prefecture.
pub const CITY_PATTERNS: [(&str, &str); 6] = [
    // 大阪市北区
    ("designated city ward", r"^.*?市.*?区"),
    // 上川郡東神楽町
    ("county town", r"^.*?郡.*?[町村]"),
    // Greedy so 四日市市 and 十日町市 keep their inner 市/町.
    ("city", r"^.*市"),
    ("ward", r"^.*?区"),
    ("town or village", r"^.*?[町村]"),
    ("county", r"^.*?郡"),
];

static PREFECTURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*?[都道府県]").expect("valid regex"));

static CITY_MATCHERS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    CITY_PATTERNS
        .iter()
        .map(|&(name, pattern)| (name, Regex::new(pattern).expect("valid regex")))
        .collect()
});

/// Splits an address into its administrative segments.
///
/// The district may be empty when the address stops at the city.
///
/// # Errors
///
/// Returns [`AddressError::Segmentation`] when no prefecture or no city
/// segment can be found.
pub fn parse_address(address: &str) -> Result<AddressParts, AddressError> {
    let prefecture = PREFECTURE
        .find(address)
        .ok_or_else(|| AddressError::Segmentation {
            missing: Segment::Prefecture,
            address: address.to_string(),
        })?
        .as_str();
    let remaining = &address[prefecture.len()..];

    let (pattern, city) = CITY_MATCHERS
        .iter()
        .find_map(|(name, re)| re.find(remaining).map(|m| (*name, m.as_str())))
        .ok_or_else(|| AddressError::Segmentation {
            missing: Segment::City,
            address: address.to_string(),
        })?;

    trace!(prefecture, city, pattern, "address segmented");

    Ok(AddressParts {
        prefecture: prefecture.to_string(),
        city: city.to_string(),
        district: remaining[city.len()..].to_string(),
    })
}
