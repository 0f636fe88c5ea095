//! Parenthesized qualifiers inside registry district keys.
//!
//! The registry annotates some districts in parentheses. Three kinds carry
//! lookup meaning and are kept in the index key verbatim:
//!
//! - a block range: `北四条西（１〜１９丁目）`
//! - a specific lot: `脇川新田町（９７０番地）`
//! - the remainder of a split district: `脇川新田町（その他）`
//!
//! Anything else (`六本木（次のビルを除く）`) is noise and is stripped when
//! the key is built.

use std::sync::LazyLock;

use regex::Regex;
use yubin_types::ChomeRange;

use crate::analyzer::normalizer::{fold_full_width, widen_digit};
use crate::analyzer::numerals::parse_block_number;

/// Content of the "remainder" qualifier.
pub const OTHER_QUALIFIER: &str = "その他";

static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"（([^（）]*)）|\(([^()]*)\)").expect("valid regex"));
static RANGE_CONTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*([0-9０-９]+|[一二三四五六七八九十]+)\s*[〜～~\-－−]\s*([0-9０-９]+|[一二三四五六七八九十]+)\s*丁目\s*$",
    )
    .expect("valid regex")
});
static LOT_CONTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([0-9０-９]+)\s*番地\s*$").expect("valid regex"));

/// A meaningful parenthesized annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Qualifier {
    /// Block numbers covered by the key.
    ChomeRange(ChomeRange),
    /// A single lot number, in half-width digits.
    Lot(String),
    /// The rest of a district split by other qualifiers.
    Other,
}

/// Classifies the text between a pair of parentheses.
pub fn classify(content: &str) -> Option<Qualifier> {
    if let Some(caps) = RANGE_CONTENT.captures(content) {
        let start = parse_block_number(&caps[1])?;
        let end = parse_block_number(&caps[2])?;
        return Some(Qualifier::ChomeRange(ChomeRange::new(start, end)));
    }

    if let Some(caps) = LOT_CONTENT.captures(content) {
        let lot = caps[1].chars().map(fold_full_width).collect();
        return Some(Qualifier::Lot(lot));
    }

    (content.trim() == OTHER_QUALIFIER).then_some(Qualifier::Other)
}

/// Returns the first meaningful qualifier of a stored key.
pub fn key_qualifier(key: &str) -> Option<Qualifier> {
    PARENTHESIZED
        .captures_iter(key)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .find_map(|content| classify(content.as_str()))
}

/// Strips every parenthesized group that is not a meaningful qualifier.
pub fn clean_district_key(district: &str) -> String {
    PARENTHESIZED
        .replace_all(district, |caps: &regex::Captures<'_>| {
            let content = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            match classify(content) {
                Some(_) => caps[0].to_string(),
                None => String::new(),
            }
        })
        .trim()
        .to_string()
}

/// The area name of a key: the text before any parenthesis.
pub fn area_name(key: &str) -> &str {
    let end = key.find(['（', '(']).unwrap_or(key.len());
    key[..end].trim()
}

/// Returns `true` if `district` mentions `lot` in half- or full-width digits.
///
/// This is plain containment, so an unrelated number that happens to
/// contain the lot digits also matches.
pub fn mentions_lot(district: &str, lot: &str) -> bool {
    if lot.is_empty() {
        return false;
    }
    let wide: String = lot.chars().map(widen_digit).collect();
    district.contains(lot) || district.contains(wide.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chome_range_in_any_script() {
        assert_eq!(
            classify("１〜１９丁目"),
            Some(Qualifier::ChomeRange(ChomeRange::new(1, 19)))
        );
        assert_eq!(
            classify("20～30丁目"),
            Some(Qualifier::ChomeRange(ChomeRange::new(20, 30)))
        );
        assert_eq!(
            classify("一〜十二丁目"),
            Some(Qualifier::ChomeRange(ChomeRange::new(1, 12)))
        );
    }

    #[test]
    fn lot_and_other() {
        assert_eq!(classify("９７０番地"), Some(Qualifier::Lot("970".into())));
        assert_eq!(classify("その他"), Some(Qualifier::Other));
    }

    #[test]
    fn noise_is_unclassified() {
        assert_eq!(classify("次のビルを除く"), None);
        assert_eq!(classify("地階・階層不明"), None);
        assert_eq!(classify("１丁目"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn cleaning_keeps_meaningful_qualifiers() {
        assert_eq!(clean_district_key("北四条西（１〜１９丁目）"), "北四条西（１〜１９丁目）");
        assert_eq!(clean_district_key("脇川新田町（９７０番地）"), "脇川新田町（９７０番地）");
        assert_eq!(clean_district_key("脇川新田町（その他）"), "脇川新田町（その他）");
        assert_eq!(clean_district_key("六本木(その他)"), "六本木(その他)");
    }

    #[test]
    fn cleaning_strips_noise() {
        assert_eq!(clean_district_key("六本木（次のビルを除く）"), "六本木");
        assert_eq!(clean_district_key("赤坂(地階・階層不明)"), "赤坂");
        assert_eq!(clean_district_key("神田小川町"), "神田小川町");
    }

    #[test]
    fn qualifier_of_stored_key() {
        assert_eq!(
            key_qualifier("北四条西（２０〜３０丁目）"),
            Some(Qualifier::ChomeRange(ChomeRange::new(20, 30)))
        );
        assert_eq!(key_qualifier("脇川新田町（その他）"), Some(Qualifier::Other));
        assert_eq!(key_qualifier("六本木"), None);
    }

    #[test]
    fn area_name_stops_at_parenthesis() {
        assert_eq!(area_name("北四条西（１〜１９丁目）"), "北四条西");
        assert_eq!(area_name("六本木(その他)"), "六本木");
        assert_eq!(area_name("六本木"), "六本木");
    }

    #[test]
    fn lot_mentions() {
        assert!(mentions_lot("脇川新田町970番地", "970"));
        assert!(mentions_lot("脇川新田町９７０", "970"));
        assert!(!mentions_lot("脇川新田町南割下", "970"));
        // Containment, not token equality.
        assert!(mentions_lot("脇川新田町1970", "970"));
        assert!(!mentions_lot("脇川新田町", ""));
    }
}
