//! Tiered lookup logic.
//!
//! A canonical address is matched against the districts of its city in
//! three phases, stopping at the first hit:
//!
//! 1. exact variant match, then block-range disambiguation
//! 2. per-variant prefix, substring and reverse-prefix scans
//! 3. the city's catch-all entries

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use yubin_types::{MatchPhase, PostalCode};

use crate::analyzer::normalizer::fold_full_width;
use crate::analyzer::numerals::{kanji_numerals_to_digits, parse_block_number};
use crate::analyzer::{generate_district_variants, parse_address};
use crate::index::qualifier::{area_name, key_qualifier, mentions_lot, Qualifier};
use crate::index::types::{
    DistrictMap, Resolver, FALLBACK_STRATEGIES, GENERIC_DISTRICT_LABELS,
};

static BLOCK_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9０-９]+|[一二三四五六七八九十]+)丁目").expect("valid regex")
});

/// A successful lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Hit<'a> {
    pub district: &'a str,
    pub code: PostalCode,
    pub phase: MatchPhase,
}

impl<'a> Hit<'a> {
    #[inline(always)]
    fn new(phase: MatchPhase, (district, code): (&'a String, &PostalCode)) -> Self {
        Self {
            district,
            code: *code,
            phase,
        }
    }
}

/// Folds full-width digits and kanji block numerals so area names written
/// in different scripts compare equal.
fn canonical_area(name: &str) -> String {
    let folded: String = name.chars().map(fold_full_width).collect();
    kanji_numerals_to_digits(&folded).into_owned()
}

impl Resolver {
    /// Runs every lookup phase for a canonical address.
    ///
    /// Segmentation failures and unknown prefectures or cities are a miss,
    /// not an error.
    pub(crate) fn search(&self, normalized: &str) -> Option<Hit<'_>> {
        let parts = match parse_address(normalized) {
            Ok(parts) => parts,
            Err(err) => {
                debug!(address = normalized, error = %err, "address not segmentable");
                return None;
            }
        };

        let Some(districts) = self.index.districts(&parts.prefecture, &parts.city) else {
            debug!(
                prefecture = %parts.prefecture,
                city = %parts.city,
                "city not in registry"
            );
            return None;
        };

        let variants = generate_district_variants(&parts.district);
        let district = parts.district.as_str();

        let hit = Self::exact_match(districts, &variants)
            .or_else(|| Self::chome_range_match(districts, district))
            .or_else(|| Self::fallback_match(districts, &variants, district))
            .or_else(|| Self::generic_match(districts));

        match &hit {
            Some(hit) => debug!(
                address = normalized,
                phase = %hit.phase,
                matched = hit.district,
                code = %hit.code,
                "address resolved"
            ),
            None => debug!(address = normalized, "no district matched"),
        }

        hit
    }

    /// Phase 1: the first variant stored verbatim as a key.
    fn exact_match<'a>(districts: &'a DistrictMap, variants: &[String]) -> Option<Hit<'a>> {
        variants
            .iter()
            .find_map(|variant| districts.get_key_value(variant.as_str()))
            .map(|entry| Hit::new(MatchPhase::Exact, entry))
    }

    /// Phase 1, second step: a key whose block range covers the block
    /// number of the input and whose area name equals the input's base.
    fn chome_range_match<'a>(districts: &'a DistrictMap, district: &str) -> Option<Hit<'a>> {
        let caps = BLOCK_NUMBER.captures(district)?;
        let block = parse_block_number(&caps[1])?;
        let start = caps.get(0).map_or(0, |m| m.start());
        let base = canonical_area(district[..start].trim());
        if base.is_empty() {
            return None;
        }

        districts
            .iter()
            .find(|(key, _)| match key_qualifier(key) {
                Some(Qualifier::ChomeRange(range)) => {
                    range.contains(block) && canonical_area(area_name(key)) == base
                }
                _ => false,
            })
            .map(|entry| Hit::new(MatchPhase::ChomeRange, entry))
    }

    /// Phase 2: prefix, substring and reverse-prefix scans, tried for each
    /// variant in turn.
    fn fallback_match<'a>(
        districts: &'a DistrictMap,
        variants: &[String],
        district: &str,
    ) -> Option<Hit<'a>> {
        variants.iter().find_map(|variant| {
            FALLBACK_STRATEGIES.iter().find_map(|&phase| {
                let entry = match phase {
                    MatchPhase::Prefix => Self::prefix_match(districts, variant, district),
                    MatchPhase::Substring => districts
                        .iter()
                        .find(|(key, _)| key.contains(variant.as_str())),
                    MatchPhase::ReversePrefix => districts
                        .iter()
                        .find(|(key, _)| variant.starts_with(key.as_str())),
                    _ => None,
                };
                entry.map(|entry| Hit::new(phase, entry))
            })
        })
    }

    /// Keys starting with `variant`. A lot key whose number the input
    /// mentions wins, then the remainder key, then the first key in
    /// registry order.
    fn prefix_match<'a>(
        districts: &'a DistrictMap,
        variant: &str,
        district: &str,
    ) -> Option<(&'a String, &'a PostalCode)> {
        let mut first = None;
        let mut other = None;

        for entry in districts.iter().filter(|(key, _)| key.starts_with(variant)) {
            first.get_or_insert(entry);
            match key_qualifier(entry.0) {
                Some(Qualifier::Lot(lot)) if mentions_lot(district, &lot) => return Some(entry),
                Some(Qualifier::Other) => {
                    other.get_or_insert(entry);
                }
                _ => {}
            }
        }

        other.or(first)
    }

    /// Phase 3: the city's catch-all entries, in label priority.
    fn generic_match(districts: &DistrictMap) -> Option<Hit<'_>> {
        GENERIC_DISTRICT_LABELS
            .iter()
            .find_map(|label| districts.get_key_value(*label))
            .map(|entry| Hit::new(MatchPhase::Generic, entry))
    }
}
