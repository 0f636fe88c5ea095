//! District variant generation.
//!
//! One typed district can correspond to several registry spellings. The
//! variants are ordered most specific first; that order is the probe
//! order of every lookup phase.

use std::sync::LazyLock;

use regex::Regex;
use smallvec::SmallVec;

use crate::analyzer::numerals::digit_numerals_to_kanji;

/// Ordered, de-duplicated district probe keys.
pub type DistrictVariants = SmallVec<[String; 6]>;

/// Area-name prefixes tried for the last-resort base name, in order.
pub const BASE_AREA_PATTERNS: [&str; 3] = [r"^(?s:.*?)町", r"^(?s:.*?)新田町", r"^(?s:.*?)大字"];

static CHOME_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)[0-9]+丁目.*$").expect("valid regex"));
static HYPHENATED_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)[0-9]+[-−－][0-9]+.*$").expect("valid regex"));
static BASE_AREAS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    BASE_AREA_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
});

/// Generates lookup variants for a district, most specific first.
///
/// 1. the district itself
/// 2. its `条`/`丁目` digits spelled in kanji
/// 3. the district without its block suffix, and 3a. that in kanji
/// 4. the district without a hyphenated lot suffix
/// 5. the shortest prefix ending in `町`, `新田町` or `大字`
///
/// An empty district yields no variants.
pub fn generate_district_variants(district: &str) -> DistrictVariants {
    let mut variants = DistrictVariants::new();
    let mut push = |candidate: &str| {
        let candidate = candidate.trim();
        if !candidate.is_empty() && !variants.iter().any(|v| v == candidate) {
            variants.push(candidate.to_string());
        }
    };

    push(district);
    push(&*digit_numerals_to_kanji(district));

    let without_chome = CHOME_SUFFIX.replace(district, "");
    if without_chome != district {
        push(&*without_chome);
        push(&*digit_numerals_to_kanji(&without_chome));
    }

    let without_lot = HYPHENATED_SUFFIX.replace(district, "");
    if without_lot != district {
        push(&*without_lot);
    }

    let base = BASE_AREAS
        .iter()
        .filter_map(|re| re.find(district))
        .map(|m| m.as_str())
        .find(|base| *base != district && !base.trim().is_empty());
    if let Some(base) = base {
        push(base);
    }

    variants
}
