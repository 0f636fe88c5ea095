use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use yubin_types::AddressError;

use crate::analyzer::numerals::kanji_numerals_to_digits;

/// Building and complex name keywords. Each keyword and everything after
/// its first occurrence is dropped.
pub const BUILDING_KEYWORDS: [&str; 10] = [
    "ヒルズ",
    "タワー",
    "ビル",
    "マンション",
    "アパート",
    "ハイツ",
    "コーポ",
    "プラザ",
    "センター",
    "フィナンシャル",
];

/// Sub-area markers that never change which area an address names.
/// `大字` must be removed before `字`.
pub const SUB_AREA_MARKERS: [&str; 2] = ["大字", "字"];

/// Small-ke spelling substitution: `ケ` is written `ヶ` in place names.
const KE_VARIANT: (char, char) = ('ケ', 'ヶ');

static SPECIFIC_LOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+番地$").expect("valid regex"));
static HYPHENATED_LOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)[0-9]+[-−－][0-9]+[-−－]*[0-9]*.*$").expect("valid regex"));
static BAN_GOU_LOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)[0-9]+番[0-9]+号?.*$").expect("valid regex"));
static DIGITS_AFTER_CHOME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)丁目[0-9]+.*$").expect("valid regex"));

/// Folds a full-width ASCII digit or Latin letter to its half-width form.
///
/// Every other character is returned unchanged.
#[inline(always)]
pub fn fold_full_width(c: char) -> char {
    match c {
        '０'..='９' | 'Ａ'..='Ｚ' | 'ａ'..='ｚ' => {
            char::from_u32(c as u32 - 0xFEE0).unwrap_or(c)
        }
        _ => c,
    }
}

/// Widens a half-width ASCII digit to its full-width form.
#[inline(always)]
pub fn widen_digit(c: char) -> char {
    match c {
        '0'..='9' => char::from_u32(c as u32 + 0xFEE0).unwrap_or(c),
        _ => c,
    }
}

/// Japanese postal address normalizer.
///
/// Produces the canonical form used for index lookups:
/// - Trims surrounding whitespace
/// - Folds full-width digits and Latin letters to half-width
/// - Removes `大字`/`字` markers
/// - Rewrites kanji numerals before `丁目`/`条` as digits (1-48)
/// - Drops street numbers and lot suffixes, keeping a trailing `NNN番地`
/// - Drops building names
/// - Spells `ケ` as `ヶ`
///
/// # Examples
///
/// ```
/// use yubin_core::analyzer::AddressNormalizer;
///
/// let normalizer = AddressNormalizer::default();
/// assert_eq!(
///     normalizer.normalize("東京都港区六本木５丁目１−２−３ヒルズタワー").unwrap(),
///     "東京都港区六本木5丁目"
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressNormalizer;

impl AddressNormalizer {
    /// Creates a new normalizer.
    pub const fn new() -> Self {
        Self
    }

    /// Normalizes an address into its canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidInput`] if the address is empty or
    /// whitespace only.
    pub fn normalize(&self, address: &str) -> Result<String, AddressError> {
        let mut out = String::with_capacity(address.len());
        self.normalize_into(address, &mut out)?;
        Ok(out)
    }

    /// Normalizes an address into `out`, replacing its contents.
    ///
    /// Sub-area markers go before numeral conversion and suffix stripping,
    /// so no later step can expose something an earlier one would rewrite.
    /// On error the buffer is left empty.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidInput`] if the address is empty or
    /// whitespace only.
    pub fn normalize_into(&self, address: &str, out: &mut String) -> Result<(), AddressError> {
        out.clear();

        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(AddressError::InvalidInput);
        }
        out.extend(trimmed.chars().map(fold_full_width));

        for marker in SUB_AREA_MARKERS {
            if out.contains(marker) {
                *out = out.replace(marker, "");
            }
        }

        let numbered = match kanji_numerals_to_digits(out) {
            Cow::Owned(converted) => Some(converted),
            Cow::Borrowed(_) => None,
        };
        if let Some(converted) = numbered {
            *out = converted;
        }

        *out = strip_street_info(out);

        let (from, to) = KE_VARIANT;
        if out.contains(from) {
            *out = out.replace(from, &to.to_string());
        }

        let end = out.trim_end().len();
        out.truncate(end);
        let start = out.len() - out.trim_start().len();
        out.replace_range(..start, "");

        Ok(())
    }
}

/// Removes lot numbers and building names, unless the address ends in a
/// specific `NNN番地` lot which the registry may list on its own.
fn strip_street_info(address: &str) -> String {
    if SPECIFIC_LOT.is_match(address) {
        return address.to_string();
    }

    let mut out = HYPHENATED_LOT.replace(address, "").into_owned();
    out = BAN_GOU_LOT.replace(&out, "").into_owned();
    out = DIGITS_AFTER_CHOME.replace(&out, "丁目").into_owned();

    for keyword in BUILDING_KEYWORDS {
        if let Some(pos) = out.find(keyword) {
            out.truncate(pos);
        }
    }

    out
}
