//! Kanji numeral conversion for block (`丁目`) and grid-row (`条`) numbers.
//!
//! Addresses write the same block number three ways: `5丁目`, `５丁目` and
//! `五丁目`. The registry mostly uses kanji words for grid rows (`北四条西`)
//! while people type digits. This module converts between the two for
//! the range the registry actually uses, 1 through 48.
//!
//! ## Supported shapes
//!
//! | Shape      | Example  | Value   |
//! |------------|----------|---------|
//! | `D`        | `五`     | 1-9     |
//! | `十`       | `十`     | 10      |
//! | `十D`      | `十二`   | 11-19   |
//! | `D十`      | `三十`   | 20-40   |
//! | `D十D`     | `四十八` | 21-48   |
//!
//! Anything else (`百`, `五十`, `十十`) is unconvertible and left as written.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::analyzer::normalizer::fold_full_width;

/// Largest numeral converted in either direction.
pub const MAX_NUMERAL: u32 = 48;

const TEN: char = '十';

const KANJI_DIGITS: [char; 9] = ['一', '二', '三', '四', '五', '六', '七', '八', '九'];

static KANJI_BEFORE_CHOME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([一二三四五六七八九十]+)丁目").expect("valid regex"));
static KANJI_BEFORE_JO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([一二三四五六七八九十]+)条").expect("valid regex"));
static DIGITS_BEFORE_JO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)条").expect("valid regex"));
static DIGITS_BEFORE_CHOME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)丁目").expect("valid regex"));

#[inline(always)]
fn kanji_digit(c: char) -> Option<u32> {
    KANJI_DIGITS
        .iter()
        .position(|&k| k == c)
        .map(|i| i as u32 + 1)
}

/// Converts a kanji numeral word to its value.
///
/// Returns `None` for unsupported shapes and for values above [`MAX_NUMERAL`].
pub fn kanji_to_number(word: &str) -> Option<u32> {
    let mut chars = word.chars();
    let value = match (chars.next(), chars.next(), chars.next(), chars.next()) {
        (Some(d), None, None, None) if d == TEN => 10,
        (Some(d), None, None, None) => kanji_digit(d)?,
        (Some(t), Some(d), None, None) if t == TEN => 10 + kanji_digit(d)?,
        (Some(d), Some(t), None, None) if t == TEN => kanji_digit(d)? * 10,
        (Some(d), Some(t), Some(o), None) if t == TEN => kanji_digit(d)? * 10 + kanji_digit(o)?,
        _ => return None,
    };

    (value <= MAX_NUMERAL).then_some(value)
}

/// Writes `n` as a kanji numeral word, the inverse of [`kanji_to_number`].
pub fn number_to_kanji(n: u32) -> Option<String> {
    if n == 0 || n > MAX_NUMERAL {
        return None;
    }

    let digit = |d: u32| KANJI_DIGITS[d as usize - 1];
    let (tens, ones) = (n / 10, n % 10);
    let mut out = String::with_capacity(9);

    match tens {
        0 => {}
        1 => out.push(TEN),
        _ => {
            out.push(digit(tens));
            out.push(TEN);
        }
    }
    if ones > 0 {
        out.push(digit(ones));
    }

    Some(out)
}

/// Parses a block number written in half-width digits, full-width digits
/// or a kanji numeral word.
pub fn parse_block_number(text: &str) -> Option<u32> {
    if text.is_empty() {
        return None;
    }

    if text.chars().all(|c| fold_full_width(c).is_ascii_digit()) {
        let digits: String = text.chars().map(fold_full_width).collect();
        return digits.parse().ok();
    }

    kanji_to_number(text)
}

/// Rewrites kanji numerals directly before `丁目` and `条` as digits.
///
/// `北一条西十二丁目` becomes `北1条西12丁目`. Unconvertible numerals are
/// kept verbatim.
pub fn kanji_numerals_to_digits(text: &str) -> Cow<'_, str> {
    let chome = replace_numerals(&KANJI_BEFORE_CHOME, text, "丁目", |word| {
        kanji_to_number(word).map(|n| n.to_string())
    });

    let jo = match replace_numerals(&KANJI_BEFORE_JO, &chome, "条", |word| {
        kanji_to_number(word).map(|n| n.to_string())
    }) {
        Cow::Owned(converted) => Some(converted),
        Cow::Borrowed(_) => None,
    };

    jo.map_or(chome, Cow::Owned)
}

/// Rewrites digits directly before `条` and `丁目` as kanji numerals.
///
/// This produces the spelling the registry uses for grid-planned cities:
/// `北1条西1丁目` becomes `北一条西一丁目`.
pub fn digit_numerals_to_kanji(text: &str) -> Cow<'_, str> {
    let jo = replace_numerals(&DIGITS_BEFORE_JO, text, "条", |digits| {
        digits.parse().ok().and_then(number_to_kanji)
    });

    let chome = match replace_numerals(&DIGITS_BEFORE_CHOME, &jo, "丁目", |digits| {
        digits.parse().ok().and_then(number_to_kanji)
    }) {
        Cow::Owned(converted) => Some(converted),
        Cow::Borrowed(_) => None,
    };

    chome.map_or(jo, Cow::Owned)
}

fn replace_numerals<'t, F>(pattern: &Regex, text: &'t str, marker: &str, convert: F) -> Cow<'t, str>
where
    F: Fn(&str) -> Option<String>,
{
    pattern.replace_all(text, |caps: &Captures<'_>| match convert(&caps[1]) {
        Some(converted) => format!("{converted}{marker}"),
        None => caps[0].to_string(),
    })
}
