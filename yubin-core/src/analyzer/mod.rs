//! Address analysis pipeline.
//!
//! This module provides the text processing components:
//! - **Normalizer**: Canonicalizes a raw address string
//! - **Numerals**: Converts kanji block and grid-row numbers
//! - **Segmenter**: Splits a canonical address into prefecture, city and district
//! - **Variants**: Expands a district into ordered lookup keys

pub mod normalizer;
pub mod numerals;
pub mod segmenter;
pub mod variants;

pub use normalizer::AddressNormalizer;
pub use segmenter::parse_address;
pub use variants::{generate_district_variants, DistrictVariants};
