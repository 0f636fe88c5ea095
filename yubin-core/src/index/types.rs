//! Index types and constants.

use core::hash::BuildHasherDefault;

use indexmap::IndexMap;
use rustc_hash::FxHasher;
use yubin_types::{MatchPhase, PostalCode};

use crate::analyzer::AddressNormalizer;

/// Insertion-ordered map with the Fx hasher.
pub type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// District key to postal code, in registry order.
pub type DistrictMap = FxIndexMap<String, PostalCode>;

/// City name to its districts.
pub type CityMap = FxIndexMap<String, DistrictMap>;

/// Catch-all district labels of the registry, in lookup priority.
pub const GENERIC_DISTRICT_LABELS: [&str; 3] = ["以下に掲載がない場合", "その他", "該当地域なし"];

/// Fallback strategies, applied per district variant in this order.
pub const FALLBACK_STRATEGIES: [MatchPhase; 3] = [
    MatchPhase::Prefix,
    MatchPhase::Substring,
    MatchPhase::ReversePrefix,
];

/// Three-level registry index: prefecture → city → district → postal code.
///
/// Built once by [`Resolver`](crate::index::Resolver) and read-only
/// afterwards. When a (prefecture, city, district) triple repeats, the
/// first postal code seen is kept.
#[derive(Debug, Clone, Default)]
pub struct AddressIndex {
    pub(crate) prefectures: FxIndexMap<String, CityMap>,
}

impl AddressIndex {
    /// Inserts a district key. Returns `false` and keeps the stored code if
    /// the triple is already present.
    pub(crate) fn insert(
        &mut self,
        prefecture: &str,
        city: &str,
        district: String,
        code: PostalCode,
    ) -> bool {
        let p = match self.prefectures.get_index_of(prefecture) {
            Some(p) => p,
            None => {
                self.prefectures
                    .insert_full(prefecture.to_string(), CityMap::default())
                    .0
            }
        };
        let cities = &mut self.prefectures[p];

        let c = match cities.get_index_of(city) {
            Some(c) => c,
            None => cities.insert_full(city.to_string(), DistrictMap::default()).0,
        };

        match cities[c].entry(district) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(code);
                true
            }
        }
    }

    /// Returns the postal code stored for an exact triple.
    pub fn get(&self, prefecture: &str, city: &str, district: &str) -> Option<PostalCode> {
        self.districts(prefecture, city)?.get(district).copied()
    }

    /// Returns every district of a city, in registry order.
    pub fn districts(&self, prefecture: &str, city: &str) -> Option<&DistrictMap> {
        self.prefectures.get(prefecture)?.get(city)
    }

    /// Returns `true` if the prefecture has at least one district.
    pub fn contains_prefecture(&self, prefecture: &str) -> bool {
        self.prefectures.contains_key(prefecture)
    }

    /// Returns `true` if the city has at least one district.
    pub fn contains_city(&self, prefecture: &str, city: &str) -> bool {
        self.districts(prefecture, city).is_some()
    }

    /// Number of prefectures.
    #[inline(always)]
    #[must_use]
    pub fn prefecture_count(&self) -> usize {
        self.prefectures.len()
    }

    /// Number of cities across all prefectures.
    #[must_use]
    pub fn city_count(&self) -> usize {
        self.prefectures.values().map(IndexMap::len).sum()
    }

    /// Number of district keys across all cities.
    #[must_use]
    pub fn district_count(&self) -> usize {
        self.prefectures
            .values()
            .flat_map(IndexMap::values)
            .map(IndexMap::len)
            .sum()
    }

    /// Returns `true` if no district was indexed.
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefectures.is_empty()
    }
}

/// Counters collected while reading the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BuildCounters {
    pub rows_read: u64,
    pub rows_skipped: u64,
    pub duplicates_ignored: u64,
}

/// Address to postal code resolver.
///
/// Owns its [`AddressIndex`]. Lookups take `&self` and never mutate, so a
/// resolver can be shared across threads behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct Resolver {
    pub(crate) index: AddressIndex,
    pub(crate) normalizer: AddressNormalizer,
    pub(crate) counters: BuildCounters,
}

impl Resolver {
    pub(crate) fn with_index(index: AddressIndex, counters: BuildCounters) -> Self {
        Self {
            index,
            normalizer: AddressNormalizer::new(),
            counters,
        }
    }

    /// Returns the underlying index.
    #[inline(always)]
    pub fn index(&self) -> &AddressIndex {
        &self.index
    }

    /// Returns the normalizer used for queries.
    #[inline(always)]
    pub fn normalizer(&self) -> &AddressNormalizer {
        &self.normalizer
    }
}
