//! Statistics and IndexStats.

use crate::index::types::Resolver;

/// A snapshot of index statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of prefectures.
    pub prefectures: usize,
    /// Number of cities across all prefectures.
    pub cities: usize,
    /// Number of district keys.
    pub districts: usize,
    /// Registry rows seen, including skipped ones.
    pub rows_read: u64,
    /// Rows that were malformed or had no usable district.
    pub rows_skipped: u64,
    /// Rows whose district key was already indexed.
    pub duplicates_ignored: u64,
}

impl Resolver {
    /// Returns index statistics.
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            prefectures: self.index.prefecture_count(),
            cities: self.index.city_count(),
            districts: self.index.district_count(),
            rows_read: self.counters.rows_read,
            rows_skipped: self.counters.rows_skipped,
            duplicates_ignored: self.counters.duplicates_ignored,
        }
    }
}

impl IndexStats {
    /// Rows that produced a new district key.
    pub fn rows_indexed(&self) -> u64 {
        self.rows_read
            .saturating_sub(self.rows_skipped)
            .saturating_sub(self.duplicates_ignored)
    }
}

impl core::fmt::Display for IndexStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} prefectures, {} cities, {} districts",
            self.prefectures, self.cities, self.districts
        )?;

        if self.rows_read > 0 {
            write!(
                f,
                " from {} rows ({} skipped, {} duplicates)",
                self.rows_read, self.rows_skipped, self.duplicates_ignored
            )?;
        }

        Ok(())
    }
}
