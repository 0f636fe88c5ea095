//! Index building logic.

use std::path::Path;
use std::time::Instant;

use tracing::{info, trace};
use yubin_types::{RegistryConfig, RegistryError, RegistryRow};

use crate::index::qualifier::clean_district_key;
use crate::index::types::{AddressIndex, BuildCounters, Resolver};
use crate::registry::{self, SkipReason};

/// Accumulates rows into an [`AddressIndex`].
#[derive(Debug, Default)]
struct IndexBuilder {
    index: AddressIndex,
    counters: BuildCounters,
    started: Option<Instant>,
}

impl IndexBuilder {
    fn new() -> Self {
        Self {
            started: Some(Instant::now()),
            ..Self::default()
        }
    }

    fn push(&mut self, row: RegistryRow) {
        self.counters.rows_read += 1;

        let key = clean_district_key(&row.district);
        if key.is_empty() {
            self.counters.rows_skipped += 1;
            trace!(district = %row.district, "district key empty after cleaning");
            return;
        }

        if !self
            .index
            .insert(&row.prefecture, &row.city, key, row.postal_code)
        {
            self.counters.duplicates_ignored += 1;
        }
    }

    fn skip(&mut self, line: usize, reason: SkipReason) {
        self.counters.rows_read += 1;
        self.counters.rows_skipped += 1;
        trace!(line, ?reason, "registry row skipped");
    }

    fn finish(self) -> Resolver {
        let elapsed = self.started.map(|t| t.elapsed()).unwrap_or_default();
        info!(
            rows_read = self.counters.rows_read,
            rows_skipped = self.counters.rows_skipped,
            duplicates_ignored = self.counters.duplicates_ignored,
            prefectures = self.index.prefecture_count(),
            cities = self.index.city_count(),
            districts = self.index.district_count(),
            elapsed_ms = elapsed.as_millis() as u64,
            "address index built"
        );
        Resolver::with_index(self.index, self.counters)
    }
}

impl Resolver {
    /// Builds a resolver from a UTF-8 registry file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SourceNotFound`] if the file does not exist
    /// and [`RegistryError::Encoding`] if it is not valid UTF-8.
    pub fn build(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        Self::build_with_config(path, RegistryConfig::default())
    }

    /// Builds a resolver from a registry file in the configured encoding.
    ///
    /// # Errors
    ///
    /// See [`registry::read_registry`].
    pub fn build_with_config(
        path: impl AsRef<Path>,
        config: RegistryConfig,
    ) -> Result<Self, RegistryError> {
        let text = registry::read_registry(path.as_ref(), config)?;
        Ok(Self::from_registry_str(&text))
    }

    /// Builds a resolver from decoded registry text.
    pub fn from_registry_str(text: &str) -> Self {
        let mut builder = IndexBuilder::new();
        for (line, outcome) in registry::rows(text) {
            match outcome {
                Ok(row) => builder.push(row),
                Err(reason) => builder.skip(line, reason),
            }
        }
        builder.finish()
    }

    /// Builds a resolver from parsed rows, in order.
    ///
    /// Rows with a blank district are skipped.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RegistryRow>,
    {
        let mut builder = IndexBuilder::new();
        for (i, row) in rows.into_iter().enumerate() {
            if row.district.trim().is_empty() {
                builder.skip(i + 1, SkipReason::EmptyDistrict);
            } else {
                builder.push(row);
            }
        }
        builder.finish()
    }
}
