//! Public API for resolving addresses.

use yubin_types::{AddressError, AddressParts, PostalCode, Resolution};

use crate::analyzer;
use crate::index::types::Resolver;

impl Resolver {
    /// Resolves an address to its postal code.
    ///
    /// `Ok(None)` means the address is well formed but no registry entry
    /// matched it.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidInput`] if `address` is empty or
    /// whitespace only.
    #[inline]
    pub fn resolve(&self, address: &str) -> Result<Option<PostalCode>, AddressError> {
        Ok(self.resolve_detailed(address)?.map(|r| r.postal_code))
    }

    /// Resolves an address and reports how the match was found.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidInput`] if `address` is empty or
    /// whitespace only.
    #[inline(never)]
    pub fn resolve_detailed(&self, address: &str) -> Result<Option<Resolution>, AddressError> {
        let normalized = self.normalizer.normalize(address)?;

        let Some(hit) = self.search(&normalized) else {
            return Ok(None);
        };

        Ok(Some(Resolution {
            postal_code: hit.code,
            matched_district: hit.district.to_string(),
            phase: hit.phase,
            normalized,
        }))
    }

    /// Canonicalizes an address the same way [`resolve`](Self::resolve) does.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidInput`] if `address` is empty or
    /// whitespace only.
    #[inline(always)]
    pub fn normalize(&self, address: &str) -> Result<String, AddressError> {
        self.normalizer.normalize(address)
    }

    /// Splits an address into prefecture, city and district.
    ///
    /// The input is used as given; call [`normalize`](Self::normalize)
    /// first for raw user input.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Segmentation`] if no prefecture or city
    /// segment is found.
    #[inline(always)]
    pub fn parse_address(&self, address: &str) -> Result<AddressParts, AddressError> {
        analyzer::parse_address(address)
    }
}
