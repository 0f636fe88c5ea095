//! Japanese address to postal code resolution.
//!
//! The crate has two layers:
//!
//! - [`analyzer`] canonicalizes free-form address text, splits it into
//!   prefecture, city and district, and expands a district into the
//!   spellings the registry may use.
//! - [`index`] builds a prefecture → city → district index from the postal
//!   registry once and answers lookups against it.
//!
//! ```no_run
//! use yubin_core::Resolver;
//!
//! let resolver = Resolver::build("ken_all.csv")?;
//! let code = resolver.resolve("東京都港区六本木５丁目１−２−３ヒルズタワー")?;
//! println!("{}", code.map_or("not found".to_string(), |c| c.to_string()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod analyzer;
pub mod index;
pub mod registry;

pub use analyzer::{generate_district_variants, parse_address, AddressNormalizer};
pub use index::{AddressIndex, IndexStats, Resolver};
pub use yubin_types::{
    AddressError, AddressParts, ChomeRange, MatchPhase, PostalCode, RegistryConfig,
    RegistryEncoding, RegistryError, RegistryRow, Resolution, Segment,
};
