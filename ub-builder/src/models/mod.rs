//! Data model shared by every stage
//!
//! - [`SpeciesRecord`]: canonical per-species record from the base stage
//! - [`TagSet`]: ordered tag tokens, serialised only at export time
//! - [`EnrichmentTable`]: disjoint per-key output of one enrichment pass

pub mod species;
pub mod table;
pub mod tags;

pub use species::{AltName, SpeciesRecord};
pub use table::EnrichmentTable;
pub use tags::TagSet;
