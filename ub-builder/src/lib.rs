//! ub-builder library interface
//!
//! Builds the Ultimate Birds Anki deck from the eBird taxonomy, the IOC list,
//! a sound archive and scraped Avibase / eBird pages.
//!
//! - Engines: [`reconcile`], [`media`], [`tags`], [`combine`]
//! - Inputs: [`sources`] (local files), [`enrich`] + [`fetch`] (web passes)
//! - Outputs: [`export`]
//! - Orchestration: [`pipeline`], configured through [`config`]

pub mod combine;
pub mod config;
pub mod enrich;
pub mod export;
pub mod fetch;
pub mod media;
pub mod models;
pub mod pipeline;
pub mod reconcile;
pub mod sources;
pub mod tags;
pub mod validate;

pub use config::BuilderConfig;
pub use pipeline::{default_version, CombineSummary, Pipeline};
