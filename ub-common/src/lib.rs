//! # Ultimate Birds Common Library
//!
//! Shared code for the deck builder workspace:
//! - Error types
//! - TOML bootstrap configuration and root folder resolution
//! - Logging initialisation

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
