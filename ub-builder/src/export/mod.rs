//! File writers
//!
//! - [`deck`]: Anki import files (deck, deck with header, update file)
//! - [`base`]: reconciled base data
//! - [`processed`]: per-pass enrichment tables

pub mod base;
pub mod deck;
pub mod processed;

pub use base::{read_base, write_base};
pub use deck::{write_deck, write_deck_with_header, write_update};

use std::path::Path;
use ub_common::Result;

/// Create the parent directory of an output file if needed
pub(crate) fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
