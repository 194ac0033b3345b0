//! Clements ↔ IOC cross-reference loader
//!
//! The cross-reference sheet is older than the anchor taxonomy and contains a
//! handful of typos. Values are taken exactly as published.

use super::{cell, open_table, Columns};
use crate::models::AltName;
use std::path::Path;
use tracing::info;
use ub_common::Result;

const SOURCE: &str = "Clements/IOC cross-reference";

/// One row of the cross-reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryMapping {
    /// IOC name pair this row maps to
    pub ioc: AltName,
    pub clements_common: Option<String>,
    pub clements_scientific: Option<String>,
}

/// Load the cross-reference in file order
pub fn load_clements_ioc(path: &Path) -> Result<Vec<SecondaryMapping>> {
    let mut reader = open_table(path, b',')?;
    let columns = Columns::new(SOURCE, reader.headers()?);

    let ioc_common = columns.require("IOC common name")?;
    let ioc_scientific = columns.require("IOC scientific name")?;
    let clements_common = columns.require("Clements common name")?;
    let clements_scientific = columns.require("Clements scientific name")?;

    let mut mappings = Vec::new();
    for row in reader.records() {
        let row = row?;
        let ioc = AltName::new(cell(&row, ioc_common), cell(&row, ioc_scientific));
        if ioc.is_empty() {
            continue;
        }
        mappings.push(SecondaryMapping {
            ioc,
            clements_common: cell(&row, clements_common),
            clements_scientific: cell(&row, clements_scientific),
        });
    }

    info!("Loaded {} Clements/IOC mappings", mappings.len());
    Ok(mappings)
}
