//! eBird taxonomy (anchor dataset) loader

use super::{cell, open_table, Columns};
use crate::models::species::{ebird_url, SpeciesRecord};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;
use ub_common::{Error, Result};

const SOURCE: &str = "eBird taxonomy";

/// Load the anchor species list
///
/// Only rows whose `CATEGORY` is `species` are kept. The scientific name must
/// be present and unique; anything else is a schema error.
pub fn load_anchor(path: &Path) -> Result<Vec<SpeciesRecord>> {
    let mut reader = open_table(path, b',')?;
    let columns = Columns::new(SOURCE, reader.headers()?);

    let category = columns.require("CATEGORY")?;
    let common = columns.require("PRIMARY_COM_NAME")?;
    let scientific = columns.require("SCI_NAME")?;
    let taxon_order = columns.require("TAXON_ORDER")?;
    let order = columns.require("ORDER")?;
    let family = columns.require("FAMILY")?;
    let species_code = columns.require("SPECIES_CODE")?;

    let mut records = Vec::new();
    let mut seen = HashSet::new();

    for (line, row) in reader.records().enumerate() {
        let row = row?;
        if row.get(category) != Some("species") {
            continue;
        }

        let scientific_name = cell(&row, scientific).ok_or_else(|| {
            Error::Schema(format!("{}: species row {} has no SCI_NAME", SOURCE, line + 2))
        })?;
        if !seen.insert(scientific_name.clone()) {
            return Err(Error::Schema(format!(
                "{}: duplicate scientific name '{}'",
                SOURCE, scientific_name
            )));
        }

        let code = cell(&row, species_code).ok_or_else(|| {
            Error::Schema(format!("{}: '{}' has no SPECIES_CODE", SOURCE, scientific_name))
        })?;

        records.push(SpeciesRecord {
            common_name: cell(&row, common).unwrap_or_default(),
            ebird_url: ebird_url(&code),
            taxon_order: cell(&row, taxon_order).unwrap_or_default(),
            order: cell(&row, order).unwrap_or_default(),
            family: cell(&row, family).unwrap_or_default(),
            scientific_name,
            ioc: None,
        });
    }

    info!("Loaded {} species from {}", records.len(), path.display());
    Ok(records)
}
