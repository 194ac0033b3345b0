//! Base data file: the reconciled canonical records

use super::create_parent;
use crate::models::{AltName, SpeciesRecord};
use crate::sources::{cell, open_table, Columns};
use std::path::Path;
use tracing::info;
use ub_common::{Error, Result};

pub const BASE_COLUMNS: [&str; 8] = [
    "English (Clements)",
    "Scientific (Clements)",
    "EBIRD",
    "TAXON_ORDER",
    "ORDER",
    "FAMILY",
    "English (IOC)",
    "Scientific (IOC)",
];

pub fn write_base(path: &Path, records: &[SpeciesRecord]) -> Result<()> {
    create_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(BASE_COLUMNS)?;
    for record in records {
        writer.write_record([
            record.common_name.as_str(),
            record.scientific_name.as_str(),
            record.ebird_url.as_str(),
            record.taxon_order.as_str(),
            record.order.as_str(),
            record.family.as_str(),
            record.ioc_common().unwrap_or_default(),
            record.ioc_scientific().unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    info!("Wrote {} base records to {}", records.len(), path.display());
    Ok(())
}

/// Read a base data file written by [`write_base`]
pub fn read_base(path: &Path) -> Result<Vec<SpeciesRecord>> {
    let mut reader = open_table(path, b',')?;
    let columns = Columns::new("base data", reader.headers()?);
    let positions = BASE_COLUMNS
        .iter()
        .map(|c| columns.require(c))
        .collect::<Result<Vec<usize>>>()?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let line = records.len() + 1;
        let required = |i: usize| {
            cell(&row, positions[i]).ok_or_else(|| {
                Error::Schema(format!(
                    "{}: empty '{}' in base data row {}",
                    path.display(),
                    BASE_COLUMNS[i],
                    line
                ))
            })
        };

        let ioc = AltName::new(cell(&row, positions[6]), cell(&row, positions[7]));
        records.push(SpeciesRecord {
            common_name: required(0)?,
            scientific_name: required(1)?,
            ebird_url: required(2)?,
            taxon_order: required(3)?,
            order: required(4)?,
            family: required(5)?,
            ioc: (!ioc.is_empty()).then_some(ioc),
        });
    }
    Ok(records)
}
