//! First-generation deck loader (translation fallback)
//!
//! The first deck carried translations scraped from Avibase. Rows are keyed
//! both by their common name and by their scientific name.

use super::{cell, open_table, opt_cell, Columns};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;
use ub_common::Result;

const SOURCE: &str = "legacy deck";

/// Translations aligned with the requested language list
#[derive(Debug, Clone, Default)]
pub struct LegacyTranslations {
    pub by_common: HashMap<String, Vec<Option<String>>>,
    pub by_scientific: HashMap<String, Vec<Option<String>>>,
}

/// Load legacy translations; first row per key wins
pub fn load_legacy_translations(path: &Path, languages: &[&str]) -> Result<LegacyTranslations> {
    let mut reader = open_table(path, b',')?;
    let columns = Columns::new(SOURCE, reader.headers()?);

    let common = columns.require("PRIMARY_COM_NAME")?;
    let scientific = columns.require("SCI_NAME")?;
    let positions: Vec<Option<usize>> = languages.iter().map(|l| columns.find(l)).collect();

    let mut legacy = LegacyTranslations::default();
    for row in reader.records() {
        let row = row?;
        let values: Vec<Option<String>> = positions.iter().map(|&p| opt_cell(&row, p)).collect();

        if let Some(name) = cell(&row, common) {
            legacy.by_common.entry(name).or_insert_with(|| values.clone());
        }
        if let Some(name) = cell(&row, scientific) {
            legacy.by_scientific.entry(name).or_insert(values);
        }
    }

    info!(
        "Loaded legacy translations ({} by common name, {} by scientific name)",
        legacy.by_common.len(),
        legacy.by_scientific.len()
    );
    Ok(legacy)
}
