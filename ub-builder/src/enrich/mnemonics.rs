//! Mnemonics pass

use crate::models::{EnrichmentTable, SpeciesRecord};
use std::collections::HashMap;
use tracing::info;
use ub_common::Result;

/// Name of the mnemonics pass and its processed table
pub const MNEMONICS_PASS: &str = "mnemonics";

/// Attach mnemonic text to species by canonical common name
///
/// A later block for the same name replaces an earlier one.
pub fn mnemonics_pass(
    records: &[SpeciesRecord],
    entries: &[(String, String)],
) -> Result<EnrichmentTable<String>> {
    let by_name: HashMap<&str, &str> = entries
        .iter()
        .map(|(name, text)| (name.as_str(), text.as_str()))
        .collect();

    let mut table = EnrichmentTable::new(MNEMONICS_PASS);
    for record in records {
        if let Some(text) = by_name.get(record.common_name.as_str()) {
            table.insert(record.key(), text.to_string())?;
        }
    }

    info!("Found mnemonics for {} species", table.len());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::species::test_record;

    #[test]
    fn test_last_block_wins() {
        let records = vec![
            test_record("American Robin", "Turdus migratorius"),
            test_record("Blue Jay", "Cyanocitta cristata"),
        ];
        let entries = vec![
            ("American Robin".to_string(), "old".to_string()),
            ("Unknown Bird".to_string(), "nobody".to_string()),
            ("American Robin".to_string(), "cheerily<br/>cheer up".to_string()),
        ];

        let table = mnemonics_pass(&records, &entries).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.get("Turdus migratorius").map(String::as_str),
            Some("cheerily<br/>cheer up")
        );
    }
}
