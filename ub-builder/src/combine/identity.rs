//! Stable identifiers carried over from the previous deck generation

use super::DeckRow;
use crate::sources::PriorNote;
use std::collections::HashMap;
use tracing::info;

/// Lookup tables from the previous generation, first note per value wins
#[derive(Debug, Default)]
pub struct PriorIndex {
    by_url: HashMap<String, String>,
    by_common: HashMap<String, String>,
    by_scientific: HashMap<String, String>,
}

impl PriorIndex {
    pub fn build(notes: &[PriorNote]) -> Self {
        let mut index = Self::default();
        for note in notes {
            if let Some(url) = &note.ebird_url {
                index.by_url.entry(url.clone()).or_insert_with(|| note.id.clone());
            }
            if let Some(name) = &note.common_name {
                index.by_common.entry(name.clone()).or_insert_with(|| note.id.clone());
            }
            if let Some(name) = &note.scientific_name {
                index.by_scientific.entry(name.clone()).or_insert_with(|| note.id.clone());
            }
        }
        index
    }

    /// Previous identifier for a row: by eBird URL, then common name, then
    /// scientific name
    pub fn lookup(&self, row: &DeckRow) -> Option<&str> {
        let record = &row.record;
        self.by_url
            .get(&record.ebird_url)
            .or_else(|| self.by_common.get(&record.common_name))
            .or_else(|| self.by_scientific.get(&record.scientific_name))
            .map(String::as_str)
    }
}

/// Result of identifier assignment
#[derive(Debug)]
pub struct IdentityReport<'a> {
    /// Rows carrying a previous identifier, in deck order
    pub matched: Vec<(String, &'a DeckRow)>,
    /// Rows with no previous note
    pub unmatched: usize,
    /// Identifiers claimed by more than one row, in first-seen order
    pub splits: Vec<String>,
}

/// Attach previous identifiers to deck rows
///
/// Rows without a match are left out, and so is every row of a split: an
/// identifier matched by two or more rows is not carried over at all.
pub fn assign_identifiers<'a>(rows: &'a [DeckRow], index: &PriorIndex) -> IdentityReport<'a> {
    let candidates: Vec<(String, &DeckRow)> = rows
        .iter()
        .filter_map(|row| index.lookup(row).map(|id| (id.to_string(), row)))
        .collect();
    let unmatched = rows.len() - candidates.len();

    let mut claims: HashMap<&str, usize> = HashMap::new();
    for (id, _) in &candidates {
        *claims.entry(id.as_str()).or_default() += 1;
    }

    let mut splits: Vec<String> = Vec::new();
    for (id, _) in &candidates {
        if claims[id.as_str()] > 1 && !splits.contains(id) {
            splits.push(id.clone());
        }
    }

    let matched: Vec<(String, &DeckRow)> = candidates
        .iter()
        .filter(|(id, _)| claims[id.as_str()] == 1)
        .map(|(id, row)| (id.clone(), *row))
        .collect();

    info!(
        matched = matched.len(),
        unmatched,
        splits = splits.len(),
        "Assigned previous note identifiers"
    );
    IdentityReport {
        matched,
        unmatched,
        splits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::species::test_record;
    use crate::models::TagSet;

    fn row(common: &str, scientific: &str, url: &str) -> DeckRow {
        let mut record = test_record(common, scientific);
        record.ebird_url = url.to_string();
        DeckRow {
            record,
            tags: TagSet::new(),
            avibase_url: None,
            conservation_status: None,
            translations: Vec::new(),
            mnemonics: None,
            images: None,
            identification: None,
            sounds: None,
        }
    }

    fn note(id: &str, common: Option<&str>, scientific: Option<&str>, url: Option<&str>) -> PriorNote {
        PriorNote {
            id: id.to_string(),
            common_name: common.map(str::to_string),
            scientific_name: scientific.map(str::to_string),
            ebird_url: url.map(str::to_string),
        }
    }

    #[test]
    fn test_url_match_wins_over_names() {
        let notes = vec![
            note("id-url", Some("Old Robin Name"), Some("Turdus oldus"), Some("https://ebird.org/species/amerob")),
            note("id-name", Some("American Robin"), None, None),
        ];
        let rows = vec![row("American Robin", "Turdus migratorius", "https://ebird.org/species/amerob")];

        let report = assign_identifiers(&rows, &PriorIndex::build(&notes));
        assert_eq!(report.matched.len(), 1);
        assert_eq!(report.matched[0].0, "id-url");
    }

    #[test]
    fn test_fallback_to_common_then_scientific() {
        let notes = vec![
            note("id-common", Some("Blue Jay"), None, None),
            note("id-sci", None, Some("Cardinalis cardinalis"), None),
            note("id-sci-dup", None, Some("Cardinalis cardinalis"), None),
        ];
        let rows = vec![
            row("Blue Jay", "Cyanocitta cristata", "u1"),
            row("Northern Cardinal", "Cardinalis cardinalis", "u2"),
            row("New Species", "Avis nova", "u3"),
        ];

        let report = assign_identifiers(&rows, &PriorIndex::build(&notes));
        let ids: Vec<_> = report.matched.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["id-common", "id-sci"]);
        assert_eq!(report.unmatched, 1);
        assert!(report.splits.is_empty());
    }

    #[test]
    fn test_split_excluded_entirely() {
        let notes = vec![note("id-shrike", Some("Northern Shrike"), Some("Lanius excubitor"), None)];
        let rows = vec![
            row("Northern Shrike", "Lanius borealis", "u1"),
            row("Great Gray Shrike", "Lanius excubitor", "u2"),
            row("Blue Jay", "Cyanocitta cristata", "u3"),
        ];

        let report = assign_identifiers(&rows, &PriorIndex::build(&notes));
        assert!(report.matched.is_empty());
        assert_eq!(report.splits, vec!["id-shrike".to_string()]);
        assert_eq!(report.unmatched, 1);
    }
}
