//! Data quality checks on the base data and the final deck
//!
//! Problems are reported, not fatal: the pipeline logs each one as a warning
//! so the source tables can be fixed by hand before the next run.

use crate::combine::DeckRow;
use crate::models::SpeciesRecord;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{info, warn};

/// One data quality problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// A value appears in more than one row of a column that must be unique
    Duplicate { column: &'static str, value: String },
    /// A required column is empty for a species
    Empty { column: &'static str, species: String },
    /// The IOC scientific name of a species is another species' canonical name
    PossiblyWrongMapped { species: String, ioc_scientific: String },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::Duplicate { column, value } => write!(f, "duplicate {} '{}'", column, value),
            Issue::Empty { column, species } => write!(f, "empty {} for {}", column, species),
            Issue::PossiblyWrongMapped {
                species,
                ioc_scientific,
            } => write!(
                f,
                "{} maps to IOC '{}', which is another canonical species",
                species, ioc_scientific
            ),
        }
    }
}

/// Values occurring more than once, each reported once, in first-seen order
fn duplicates<'a, I>(column: &'static str, values: I) -> Vec<Issue>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();
    for value in values.into_iter().flatten() {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }
    order
        .into_iter()
        .filter(|v| counts[v] > 1)
        .map(|v| Issue::Duplicate {
            column,
            value: v.to_string(),
        })
        .collect()
}

/// Base data checks: unique names in both systems and consistent IOC mapping
pub fn check_base(records: &[SpeciesRecord]) -> Vec<Issue> {
    let mut issues = Vec::new();
    issues.extend(duplicates(
        "English (Clements)",
        records.iter().map(|r| Some(r.common_name.as_str())),
    ));
    issues.extend(duplicates(
        "Scientific (Clements)",
        records.iter().map(|r| Some(r.scientific_name.as_str())),
    ));
    issues.extend(duplicates("English (IOC)", records.iter().map(|r| r.ioc_common())));
    issues.extend(duplicates("Scientific (IOC)", records.iter().map(|r| r.ioc_scientific())));
    issues.extend(possibly_wrong_mapped(records));
    issues
}

/// IOC scientific names that equal a different species' canonical name
pub fn possibly_wrong_mapped(records: &[SpeciesRecord]) -> Vec<Issue> {
    let canonical: HashSet<&str> = records.iter().map(|r| r.key()).collect();
    records
        .iter()
        .filter_map(|r| {
            let ioc = r.ioc_scientific()?;
            (canonical.contains(ioc) && ioc != r.key()).then(|| Issue::PossiblyWrongMapped {
                species: r.key().to_string(),
                ioc_scientific: ioc.to_string(),
            })
        })
        .collect()
}

/// Final deck checks: required fields present and identifying fields unique
pub fn check_deck(rows: &[DeckRow]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for row in rows {
        let record = &row.record;
        let required: [(&'static str, Option<&str>); 8] = [
            ("English", Some(record.common_name.as_str())),
            ("Scientific", Some(record.scientific_name.as_str())),
            ("eBird URL", Some(record.ebird_url.as_str())),
            ("Taxonomic order", Some(record.taxon_order.as_str())),
            ("Order", Some(record.order.as_str())),
            ("Family", Some(record.family.as_str())),
            ("Avibase URL", row.avibase_url.as_deref()),
            ("Conservation status", row.conservation_status.as_deref()),
        ];
        for (column, value) in required {
            if value.map_or(true, str::is_empty) {
                issues.push(Issue::Empty {
                    column,
                    species: record.key().to_string(),
                });
            }
        }
    }

    let records = || rows.iter().map(|r| &r.record);
    issues.extend(duplicates("English", records().map(|r| Some(r.common_name.as_str()))));
    issues.extend(duplicates("Scientific", records().map(|r| Some(r.scientific_name.as_str()))));
    issues.extend(duplicates("eBird URL", records().map(|r| Some(r.ebird_url.as_str()))));
    issues.extend(duplicates("Taxonomic order", records().map(|r| Some(r.taxon_order.as_str()))));
    issues.extend(duplicates("Avibase URL", rows.iter().map(|r| r.avibase_url.as_deref())));
    issues
}

/// Log every issue as a warning and return how many there were
pub fn report(stage: &str, issues: &[Issue]) -> usize {
    for issue in issues {
        warn!(stage, "{}", issue);
    }
    if issues.is_empty() {
        info!(stage, "Data checks passed");
    }
    issues.len()
}
