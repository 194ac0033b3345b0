//! Resolver strategies, strongest key first
//!
//! Each strategy indexes its source once (first row per key wins) and, given
//! the still-unresolved records, returns only the matches it can make.

use super::normalize::{normalize_alt_common, normalize_anchor_common};
use crate::models::{AltName, SpeciesRecord};
use crate::sources::SecondaryMapping;
use std::collections::HashMap;

/// One step of the reconciliation fallback chain
pub trait NameResolver: Send + Sync {
    /// Strategy name for logging and reports
    fn name(&self) -> &'static str;

    /// Resolve what this strategy can among `unresolved`
    ///
    /// Returns canonical key → alternate name for newly matched records only.
    fn resolve(&self, unresolved: &[&SpeciesRecord]) -> HashMap<String, AltName>;
}

/// Build a key → name index where the first row for a key wins
fn first_wins<I>(entries: I) -> HashMap<String, AltName>
where
    I: IntoIterator<Item = (String, AltName)>,
{
    let mut index = HashMap::new();
    for (key, name) in entries {
        index.entry(key).or_insert(name);
    }
    index
}

fn lookup_each<F>(
    unresolved: &[&SpeciesRecord],
    index: &HashMap<String, AltName>,
    key_of: F,
) -> HashMap<String, AltName>
where
    F: Fn(&SpeciesRecord) -> String,
{
    unresolved
        .iter()
        .filter_map(|record| {
            index
                .get(&key_of(record))
                .map(|name| (record.key().to_string(), name.clone()))
        })
        .collect()
}

/// Anchor scientific name equals IOC scientific name
pub struct ExactScientific {
    index: HashMap<String, AltName>,
}

impl ExactScientific {
    pub fn new(ioc: &[AltName]) -> Self {
        let index = first_wins(
            ioc.iter()
                .filter_map(|n| n.scientific.clone().map(|s| (s, n.clone()))),
        );
        Self { index }
    }
}

impl NameResolver for ExactScientific {
    fn name(&self) -> &'static str {
        "exact scientific name"
    }

    fn resolve(&self, unresolved: &[&SpeciesRecord]) -> HashMap<String, AltName> {
        lookup_each(unresolved, &self.index, |r| r.scientific_name.clone())
    }
}

/// Normalized anchor common name equals normalized IOC common name
pub struct NormalizedCommon {
    index: HashMap<String, AltName>,
}

impl NormalizedCommon {
    pub fn new(ioc: &[AltName]) -> Self {
        let index = first_wins(ioc.iter().filter_map(|n| {
            n.common
                .as_deref()
                .map(|c| (normalize_alt_common(c), n.clone()))
        }));
        Self { index }
    }
}

impl NameResolver for NormalizedCommon {
    fn name(&self) -> &'static str {
        "normalized common name"
    }

    fn resolve(&self, unresolved: &[&SpeciesRecord]) -> HashMap<String, AltName> {
        lookup_each(unresolved, &self.index, |r| normalize_anchor_common(&r.common_name))
    }
}

/// Cross-reference row whose Clements scientific name equals the anchor's
pub struct SecondaryByScientific {
    index: HashMap<String, AltName>,
}

impl SecondaryByScientific {
    pub fn new(mappings: &[SecondaryMapping]) -> Self {
        let index = first_wins(mappings.iter().filter_map(|m| {
            m.clements_scientific
                .clone()
                .map(|s| (s, m.ioc.clone()))
        }));
        Self { index }
    }
}

impl NameResolver for SecondaryByScientific {
    fn name(&self) -> &'static str {
        "cross-reference by scientific name"
    }

    fn resolve(&self, unresolved: &[&SpeciesRecord]) -> HashMap<String, AltName> {
        lookup_each(unresolved, &self.index, |r| r.scientific_name.clone())
    }
}

/// Cross-reference row whose Clements common name equals the anchor's (exact)
pub struct SecondaryByCommon {
    index: HashMap<String, AltName>,
}

impl SecondaryByCommon {
    pub fn new(mappings: &[SecondaryMapping]) -> Self {
        let index = first_wins(
            mappings
                .iter()
                .filter_map(|m| m.clements_common.clone().map(|c| (c, m.ioc.clone()))),
        );
        Self { index }
    }
}

impl NameResolver for SecondaryByCommon {
    fn name(&self) -> &'static str {
        "cross-reference by common name"
    }

    fn resolve(&self, unresolved: &[&SpeciesRecord]) -> HashMap<String, AltName> {
        lookup_each(unresolved, &self.index, |r| r.common_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::species::test_record;

    fn ioc(common: &str, scientific: &str) -> AltName {
        AltName::new(Some(common.to_string()), Some(scientific.to_string()))
    }

    fn mapping(ioc_name: AltName, common: &str, scientific: &str) -> SecondaryMapping {
        SecondaryMapping {
            ioc: ioc_name,
            clements_common: Some(common.to_string()),
            clements_scientific: Some(scientific.to_string()),
        }
    }

    #[test]
    fn test_exact_scientific_first_row_wins() {
        let names = vec![
            ioc("American Robin", "Turdus migratorius"),
            ioc("Robin (dup)", "Turdus migratorius"),
        ];
        let robin = test_record("American Robin", "Turdus migratorius");
        let jay = test_record("Blue Jay", "Cyanocitta cristata");

        let resolved = ExactScientific::new(&names).resolve(&[&robin, &jay]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved["Turdus migratorius"].common.as_deref(), Some("American Robin"));
    }

    #[test]
    fn test_normalized_common() {
        let names = vec![ioc("Grey Heron", "Ardea cinerea")];
        let heron = test_record("Gray Heron", "Ardea cinerea cinerea");

        let resolved = NormalizedCommon::new(&names).resolve(&[&heron]);
        assert_eq!(resolved["Ardea cinerea cinerea"].scientific.as_deref(), Some("Ardea cinerea"));
    }

    #[test]
    fn test_secondary_by_scientific_keeps_typos() {
        let mappings = vec![mapping(ioc("Western Cattle Egret", "Bubulcus ibiss"), "Cattle Egret", "Ardea ibis")];
        let egret = test_record("Cattle Egret", "Ardea ibis");

        let resolved = SecondaryByScientific::new(&mappings).resolve(&[&egret]);
        assert_eq!(resolved["Ardea ibis"].scientific.as_deref(), Some("Bubulcus ibiss"));
    }

    #[test]
    fn test_secondary_by_common_is_exact() {
        let mappings = vec![mapping(ioc("Grey Heron", "Ardea cinerea"), "Gray Heron", "Ardea old")];
        let exact = test_record("Gray Heron", "Ardea cinerea");
        let near = test_record("Gray-Heron", "Ardea other");

        let resolved = SecondaryByCommon::new(&mappings).resolve(&[&exact, &near]);
        assert_eq!(resolved.len(), 1);
        assert!(resolved.contains_key("Ardea cinerea"));
    }
}
