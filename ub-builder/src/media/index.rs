//! Per-name candidate indexes, built once per run

use super::Candidate;
use crate::models::SpeciesRecord;
use std::collections::HashMap;

/// Names a species can be found under in the sound archive
#[derive(Debug, Clone, Copy)]
pub struct MediaIdentity<'a> {
    pub scientific: &'a str,
    pub common: &'a str,
    pub ioc_scientific: Option<&'a str>,
    pub ioc_common: Option<&'a str>,
}

impl<'a> From<&'a SpeciesRecord> for MediaIdentity<'a> {
    fn from(record: &'a SpeciesRecord) -> Self {
        Self {
            scientific: &record.scientific_name,
            common: &record.common_name,
            ioc_scientific: record.ioc_scientific(),
            ioc_common: record.ioc_common(),
        }
    }
}

/// Candidate pool grouped by scientific and by vernacular name
///
/// Groups keep pool order. Rows without a name are not indexed under it.
#[derive(Debug, Default)]
pub struct MediaIndex {
    pool: Vec<Candidate>,
    by_scientific: HashMap<String, Vec<usize>>,
    by_vernacular: HashMap<String, Vec<usize>>,
}

impl MediaIndex {
    pub fn build(pool: Vec<Candidate>) -> Self {
        let mut by_scientific: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_vernacular: HashMap<String, Vec<usize>> = HashMap::new();

        for (i, candidate) in pool.iter().enumerate() {
            if let Some(name) = &candidate.scientific_name {
                by_scientific.entry(name.clone()).or_default().push(i);
            }
            if let Some(name) = &candidate.vernacular_name {
                by_vernacular.entry(name.clone()).or_default().push(i);
            }
        }

        Self {
            pool,
            by_scientific,
            by_vernacular,
        }
    }

    /// Candidates for one species
    ///
    /// Tries scientific name, common name, IOC scientific name, then IOC common
    /// name. The first identity with any candidates wins; groups are never
    /// merged across identities.
    pub fn lookup(&self, identity: MediaIdentity<'_>) -> Vec<&Candidate> {
        let attempts = [
            (&self.by_scientific, Some(identity.scientific)),
            (&self.by_vernacular, Some(identity.common)),
            (&self.by_scientific, identity.ioc_scientific),
            (&self.by_vernacular, identity.ioc_common),
        ];

        attempts
            .into_iter()
            .find_map(|(index, name)| name.and_then(|n| index.get(n)))
            .map(|group| group.iter().map(|&i| &self.pool[i]).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(reference: &str, scientific: &str, vernacular: &str) -> Candidate {
        Candidate {
            observation_ref: reference.to_string(),
            scientific_name: Some(scientific.to_string()),
            vernacular_name: Some(vernacular.to_string()),
            ..Default::default()
        }
    }

    fn identity<'a>(
        scientific: &'a str,
        common: &'a str,
        ioc_scientific: Option<&'a str>,
        ioc_common: Option<&'a str>,
    ) -> MediaIdentity<'a> {
        MediaIdentity {
            scientific,
            common,
            ioc_scientific,
            ioc_common,
        }
    }

    fn index() -> MediaIndex {
        MediaIndex::build(vec![
            candidate("a", "Turdus migratorius", "American Robin"),
            candidate("b", "Ardea alba", "Great Egret"),
            candidate("c", "Bubulcus ibis", "Western Cattle Egret"),
            candidate("d", "Turdus migratorius", "American Robin"),
            candidate("e", "Ardea ibis", "Cattle Egret"),
        ])
    }

    fn refs(found: Vec<&Candidate>) -> Vec<&str> {
        found.iter().map(|c| c.observation_ref.as_str()).collect()
    }

    #[test]
    fn test_scientific_first() {
        let index = index();
        let found = index.lookup(identity("Turdus migratorius", "Great Egret", None, None));
        assert_eq!(refs(found), vec!["a", "d"]);
    }

    #[test]
    fn test_common_then_ioc_fallbacks() {
        let index = index();
        assert_eq!(
            refs(index.lookup(identity("Ardea modesta", "Great Egret", None, None))),
            vec!["b"]
        );
        assert_eq!(
            refs(index.lookup(identity("X y", "Nobody", Some("Bubulcus ibis"), Some("Great Egret")))),
            vec!["c"]
        );
        assert_eq!(
            refs(index.lookup(identity("X y", "Nobody", Some("Z z"), Some("Cattle Egret")))),
            vec!["e"]
        );
    }

    #[test]
    fn test_no_match() {
        let index = index();
        assert!(index.lookup(identity("X y", "Nobody", None, None)).is_empty());
    }
}
