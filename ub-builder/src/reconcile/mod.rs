//! Name Reconciliation Engine
//!
//! Resolves every anchor species to its IOC name pair through an ordered chain
//! of [`NameResolver`] strategies:
//!
//! 1. [`ExactScientific`]: anchor scientific name == IOC scientific name
//! 2. [`NormalizedCommon`]: normalized common names match
//! 3. [`SecondaryByScientific`]: cross-reference table by Clements scientific name
//! 4. [`SecondaryByCommon`]: cross-reference table by Clements common name
//!
//! Each strategy only sees records still missing a name after the previous
//! ones. The common and scientific names are filled independently and a known
//! name is never replaced.

pub mod normalize;
pub mod strategies;

pub use normalize::{fold_diacritics, normalize_alt_common, normalize_anchor_common};
pub use strategies::{
    ExactScientific, NameResolver, NormalizedCommon, SecondaryByCommon, SecondaryByScientific,
};

use crate::models::{AltName, SpeciesRecord};
use crate::sources::SecondaryMapping;
use std::collections::HashSet;
use tracing::{debug, info};
use ub_common::{Error, Result};

/// Outcome of one reconciliation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// (strategy name, records it added a name to) in application order
    pub resolved_by: Vec<(&'static str, usize)>,
    pub unresolved: usize,
    pub total: usize,
}

impl ReconcileReport {
    pub fn resolved(&self) -> usize {
        self.total - self.unresolved
    }
}

/// Ordered fallback chain of resolver strategies
pub struct Reconciler {
    strategies: Vec<Box<dyn NameResolver>>,
}

impl Reconciler {
    /// Empty chain; add strategies with [`Reconciler::with_strategy`]
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// The standard four-step chain over the IOC list and the cross-reference table
    pub fn standard(ioc: &[AltName], secondary: &[SecondaryMapping]) -> Self {
        Self::new()
            .with_strategy(ExactScientific::new(ioc))
            .with_strategy(NormalizedCommon::new(ioc))
            .with_strategy(SecondaryByScientific::new(secondary))
            .with_strategy(SecondaryByCommon::new(secondary))
    }

    pub fn with_strategy(mut self, strategy: impl NameResolver + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Resolve IOC names for `records`
    ///
    /// **Algorithm:**
    /// 1. Reject duplicate canonical keys (the anchor must already be unique)
    /// 2. For each strategy, collect the records still missing either name and apply it
    /// 3. Fill each missing name from the strategy's pair; known names stay
    ///
    /// A record counts as resolved once it has either name. Running the chain
    /// twice gives the same table.
    pub fn reconcile(
        &self,
        mut records: Vec<SpeciesRecord>,
    ) -> Result<(Vec<SpeciesRecord>, ReconcileReport)> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.key()) {
                return Err(Error::Cardinality(format!(
                    "duplicate canonical key '{}' entering reconciliation",
                    record.key()
                )));
            }
        }

        let mut report = ReconcileReport {
            total: records.len(),
            ..Default::default()
        };

        for strategy in &self.strategies {
            let resolved = {
                let unresolved: Vec<&SpeciesRecord> =
                    records.iter().filter(|r| is_incomplete(r)).collect();
                if unresolved.is_empty() {
                    report.resolved_by.push((strategy.name(), 0));
                    continue;
                }
                strategy.resolve(&unresolved)
            };

            let mut filled = 0;
            for record in records.iter_mut().filter(|r| is_incomplete(r)) {
                if let Some(name) = resolved.get(record.key()) {
                    if fill_missing(record, name) {
                        filled += 1;
                    }
                }
            }
            debug!(strategy = strategy.name(), filled, "Reconciliation step done");
            report.resolved_by.push((strategy.name(), filled));
        }

        report.unresolved = records
            .iter()
            .filter(|r| r.ioc.as_ref().map_or(true, AltName::is_empty))
            .count();
        info!("IOC names found: {}/{}", report.resolved(), report.total);
        Ok((records, report))
    }
}

fn is_incomplete(record: &SpeciesRecord) -> bool {
    record.ioc_common().is_none() || record.ioc_scientific().is_none()
}

/// Copy each name the record lacks; returns `true` if anything was copied
fn fill_missing(record: &mut SpeciesRecord, name: &AltName) -> bool {
    let ioc = record.ioc.get_or_insert_with(|| AltName::new(None, None));
    let mut changed = false;
    if ioc.common.is_none() && name.common.is_some() {
        ioc.common = name.common.clone();
        changed = true;
    }
    if ioc.scientific.is_none() && name.scientific.is_some() {
        ioc.scientific = name.scientific.clone();
        changed = true;
    }
    if ioc.is_empty() {
        record.ioc = None;
    }
    changed
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::species::test_record;
    use std::collections::HashMap;

    fn name(common: &str, scientific: &str) -> AltName {
        AltName::new(Some(common.to_string()), Some(scientific.to_string()))
    }

    fn anchor() -> Vec<SpeciesRecord> {
        vec![
            test_record("American Robin", "Turdus migratorius"),
            test_record("Gray Heron", "Ardea cinerea"),
            test_record("Western Cattle Egret", "Ardea ibis"),
            test_record("Northern Shrike", "Lanius borealis"),
            test_record("Mystery Bird", "Avis ignota"),
        ]
    }

    fn ioc() -> Vec<AltName> {
        vec![
            name("American Robin", "Turdus migratorius"),
            // Normalized common match for the heron; the scientific differs on purpose
            name("Grey Heron", "Ardea cinerea cinerea"),
            // Would match the robin by common name if exact-scientific did not win
            name("American robin", "Turdus wrongus"),
        ]
    }

    fn secondary() -> Vec<SecondaryMapping> {
        vec![
            SecondaryMapping {
                ioc: name("Western Cattle Egret", "Bubulcus ibis"),
                clements_common: Some("Cattle Egret".to_string()),
                clements_scientific: Some("Ardea ibis".to_string()),
            },
            SecondaryMapping {
                ioc: name("Northern Shrike", "Lanius borealis"),
                clements_common: Some("Northern Shrike".to_string()),
                clements_scientific: Some("Lanius excubitor borealis".to_string()),
            },
            // Weaker-key match for the robin that must never apply
            SecondaryMapping {
                ioc: name("Robin Impostor", "Turdus impostor"),
                clements_common: Some("American Robin".to_string()),
                clements_scientific: Some("Turdus migratorius".to_string()),
            },
        ]
    }

    fn find<'a>(records: &'a [SpeciesRecord], key: &str) -> &'a SpeciesRecord {
        records.iter().find(|r| r.key() == key).unwrap()
    }

    #[test]
    fn test_fallback_order() {
        let reconciler = Reconciler::standard(&ioc(), &secondary());
        let (records, report) = reconciler.reconcile(anchor()).unwrap();

        let robin = find(&records, "Turdus migratorius");
        assert_eq!(robin.ioc_scientific(), Some("Turdus migratorius"));
        assert_eq!(robin.ioc_common(), Some("American Robin"));

        let heron = find(&records, "Ardea cinerea");
        assert_eq!(heron.ioc_scientific(), Some("Ardea cinerea cinerea"));

        let egret = find(&records, "Ardea ibis");
        assert_eq!(egret.ioc_scientific(), Some("Bubulcus ibis"));

        let shrike = find(&records, "Lanius borealis");
        assert_eq!(shrike.ioc_common(), Some("Northern Shrike"));

        assert!(find(&records, "Avis ignota").ioc.is_none());

        assert_eq!(
            report.resolved_by,
            vec![
                ("exact scientific name", 1),
                ("normalized common name", 1),
                ("cross-reference by scientific name", 1),
                ("cross-reference by common name", 1),
            ]
        );
        assert_eq!(report.unresolved, 1);
        assert_eq!(report.resolved(), 4);
    }

    #[test]
    fn test_secondary_common_fills_only_unresolved() {
        let secondary = vec![SecondaryMapping {
            ioc: name("Great Grey Shrike", "Lanius excubitor"),
            clements_common: Some("Mystery Bird".to_string()),
            clements_scientific: None,
        }];
        let reconciler = Reconciler::standard(&[], &secondary);
        let (records, report) = reconciler.reconcile(anchor()).unwrap();

        assert_eq!(find(&records, "Avis ignota").ioc_common(), Some("Great Grey Shrike"));
        assert_eq!(report.resolved_by[3], ("cross-reference by common name", 1));
        assert_eq!(report.unresolved, 4);
    }

    #[test]
    fn test_existing_pair_never_overwritten() {
        let mut records = anchor();
        records[0].ioc = Some(name("Preset Robin", "Turdus presetus"));

        let (records, _) = Reconciler::standard(&ioc(), &secondary())
            .reconcile(records)
            .unwrap();
        assert_eq!(records[0].ioc_common(), Some("Preset Robin"));
    }

    /// Fixed answers for chosen keys
    struct Fixed(Vec<(&'static str, AltName)>);

    impl NameResolver for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn resolve(&self, unresolved: &[&SpeciesRecord]) -> HashMap<String, AltName> {
            unresolved
                .iter()
                .filter_map(|r| {
                    self.0
                        .iter()
                        .find(|(key, _)| *key == r.key())
                        .map(|(key, name)| (key.to_string(), name.clone()))
                })
                .collect()
        }
    }

    #[test]
    fn test_names_filled_independently() {
        let common_only = AltName::new(Some("Western Cattle Egret".to_string()), None);
        let secondary = vec![SecondaryMapping {
            ioc: name("Cattle Egret (secondary)", "Bubulcus ibis"),
            clements_common: Some("Cattle Egret".to_string()),
            clements_scientific: Some("Ardea ibis".to_string()),
        }];
        let reconciler = Reconciler::new()
            .with_strategy(Fixed(vec![("Ardea ibis", common_only)]))
            .with_strategy(NormalizedCommon::new(&[]))
            .with_strategy(SecondaryByScientific::new(&secondary));
        let (records, report) = reconciler.reconcile(anchor()).unwrap();

        let egret = find(&records, "Ardea ibis");
        assert_eq!(egret.ioc_common(), Some("Western Cattle Egret"));
        assert_eq!(egret.ioc_scientific(), Some("Bubulcus ibis"));
        assert_eq!(
            report.resolved_by,
            vec![
                ("fixed", 1),
                ("normalized common name", 0),
                ("cross-reference by scientific name", 1),
            ]
        );
        assert_eq!(report.unresolved, 4);
    }

    #[test]
    fn test_partial_name_stays_resolved() {
        let mut records = anchor();
        records[0].ioc = Some(AltName::new(Some("Preset Robin".to_string()), None));

        let (records, report) = Reconciler::standard(&ioc(), &secondary())
            .reconcile(records)
            .unwrap();
        assert_eq!(records[0].ioc_common(), Some("Preset Robin"));
        assert_eq!(records[0].ioc_scientific(), Some("Turdus migratorius"));
        assert_eq!(report.resolved_by[0], ("exact scientific name", 1));
    }

    #[test]
    fn test_idempotent() {
        let reconciler = Reconciler::standard(&ioc(), &secondary());
        let (first, _) = reconciler.reconcile(anchor()).unwrap();
        let (second, _) = reconciler.reconcile(anchor()).unwrap();
        let (third, _) = reconciler.reconcile(first.clone()).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, third);
    }

    #[test]
    fn test_row_count_preserved() {
        let mut ioc = ioc();
        ioc.push(name("American Robin", "Turdus migratorius"));
        let (records, _) = Reconciler::standard(&ioc, &secondary())
            .reconcile(anchor())
            .unwrap();
        assert_eq!(records.len(), anchor().len());
    }

    #[test]
    fn test_duplicate_anchor_key_rejected() {
        let mut records = anchor();
        records.push(test_record("Robin Again", "Turdus migratorius"));

        let err = Reconciler::standard(&ioc(), &secondary())
            .reconcile(records)
            .unwrap_err();
        assert!(matches!(err, Error::Cardinality(_)));
    }
}
