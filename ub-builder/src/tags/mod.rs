//! Tag Accumulation Engine
//!
//! Range scraping produces a stream of [`TagEvent`]s (species, country,
//! optional region, rarity). [`TagAccumulator`] turns them into per-species
//! [`TagSet`]s, matching species by canonical common name, and records each
//! species' reference URL and conservation status on first sight.

use crate::models::{EnrichmentTable, SpeciesRecord, TagSet};
use std::collections::HashMap;
use tracing::{debug, info};
use ub_common::Result;

/// Prefix shared by every deck tag
pub const TAG_PREFIX: &str = "UB";

/// Rarity that suppresses the tag entirely
pub const SUPPRESSED_RARITY: &str = "Extirpated";

/// Rarity used when the source leaves it blank
pub const DEFAULT_RARITY: &str = "Common";

/// Name of the range pass and its processed table
pub const AVIBASE_PASS: &str = "avibase";

/// One scraped (species, scope, rarity) observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEvent {
    /// Canonical common name as written on the range page
    pub common_name: String,
    pub country: String,
    /// Region within the country, `None` for country-level events
    pub region: Option<String>,
    pub rarity: String,
}

impl TagEvent {
    pub fn country(
        common_name: impl Into<String>,
        country: impl Into<String>,
        rarity: impl Into<String>,
    ) -> Self {
        Self {
            common_name: common_name.into(),
            country: country.into(),
            region: None,
            rarity: rarity.into(),
        }
    }

    pub fn region(
        common_name: impl Into<String>,
        country: impl Into<String>,
        region: impl Into<String>,
        rarity: impl Into<String>,
    ) -> Self {
        Self {
            common_name: common_name.into(),
            country: country.into(),
            region: Some(region.into()),
            rarity: rarity.into(),
        }
    }
}

/// Tag token for an event, `None` when its rarity suppresses tagging
///
/// Format: `UB::<country>[::<region>]::<rarity>` with spaces replaced by `-`.
pub fn tag_token(event: &TagEvent) -> Option<String> {
    let rarity = match event.rarity.trim() {
        "" => DEFAULT_RARITY,
        r => r,
    };
    if rarity == SUPPRESSED_RARITY {
        return None;
    }

    let mut segments = vec![TAG_PREFIX, event.country.as_str()];
    if let Some(region) = &event.region {
        segments.push(region);
    }
    segments.push(rarity);
    Some(segments.join("::").replace(' ', "-"))
}

/// Per-species output of the range pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvibaseRow {
    pub tags: TagSet,
    pub avibase_url: Option<String>,
    pub conservation_status: Option<String>,
}

/// Accumulates tag events over any number of countries and regions
pub struct TagAccumulator {
    rows: Vec<(String, AvibaseRow)>,
    by_common: HashMap<String, Vec<usize>>,
    applied: usize,
    unmatched: usize,
}

impl TagAccumulator {
    /// One empty row per canonical species
    ///
    /// Events are keyed by common name, so species sharing one all receive them.
    pub fn new(records: &[SpeciesRecord]) -> Self {
        let mut by_common: HashMap<String, Vec<usize>> = HashMap::with_capacity(records.len());
        let rows = records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                by_common.entry(record.common_name.clone()).or_default().push(i);
                (record.key().to_string(), AvibaseRow::default())
            })
            .collect();

        Self {
            rows,
            by_common,
            applied: 0,
            unmatched: 0,
        }
    }

    fn indices(&self, common_name: &str) -> Vec<usize> {
        self.by_common.get(common_name).cloned().unwrap_or_default()
    }

    /// Append the event's token to its species
    ///
    /// Returns `true` if a token was appended. Events for unknown species and
    /// suppressed rarities leave every tag set untouched.
    pub fn apply(&mut self, event: &TagEvent) -> bool {
        let Some(token) = tag_token(event) else {
            return false;
        };
        let indices = self.indices(&event.common_name);
        if indices.is_empty() {
            debug!(species = %event.common_name, "No canonical species for tag event");
            self.unmatched += 1;
            return false;
        }
        for &i in &indices {
            self.rows[i].1.tags.push(token.clone());
        }
        self.applied += indices.len();
        true
    }

    /// Record reference URL and conservation status, each only if still unset
    pub fn record_reference(
        &mut self,
        common_name: &str,
        avibase_url: Option<&str>,
        conservation_status: Option<&str>,
    ) {
        for i in self.indices(common_name) {
            let row = &mut self.rows[i].1;
            if row.avibase_url.is_none() {
                row.avibase_url = avibase_url.map(str::to_string);
            }
            if row.conservation_status.is_none() {
                row.conservation_status = conservation_status.map(str::to_string);
            }
        }
    }

    /// Table with a row (possibly without tags) for every canonical species
    pub fn finish(self) -> Result<EnrichmentTable<AvibaseRow>> {
        info!(
            applied = self.applied,
            unmatched = self.unmatched,
            "Tag accumulation finished"
        );
        let mut table = EnrichmentTable::new(AVIBASE_PASS);
        for (key, row) in self.rows {
            table.insert(key, row)?;
        }
        Ok(table)
    }
}
