//! Record Combiner
//!
//! Left-joins every enrichment table onto the canonical records, applies the
//! removal rules and appends the version tag. Stable identifiers for the
//! update file are assigned in [`identity`].

pub mod identity;

pub use identity::{assign_identifiers, IdentityReport, PriorIndex};

use crate::enrich::ImagesRow;
use crate::models::{EnrichmentTable, SpeciesRecord, TagSet};
use crate::tags::{AvibaseRow, TAG_PREFIX};
use std::collections::HashSet;
use tracing::{debug, info};
use ub_common::{Error, Result};

/// Conservation status that removes a species from the deck
pub const EXTINCT_STATUS: &str = "Extinct";

/// Header of the tags column
pub const TAGS_COLUMN: &str = "Tags";

/// Leading export columns, before the language columns
pub const LEADING_COLUMNS: [&str; 11] = [
    "English",
    "Scientific",
    "eBird URL",
    "Taxonomic order",
    "Order",
    "Family",
    "English (IOC)",
    "Scientific (IOC)",
    TAGS_COLUMN,
    "Avibase URL",
    "Conservation status",
];

/// Trailing export columns, after the language columns
pub const TRAILING_COLUMNS: [&str; 4] = ["Mnemonics", "Images", "Identification", "Sounds"];

/// Export header for a language name
pub fn language_column(language: &str) -> String {
    match language {
        "Chinese (Traditional)" => "Chinese-traditional".to_string(),
        other => other.to_string(),
    }
}

/// Outputs of the enrichment passes; a pass that did not run is `None`
#[derive(Debug, Default)]
pub struct Enrichments {
    pub avibase: Option<EnrichmentTable<AvibaseRow>>,
    pub translations: Option<EnrichmentTable<Vec<Option<String>>>>,
    pub mnemonics: Option<EnrichmentTable<String>>,
    pub images: Option<EnrichmentTable<ImagesRow>>,
    pub sounds: Option<EnrichmentTable<String>>,
}

/// One note of the exported deck
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckRow {
    pub record: SpeciesRecord,
    pub tags: TagSet,
    pub avibase_url: Option<String>,
    pub conservation_status: Option<String>,
    /// Aligned with the language list the deck is exported with
    pub translations: Vec<Option<String>>,
    pub mnemonics: Option<String>,
    pub images: Option<String>,
    pub identification: Option<String>,
    pub sounds: Option<String>,
}

impl DeckRow {
    /// Export header, in column order
    pub fn columns(languages: &[&str]) -> Vec<String> {
        LEADING_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(languages.iter().map(|l| language_column(l)))
            .chain(TRAILING_COLUMNS.iter().map(|c| c.to_string()))
            .collect()
    }

    /// 1-based position of the tags column
    pub fn tags_column() -> usize {
        LEADING_COLUMNS
            .iter()
            .position(|c| *c == TAGS_COLUMN)
            .map_or(0, |i| i + 1)
    }

    /// Field values matching [`DeckRow::columns`]; absent values are empty
    pub fn values(&self) -> Vec<String> {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let record = &self.record;

        let mut values = vec![
            record.common_name.clone(),
            record.scientific_name.clone(),
            record.ebird_url.clone(),
            record.taxon_order.clone(),
            record.order.clone(),
            record.family.clone(),
            record.ioc_common().unwrap_or_default().to_string(),
            record.ioc_scientific().unwrap_or_default().to_string(),
            self.tags.to_tag_string(),
            text(&self.avibase_url),
            text(&self.conservation_status),
        ];
        values.extend(self.translations.iter().map(text));
        values.extend([
            text(&self.mnemonics),
            text(&self.images),
            text(&self.identification),
            text(&self.sounds),
        ]);
        values
    }
}

fn count_foreign_keys<T>(table: &Option<EnrichmentTable<T>>, keys: &HashSet<&str>) {
    if let Some(table) = table {
        let foreign = table.iter().filter(|(k, _)| !keys.contains(k)).count();
        if foreign > 0 {
            debug!(table = table.name(), foreign, "Rows without a canonical species ignored");
        }
    }
}

/// Join, filter and tag the final deck rows
///
/// **Algorithm:**
/// 1. Left-join each present table by canonical key; missing rows stay empty
/// 2. Drop species whose conservation status is `Extinct`
/// 3. Drop species with neither images nor sounds
/// 4. Append `UB::<version>` to every surviving tag set, unless already there
///
/// Returns a cardinality error if the canonical keys are not unique.
pub fn combine(
    records: Vec<SpeciesRecord>,
    enrichments: &Enrichments,
    language_count: usize,
    version: &str,
) -> Result<Vec<DeckRow>> {
    let total = records.len();
    {
        let mut keys = HashSet::with_capacity(total);
        for record in &records {
            if !keys.insert(record.key()) {
                return Err(Error::Cardinality(format!(
                    "duplicate canonical key '{}' entering combine",
                    record.key()
                )));
            }
        }
        count_foreign_keys(&enrichments.avibase, &keys);
        count_foreign_keys(&enrichments.translations, &keys);
        count_foreign_keys(&enrichments.mnemonics, &keys);
        count_foreign_keys(&enrichments.images, &keys);
        count_foreign_keys(&enrichments.sounds, &keys);
    }

    let version_tag = format!("{}::{}", TAG_PREFIX, version);
    let mut extinct = 0;
    let mut without_media = 0;
    let mut rows = Vec::with_capacity(total);

    for record in records {
        let key = record.key().to_string();
        let avibase = enrichments.avibase.as_ref().and_then(|t| t.get(&key));
        let images = enrichments.images.as_ref().and_then(|t| t.get(&key));

        let mut translations = enrichments
            .translations
            .as_ref()
            .and_then(|t| t.get(&key))
            .cloned()
            .unwrap_or_default();
        translations.resize(language_count, None);

        let mut row = DeckRow {
            record,
            tags: avibase.map(|a| a.tags.clone()).unwrap_or_default(),
            avibase_url: avibase.and_then(|a| a.avibase_url.clone()),
            conservation_status: avibase.and_then(|a| a.conservation_status.clone()),
            translations,
            mnemonics: enrichments.mnemonics.as_ref().and_then(|t| t.get(&key)).cloned(),
            images: images.and_then(|i| i.images.clone()),
            identification: images.and_then(|i| i.identification.clone()),
            sounds: enrichments.sounds.as_ref().and_then(|t| t.get(&key)).cloned(),
        };

        if row.conservation_status.as_deref() == Some(EXTINCT_STATUS) {
            extinct += 1;
            continue;
        }
        if row.images.is_none() && row.sounds.is_none() {
            without_media += 1;
            continue;
        }

        row.tags.push_once(version_tag.clone());
        rows.push(row);
    }

    info!(
        extinct,
        without_media,
        "Combined {} species into {} deck rows",
        total,
        rows.len()
    );
    Ok(rows)
}
