//! Pass orchestration
//!
//! Each pass reads its inputs, runs its engine and persists its table under
//! the processed folder, so passes can run as separate invocations. The
//! combiner picks up whichever processed tables exist.
//!
//! **Stage order for [`Pipeline::all`]:**
//! 1. Base (reconciliation), written to the base data file
//! 2. Offline passes: translations, mnemonics, audio
//! 3. Network passes: avibase and images, concurrently
//! 4. Combine and export

use crate::combine::{assign_identifiers, combine, DeckRow, Enrichments, PriorIndex};
use crate::config::BuilderConfig;
use crate::enrich::avibase::avibase_pass;
use crate::enrich::images::{images_pass, ImagesRow, IMAGES_PASS};
use crate::enrich::mnemonics::{mnemonics_pass, MNEMONICS_PASS};
use crate::enrich::translations::{translations_pass, LANGUAGES, TRANSLATIONS_PASS};
use crate::export::processed::{self, MNEMONICS_COLUMN, SOUNDS_COLUMN};
use crate::export::{read_base, write_base, write_deck, write_deck_with_header, write_update};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::media::{audio_pass, MediaIndex, AUDIO_PASS};
use crate::models::{EnrichmentTable, SpeciesRecord};
use crate::reconcile::Reconciler;
use crate::sources::{
    load_anchor, load_clements_ioc, load_ioc_names, load_ioc_translations, load_legacy_translations,
    load_media_pool, load_mnemonics, load_prior_notes, IocColumns,
};
use crate::tags::{AvibaseRow, AVIBASE_PASS};
use crate::validate;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};
use ub_common::Result;

/// Default version tag: `version-<today>`
pub fn default_version() -> String {
    format!("version-{}", chrono::Local::now().format("%Y-%m-%d"))
}

/// Outcome of the combine stage, printed as JSON by the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombineSummary {
    /// Notes written to the deck file
    pub rows: usize,
    /// Notes written to the update file (0 when no previous export exists)
    pub updates: usize,
    /// Previous identifiers not carried over because several species claim them
    pub splits: Vec<String>,
    /// Data quality issues found in the final deck
    pub issues: usize,
}

/// Runs the passes against one resolved configuration
pub struct Pipeline {
    config: BuilderConfig,
    fetcher: Box<dyn Fetcher>,
}

impl Pipeline {
    /// Pipeline with the HTTP fetch adapter
    pub fn new(config: BuilderConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.scrape)?;
        Ok(Self::with_fetcher(config, Box::new(fetcher)))
    }

    pub fn with_fetcher(config: BuilderConfig, fetcher: Box<dyn Fetcher>) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    fn ioc_columns(&self) -> IocColumns {
        IocColumns::new(self.config.ioc_scientific_column.clone())
    }

    /// Reconcile the anchor taxonomy with the IOC list and save the base data
    pub fn base(&self) -> Result<Vec<SpeciesRecord>> {
        let paths = &self.config.paths;
        let anchor = load_anchor(&paths.ebird_taxonomy)?;
        let ioc = load_ioc_names(&paths.ioc_names, &self.ioc_columns())?;
        let secondary = load_clements_ioc(&paths.clements_ioc)?;

        let (records, report) = Reconciler::standard(&ioc, &secondary).reconcile(anchor)?;
        if report.unresolved > 0 {
            warn!(unresolved = report.unresolved, "Species without an IOC name");
        }
        validate::report("base", &validate::check_base(&records));

        write_base(&paths.base_data, &records)?;
        Ok(records)
    }

    /// Canonical records from the base data file, running the base stage if
    /// it does not exist yet
    pub fn records(&self) -> Result<Vec<SpeciesRecord>> {
        let path = &self.config.paths.base_data;
        if path.exists() {
            let records = read_base(path)?;
            info!("Loaded {} base records from {}", records.len(), path.display());
            Ok(records)
        } else {
            info!("No base data at {}, running base stage", path.display());
            self.base()
        }
    }

    pub fn translations(&self) -> Result<EnrichmentTable<Vec<Option<String>>>> {
        let records = self.records()?;
        let paths = &self.config.paths;
        let ioc = load_ioc_translations(&paths.ioc_names, &self.ioc_columns(), &LANGUAGES)?;
        let legacy = load_legacy_translations(&paths.legacy_deck, &LANGUAGES)?;

        let table = translations_pass(&records, &ioc, &legacy, &LANGUAGES)?;
        processed::write_translations(&self.config.processed_table(TRANSLATIONS_PASS), &table, &LANGUAGES)?;
        Ok(table)
    }

    pub fn mnemonics(&self) -> Result<EnrichmentTable<String>> {
        let records = self.records()?;
        let entries = load_mnemonics(&self.config.paths.mnemonics)?;

        let table = mnemonics_pass(&records, &entries)?;
        processed::write_text(&self.config.processed_table(MNEMONICS_PASS), &table, MNEMONICS_COLUMN)?;
        Ok(table)
    }

    pub fn audio(&self) -> Result<EnrichmentTable<String>> {
        let records = self.records()?;
        let paths = &self.config.paths;
        let pool = load_media_pool(&paths.audio_multimedia, &paths.audio_occurrence)?;
        let index = MediaIndex::build(pool);

        let table = audio_pass(&records, &index)?;
        processed::write_text(&self.config.processed_table(AUDIO_PASS), &table, SOUNDS_COLUMN)?;
        Ok(table)
    }

    pub async fn avibase(&self) -> Result<EnrichmentTable<AvibaseRow>> {
        let records = self.records()?;
        let table = avibase_pass(&records, self.fetcher.as_ref()).await?;
        processed::write_avibase(&self.config.processed_table(AVIBASE_PASS), &table)?;
        Ok(table)
    }

    pub async fn images(&self) -> Result<EnrichmentTable<ImagesRow>> {
        let records = self.records()?;
        let table = images_pass(&records, self.fetcher.as_ref()).await?;
        processed::write_images(&self.config.processed_table(IMAGES_PASS), &table)?;
        Ok(table)
    }

    /// Processed tables present on disk; a missing one leaves its fields empty
    pub fn load_enrichments(&self) -> Result<Enrichments> {
        let table = |pass: &str| {
            let path = self.config.processed_table(pass);
            if !path.exists() {
                warn!(pass, path = %path.display(), "Processed table missing, fields stay empty");
            }
            path
        };

        Ok(Enrichments {
            avibase: optional(&table(AVIBASE_PASS), processed::read_avibase)?,
            translations: optional(&table(TRANSLATIONS_PASS), |p| {
                processed::read_translations(p, &LANGUAGES)
            })?,
            mnemonics: optional(&table(MNEMONICS_PASS), |p| {
                processed::read_text(p, MNEMONICS_PASS, MNEMONICS_COLUMN)
            })?,
            images: optional(&table(IMAGES_PASS), processed::read_images)?,
            sounds: optional(&table(AUDIO_PASS), |p| {
                processed::read_text(p, AUDIO_PASS, SOUNDS_COLUMN)
            })?,
        })
    }

    /// Join every table, run the deck checks and write the import files
    ///
    /// The update file is only written when a previous notes export exists.
    pub fn combine(&self, version: &str) -> Result<CombineSummary> {
        let records = self.records()?;
        let enrichments = self.load_enrichments()?;
        let rows = combine(records, &enrichments, LANGUAGES.len(), version)?;
        let issues = validate::report("combine", &validate::check_deck(&rows));

        let paths = &self.config.paths;
        write_deck(&paths.output, &rows, &LANGUAGES, &self.config.deck)?;
        write_deck_with_header(&paths.output_header, &rows, &LANGUAGES)?;

        let (updates, splits) = self.write_updates(&rows)?;
        Ok(CombineSummary {
            rows: rows.len(),
            updates,
            splits,
            issues,
        })
    }

    fn write_updates(&self, rows: &[DeckRow]) -> Result<(usize, Vec<String>)> {
        let paths = &self.config.paths;
        if !paths.prior_notes.exists() {
            info!(path = %paths.prior_notes.display(), "No previous notes export, skipping update file");
            return Ok((0, Vec::new()));
        }

        let notes = load_prior_notes(&paths.prior_notes, self.config.notes_header_rows)?;
        let report = assign_identifiers(rows, &PriorIndex::build(&notes));
        for id in &report.splits {
            warn!(id = %id, "Previous note claimed by several species, not updated");
        }

        write_update(&paths.output_notes, &report, &LANGUAGES, &self.config.deck)?;
        Ok((report.matched.len(), report.splits))
    }

    /// Every stage in order; the two network passes run concurrently
    pub async fn all(&self, version: &str) -> Result<CombineSummary> {
        self.base()?;
        self.translations()?;
        self.mnemonics()?;
        self.audio()?;

        let (avibase, images) = tokio::join!(self.avibase(), self.images());
        avibase?;
        images?;

        self.combine(version)
    }
}

fn optional<T, F>(path: &Path, read: F) -> Result<Option<T>>
where
    F: FnOnce(&Path) -> Result<T>,
{
    if path.exists() {
        read(path).map(Some)
    } else {
        Ok(None)
    }
}
