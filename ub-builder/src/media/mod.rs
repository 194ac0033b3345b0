//! Media Selection Engine
//!
//! Chooses up to [`MAX_RECORDINGS`] recordings per species from the sound
//! archive and renders them for the Sounds field.
//!
//! - [`MediaIndex`]: candidate groups by scientific and vernacular name, built once
//! - [`select_recordings`]: filter, deduplicate, tier, rank and truncate
//! - [`render_sounds`]: HTML fragments for the selected recordings

pub mod candidate;
pub mod index;
pub mod render;
pub mod select;

pub use candidate::Candidate;
pub use index::{MediaIdentity, MediaIndex};
pub use render::{render_recording, render_sounds};
pub use select::{parse_duration, select_recordings, Selected, MAX_RECORDINGS};

use crate::models::{EnrichmentTable, SpeciesRecord};
use tracing::info;
use ub_common::Result;

/// Name of the audio pass and its processed table
pub const AUDIO_PASS: &str = "audio";

/// Sounds HTML for every species with at least one selected recording
pub fn audio_pass(records: &[SpeciesRecord], index: &MediaIndex) -> Result<EnrichmentTable<String>> {
    let mut table = EnrichmentTable::new(AUDIO_PASS);

    for record in records {
        let candidates = index.lookup(MediaIdentity::from(record));
        if candidates.is_empty() {
            continue;
        }
        if let Some(html) = render_sounds(&select_recordings(&candidates)) {
            table.insert(record.key(), html)?;
        }
    }

    info!("Found audio for {} species", table.len());
    Ok(table)
}
