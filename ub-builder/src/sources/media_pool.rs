//! Darwin Core sound archive loader
//!
//! The archive ships two tables: `Multimedia.txt` (one row per media file)
//! and `Occurrence.txt` (one row per observation). They are inner-joined on
//! `associatedObservationReference == occurrenceID`.

use super::{cell, open_table, Columns};
use crate::media::Candidate;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;
use ub_common::Result;

struct Occurrence {
    behavior: Option<String>,
    associated_taxa: Option<String>,
    event_date: Option<String>,
    vernacular_name: Option<String>,
    scientific_name: Option<String>,
}

/// Load and join the media and occurrence tables
///
/// Media rows keep their file order. Occurrence IDs are expected to be unique;
/// if repeated, the first occurrence row is used so the join never multiplies
/// media rows.
pub fn load_media_pool(multimedia: &Path, occurrence: &Path) -> Result<Vec<Candidate>> {
    let occurrences = load_occurrences(occurrence)?;

    let mut reader = open_table(multimedia, b',')?;
    let columns = Columns::new("multimedia", reader.headers()?);
    let reference = columns.require("associatedObservationReference")?;
    let format = columns.require("format")?;
    let access_uri = columns.require("accessURI")?;
    let description = columns.require("description")?;
    let caption = columns.require("caption")?;
    let rights_holder = columns.require("rightsHolder")?;
    let rating = columns.require("Rating")?;

    let mut pool = Vec::new();
    for row in reader.records() {
        let row = row?;
        let Some(observation_ref) = cell(&row, reference) else {
            continue;
        };
        let Some(occ) = occurrences.get(&observation_ref) else {
            continue;
        };

        pool.push(Candidate {
            observation_ref,
            format: cell(&row, format),
            access_uri: cell(&row, access_uri),
            description: cell(&row, description),
            caption: cell(&row, caption),
            rights_holder: cell(&row, rights_holder),
            rating: cell(&row, rating).and_then(|r| parse_rating(&r)),
            behavior: occ.behavior.clone(),
            associated_taxa: occ.associated_taxa.clone(),
            event_date: occ.event_date.clone(),
            vernacular_name: occ.vernacular_name.clone(),
            scientific_name: occ.scientific_name.clone(),
        });
    }

    info!("Found {} audio files", pool.len());
    Ok(pool)
}

fn load_occurrences(path: &Path) -> Result<HashMap<String, Occurrence>> {
    let mut reader = open_table(path, b',')?;
    let columns = Columns::new("occurrence", reader.headers()?);
    let id = columns.require("occurrenceID")?;
    let behavior = columns.require("behavior")?;
    let associated_taxa = columns.require("Associated Taxa")?;
    let event_date = columns.require("eventDate")?;
    let vernacular = columns.require("vernacularName")?;
    let scientific = columns.require("scientificName")?;

    let mut occurrences = HashMap::new();
    for row in reader.records() {
        let row = row?;
        let Some(key) = cell(&row, id) else {
            continue;
        };
        occurrences.entry(key).or_insert_with(|| Occurrence {
            behavior: cell(&row, behavior),
            associated_taxa: cell(&row, associated_taxa),
            event_date: cell(&row, event_date),
            vernacular_name: cell(&row, vernacular),
            scientific_name: cell(&row, scientific).map(|s| species_name(&s)),
        });
    }
    Ok(occurrences)
}

/// Reduce a (sub)species name to its first two words
pub fn species_name(scientific: &str) -> String {
    scientific.split(' ').take(2).collect::<Vec<_>>().join(" ")
}

/// Parse an integer rating; anything else is treated as missing
fn parse_rating(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => Some(value as i64),
        _ => None,
    }
}
