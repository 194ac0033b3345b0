//! Processed enrichment tables on disk
//!
//! Each pass writes `<processed_dir>/<pass>.csv` keyed by
//! `Scientific (Clements)`, so passes can run as separate invocations and
//! the combiner can pick up whichever tables exist. Loading rejects a
//! repeated key instead of letting the later join duplicate a species.

use super::create_parent;
use crate::enrich::ImagesRow;
use crate::models::{EnrichmentTable, TagSet};
use crate::sources::{cell, open_table, Columns};
use crate::tags::AvibaseRow;
use std::path::Path;
use ub_common::Result;

/// Join key column of every processed table
pub const KEY_COLUMN: &str = "Scientific (Clements)";

const AVIBASE_COLUMNS: [&str; 3] = ["TAGS", "AVIBASE", "CONS_STATUS"];
const IMAGES_COLUMNS: [&str; 2] = ["IMAGES", "DESC"];
pub const MNEMONICS_COLUMN: &str = "MNEMONIC";
pub const SOUNDS_COLUMN: &str = "SOUNDS";

fn write_rows<T, F>(path: &Path, table: &EnrichmentTable<T>, columns: &[&str], fields: F) -> Result<()>
where
    F: Fn(&T) -> Vec<String>,
{
    create_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec![KEY_COLUMN];
    header.extend_from_slice(columns);
    writer.write_record(&header)?;

    for (key, row) in table.iter() {
        let mut record = vec![key.to_string()];
        record.extend(fields(row));
        writer.write_record(&record)?;
    }
    writer.flush()?;

    tracing::debug!(table = table.name(), rows = table.len(), path = %path.display(), "Saved processed table");
    Ok(())
}

fn read_rows<T, F>(path: &Path, name: &str, columns: &[&str], build: F) -> Result<EnrichmentTable<T>>
where
    F: Fn(Vec<Option<String>>) -> T,
{
    let mut reader = open_table(path, b',')?;
    let headers = Columns::new(name, reader.headers()?);
    let key = headers.require(KEY_COLUMN)?;
    let positions = columns
        .iter()
        .map(|c| headers.require(c))
        .collect::<Result<Vec<usize>>>()?;

    let mut table = EnrichmentTable::new(name);
    for row in reader.records() {
        let row = row?;
        let Some(k) = cell(&row, key) else {
            continue;
        };
        let values = positions.iter().map(|&p| cell(&row, p)).collect();
        table.insert(k, build(values))?;
    }
    Ok(table)
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

pub fn write_avibase(path: &Path, table: &EnrichmentTable<AvibaseRow>) -> Result<()> {
    write_rows(path, table, &AVIBASE_COLUMNS, |row| {
        vec![
            row.tags.to_tag_string(),
            text(&row.avibase_url),
            text(&row.conservation_status),
        ]
    })
}

pub fn read_avibase(path: &Path) -> Result<EnrichmentTable<AvibaseRow>> {
    read_rows(path, "avibase", &AVIBASE_COLUMNS, |mut values| {
        let status = values.pop().flatten();
        let url = values.pop().flatten();
        let tags = values.pop().flatten();
        AvibaseRow {
            tags: tags.as_deref().map(TagSet::parse).unwrap_or_default(),
            avibase_url: url,
            conservation_status: status,
        }
    })
}

pub fn write_translations(
    path: &Path,
    table: &EnrichmentTable<Vec<Option<String>>>,
    languages: &[&str],
) -> Result<()> {
    write_rows(path, table, languages, |names| names.iter().map(text).collect())
}

pub fn read_translations(path: &Path, languages: &[&str]) -> Result<EnrichmentTable<Vec<Option<String>>>> {
    read_rows(path, "translations", languages, |names| names)
}

pub fn write_images(path: &Path, table: &EnrichmentTable<ImagesRow>) -> Result<()> {
    write_rows(path, table, &IMAGES_COLUMNS, |row| {
        vec![text(&row.images), text(&row.identification)]
    })
}

pub fn read_images(path: &Path) -> Result<EnrichmentTable<ImagesRow>> {
    read_rows(path, "images", &IMAGES_COLUMNS, |mut values| {
        let identification = values.pop().flatten();
        let images = values.pop().flatten();
        ImagesRow {
            images,
            identification,
        }
    })
}

/// Single text column tables (mnemonics, sounds)
pub fn write_text(path: &Path, table: &EnrichmentTable<String>, column: &str) -> Result<()> {
    write_rows(path, table, &[column], |value| vec![value.clone()])
}

/// Read a single text column table; rows with an empty value are skipped
pub fn read_text(path: &Path, name: &str, column: &str) -> Result<EnrichmentTable<String>> {
    let sparse = read_rows(path, name, &[column], |mut values| values.pop().flatten())?;
    let mut table = EnrichmentTable::new(name);
    for (key, value) in sparse.iter() {
        if let Some(value) = value {
            table.insert(key, value.clone())?;
        }
    }
    Ok(table)
}
