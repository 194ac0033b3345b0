//! IOC multilingual list loader
//!
//! The IOC publishes its master list as a spreadsheet; the pipeline reads the
//! CSV export of that sheet. The scientific-name column header carries the
//! list version (e.g. `IOC14.2`) and is therefore configurable.

use super::{cell, open_table, opt_cell, Columns};
use crate::models::AltName;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};
use ub_common::Result;

const SOURCE: &str = "IOC list";

/// Header names in the IOC list
#[derive(Debug, Clone)]
pub struct IocColumns {
    pub english: String,
    pub scientific: String,
}

impl IocColumns {
    pub fn new(scientific: impl Into<String>) -> Self {
        Self {
            english: "English".to_string(),
            scientific: scientific.into(),
        }
    }
}

/// Load the IOC (English, scientific) name pairs in file order
///
/// Rows with neither name are skipped.
pub fn load_ioc_names(path: &Path, columns: &IocColumns) -> Result<Vec<AltName>> {
    let mut reader = open_table(path, b',')?;
    let header = Columns::new(SOURCE, reader.headers()?);
    let english = header.require(&columns.english)?;
    let scientific = header.require(&columns.scientific)?;

    let mut names = Vec::new();
    for row in reader.records() {
        let row = row?;
        let name = AltName::new(cell(&row, english), cell(&row, scientific));
        if !name.is_empty() {
            names.push(name);
        }
    }

    info!("Loaded {} IOC names from {}", names.len(), path.display());
    Ok(names)
}

/// Load translated common names keyed by IOC scientific name
///
/// The returned vectors are aligned with `languages`. Languages missing from
/// the file are left empty. The first row for a scientific name wins.
pub fn load_ioc_translations(
    path: &Path,
    columns: &IocColumns,
    languages: &[&str],
) -> Result<HashMap<String, Vec<Option<String>>>> {
    let mut reader = open_table(path, b',')?;
    let header = Columns::new(SOURCE, reader.headers()?);
    let scientific = header.require(&columns.scientific)?;

    let language_positions: Vec<Option<usize>> = languages
        .iter()
        .map(|lang| {
            let position = header.find(lang);
            if position.is_none() {
                debug!(language = %lang, "Language column absent from IOC list");
            }
            position
        })
        .collect();

    let mut translations = HashMap::new();
    for row in reader.records() {
        let row = row?;
        let Some(key) = cell(&row, scientific) else {
            continue;
        };
        translations.entry(key).or_insert_with(|| {
            language_positions
                .iter()
                .map(|&p| opt_cell(&row, p))
                .collect::<Vec<_>>()
        });
    }

    info!("Loaded IOC translations for {} species", translations.len());
    Ok(translations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn ioc_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            "Seq.,Order,Family,IOC14.2,English,French,German\n\
             1,STRUTHIONIFORMES,,,,,\n\
             2,,,Struthio camelus,Common Ostrich,Autruche d'Afrique,Afrikanischer Strauß\n\
             3,,,Turdus migratorius,American Robin,Merle d'Amérique,\n\
             4,,,Turdus migratorius,Duplicate Robin,Doublon,Duplikat\n"
                .as_bytes(),
        )
        .unwrap();
        file
    }

    #[test]
    fn test_load_names_skips_header_rows() {
        let file = ioc_file();
        let names = load_ioc_names(file.path(), &IocColumns::new("IOC14.2")).unwrap();

        assert_eq!(names.len(), 3);
        assert_eq!(names[0].common.as_deref(), Some("Common Ostrich"));
        assert_eq!(names[0].scientific.as_deref(), Some("Struthio camelus"));
    }

    #[test]
    fn test_translations_first_row_wins_and_missing_language() {
        let file = ioc_file();
        let translations = load_ioc_translations(
            file.path(),
            &IocColumns::new("IOC14.2"),
            &["French", "German", "Welsh"],
        )
        .unwrap();

        let robin = &translations["Turdus migratorius"];
        assert_eq!(robin[0].as_deref(), Some("Merle d'Amérique"));
        assert_eq!(robin[1], None);
        assert_eq!(robin[2], None);
        assert_eq!(translations.len(), 2);
    }

    #[test]
    fn test_versioned_column_must_exist() {
        let file = ioc_file();
        assert!(load_ioc_names(file.path(), &IocColumns::new("IOC15.1")).is_err());
    }
}
