//! Input table loaders
//!
//! Every loader is fatal on a missing file or a missing required column:
//! the pipeline cannot proceed without its join keys. Optional columns and
//! unparseable values degrade to `None`.

pub mod anchor;
pub mod clements_ioc;
pub mod ioc;
pub mod legacy;
pub mod media_pool;
pub mod mnemonics;
pub mod prior_notes;

pub use anchor::load_anchor;
pub use clements_ioc::{load_clements_ioc, SecondaryMapping};
pub use ioc::{load_ioc_names, load_ioc_translations, IocColumns};
pub use legacy::{load_legacy_translations, LegacyTranslations};
pub use media_pool::load_media_pool;
pub use mnemonics::load_mnemonics;
pub use prior_notes::{load_prior_notes, parse_prior_notes, PriorNote};

use csv::StringRecord;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use ub_common::{Error, Result};

/// Open a delimited file with a header row
pub(crate) fn open_table(path: &Path, delimiter: u8) -> Result<csv::Reader<File>> {
    let file = open_file(path)?;
    Ok(csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(file))
}

/// Open a file, naming it in the error when it is missing
pub(crate) fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to open {}: {}", path.display(), e),
        ))
    })
}

/// Read a whole file, naming it in the error when it is missing
pub(crate) fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read {}: {}", path.display(), e),
        ))
    })
}

/// Column positions by header name
pub(crate) struct Columns {
    source_name: String,
    positions: HashMap<String, usize>,
}

impl Columns {
    pub(crate) fn new(source_name: impl Into<String>, headers: &StringRecord) -> Self {
        let mut positions = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            // First occurrence wins for repeated headers
            positions.entry(header.trim_start_matches('\u{feff}').to_string()).or_insert(i);
        }
        Self {
            source_name: source_name.into(),
            positions,
        }
    }

    /// Position of a required column
    pub(crate) fn require(&self, column: &str) -> Result<usize> {
        self.positions
            .get(column)
            .copied()
            .ok_or_else(|| Error::missing_column(&self.source_name, column))
    }

    /// Position of an optional column
    pub(crate) fn find(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }
}

/// Cell value, with empty cells treated as absent
pub(crate) fn cell(record: &StringRecord, position: usize) -> Option<String> {
    record
        .get(position)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Cell value for an optional column
pub(crate) fn opt_cell(record: &StringRecord, position: Option<usize>) -> Option<String> {
    position.and_then(|p| cell(record, p))
}
