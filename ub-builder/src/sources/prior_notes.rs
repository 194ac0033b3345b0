//! Previous deck generation loader (Anki notes export)
//!
//! The export is tab-separated, starts with a fixed number of `#` directive
//! lines and has no header row. Columns are positional.

use super::read_file;
use std::path::Path;
use tracing::info;
use ub_common::Result;

/// Column holding the note GUID
pub const ID_COLUMN: usize = 0;
/// Column holding the common name
pub const COMMON_COLUMN: usize = 3;
/// Column holding the scientific name
pub const SCIENTIFIC_COLUMN: usize = 4;
/// Column holding the eBird URL
pub const EBIRD_URL_COLUMN: usize = 10;

/// One note of the previous generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorNote {
    pub id: String,
    pub common_name: Option<String>,
    pub scientific_name: Option<String>,
    pub ebird_url: Option<String>,
}

/// Parse an exported notes file, skipping `header_rows` preamble lines
///
/// Rows without an identifier are ignored. Quoted fields may span lines.
pub fn parse_prior_notes(content: &str, header_rows: usize) -> Result<Vec<PriorNote>> {
    let body = skip_lines(content, header_rows);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut notes = Vec::new();
    for row in reader.records() {
        let row = row?;
        let field = |i: usize| row.get(i).filter(|v| !v.is_empty()).map(str::to_string);

        let Some(id) = field(ID_COLUMN) else {
            continue;
        };
        notes.push(PriorNote {
            id,
            common_name: field(COMMON_COLUMN),
            scientific_name: field(SCIENTIFIC_COLUMN),
            ebird_url: field(EBIRD_URL_COLUMN),
        });
    }
    Ok(notes)
}

pub fn load_prior_notes(path: &Path, header_rows: usize) -> Result<Vec<PriorNote>> {
    let notes = parse_prior_notes(&read_file(path)?, header_rows)?;
    info!("Loaded {} notes from previous deck {}", notes.len(), path.display());
    Ok(notes)
}

/// Remainder of `content` after its first `n` lines
fn skip_lines(content: &str, n: usize) -> &str {
    let mut rest = content;
    for _ in 0..n {
        match rest.find('\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None => return "",
        }
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREAMBLE: &str = "#separator:tab\n#html:true\n#guid column:1\n#notetype column:2\n#deck column:3\n#tags column:13\n";

    fn note_line(id: &str, common: &str, scientific: &str, url: &str) -> String {
        format!(
            "{}\tBirds\tUltimate Birds\t{}\t{}\t\t\t\t\t\t{}\t\tUB::Canada::Common\n",
            id, common, scientific, url
        )
    }

    #[test]
    fn test_positional_columns() {
        let content = format!(
            "{}{}{}",
            PREAMBLE,
            note_line("a1b2", "American Robin", "Turdus migratorius", "https://ebird.org/species/amerob"),
            note_line("c3d4", "Blue Jay", "", ""),
        );

        let notes = parse_prior_notes(&content, 6).unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].id, "a1b2");
        assert_eq!(notes[0].common_name.as_deref(), Some("American Robin"));
        assert_eq!(notes[0].scientific_name.as_deref(), Some("Turdus migratorius"));
        assert_eq!(notes[0].ebird_url.as_deref(), Some("https://ebird.org/species/amerob"));
        assert_eq!(notes[1].scientific_name, None);
        assert_eq!(notes[1].ebird_url, None);
    }

    #[test]
    fn test_short_rows_and_missing_id() {
        let content = format!("{}\tBirds\n#x\n", PREAMBLE);
        let notes = parse_prior_notes(&content, 6).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "#x");
        assert_eq!(notes[0].common_name, None);
    }

    #[test]
    fn test_skip_lines() {
        assert_eq!(skip_lines("a\nb\nc", 2), "c");
        assert_eq!(skip_lines("a\nb", 5), "");
        assert_eq!(skip_lines("a\nb", 0), "a\nb");
    }
}
