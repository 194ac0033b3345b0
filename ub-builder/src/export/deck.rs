//! Anki import files

use super::create_parent;
use crate::combine::{DeckRow, IdentityReport};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;
use ub_common::config::DeckConfig;
use ub_common::Result;

/// Header of the identifier column in the update file
pub const ID_COLUMN: &str = "Unique ID";

/// Import directives placed before the data rows
///
/// `guid_column` adds the `#guid column` directive after the separator line.
pub fn preamble(
    deck: &DeckConfig,
    columns: &[String],
    tags_column: usize,
    guid_column: Option<usize>,
) -> String {
    let mut lines = vec!["#separator:Comma".to_string()];
    if let Some(guid) = guid_column {
        lines.push(format!("#guid column:{}", guid));
    }
    lines.push("#html:true".to_string());
    lines.push(format!("#notetype:{}", deck.notetype));
    lines.push(format!("#deck:{}", deck.deck));
    lines.push(format!("#tags column:{}", tags_column));
    lines.push(format!("#columns:{}", columns.join(",")));

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn open(path: &Path) -> Result<BufWriter<File>> {
    create_parent(path)?;
    Ok(BufWriter::new(File::create(path)?))
}

/// Deck file: preamble, then header-less rows
pub fn write_deck(path: &Path, rows: &[DeckRow], languages: &[&str], deck: &DeckConfig) -> Result<()> {
    let columns = DeckRow::columns(languages);
    let mut out = open(path)?;
    out.write_all(preamble(deck, &columns, DeckRow::tags_column(), None).as_bytes())?;

    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.write_record(row.values())?;
    }
    writer.flush()?;

    info!("Wrote {} notes to {}", rows.len(), path.display());
    Ok(())
}

/// Plain CSV with a header row, for inspection and checks
pub fn write_deck_with_header(path: &Path, rows: &[DeckRow], languages: &[&str]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(open(path)?);
    writer.write_record(DeckRow::columns(languages))?;
    for row in rows {
        writer.write_record(row.values())?;
    }
    writer.flush()?;
    Ok(())
}

/// Update file: rows carrying a previous identifier, every field quoted
///
/// Quoting keeps identifiers starting with `#` from being read as directives.
pub fn write_update(
    path: &Path,
    report: &IdentityReport<'_>,
    languages: &[&str],
    deck: &DeckConfig,
) -> Result<()> {
    let mut columns = vec![ID_COLUMN.to_string()];
    columns.extend(DeckRow::columns(languages));

    let mut out = open(path)?;
    out.write_all(preamble(deck, &columns, DeckRow::tags_column() + 1, Some(1)).as_bytes())?;

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(out);
    for (id, row) in &report.matched {
        let mut values = vec![id.clone()];
        values.extend(row.values());
        writer.write_record(values)?;
    }
    writer.flush()?;

    info!("Wrote {} note updates to {}", report.matched.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combine::{assign_identifiers, PriorIndex};
    use crate::models::species::test_record;
    use crate::models::TagSet;
    use crate::sources::PriorNote;
    use tempfile::TempDir;

    fn row() -> DeckRow {
        DeckRow {
            record: test_record("American Robin", "Turdus migratorius"),
            tags: TagSet::parse("UB::Canada::Common UB::v1"),
            avibase_url: Some("https://avibase/a".to_string()),
            conservation_status: Some("Least concern".to_string()),
            translations: vec![Some("Merle, d'Amérique".to_string())],
            mnemonics: None,
            images: Some(r#"<img src="x">"#.to_string()),
            identification: None,
            sounds: None,
        }
    }

    #[test]
    fn test_preamble() {
        let columns = vec!["English".to_string(), "Tags".to_string()];
        let text = preamble(&DeckConfig::default(), &columns, 2, None);
        assert_eq!(
            text,
            "#separator:Comma\n#html:true\n#notetype:Birds\n#deck:Ultimate Birds\n#tags column:2\n#columns:English,Tags\n"
        );

        let update = preamble(&DeckConfig::default(), &columns, 2, Some(1));
        assert!(update.starts_with("#separator:Comma\n#guid column:1\n#html:true\n"));
    }

    #[test]
    fn test_write_deck() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/deck.csv");
        write_deck(&path, &[row()], &["French"], &DeckConfig::default()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[4], "#tags column:9");
        assert!(lines[5].starts_with("#columns:English,Scientific,eBird URL,"));
        assert!(lines[5].ends_with(",French,Mnemonics,Images,Identification,Sounds"));
        assert!(lines[6].starts_with("American Robin,Turdus migratorius,"));
        assert!(lines[6].contains(r#","Merle, d'Amérique","#));
        assert!(lines[6].contains(r#""<img src=""x"">""#));
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_write_deck_with_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("header.csv");
        write_deck_with_header(&path, &[row()], &["French"]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "English");
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[11], "Merle, d'Amérique");
    }

    #[test]
    fn test_write_update_quotes_everything() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        let rows = vec![row()];
        let notes = vec![PriorNote {
            id: "#a1b2".to_string(),
            common_name: Some("American Robin".to_string()),
            scientific_name: None,
            ebird_url: None,
        }];
        let report = assign_identifiers(&rows, &PriorIndex::build(&notes));
        write_update(&path, &report, &["French"], &DeckConfig::default()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[1], "#guid column:1");
        assert_eq!(lines[5], "#tags column:10");
        assert!(lines[6].starts_with("#columns:Unique ID,English,"));
        assert!(lines[7].starts_with(r##""#a1b2","American Robin","##));
        assert!(lines[7].ends_with(r#","""#));
    }
}
