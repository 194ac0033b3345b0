//! Builder configuration resolution
//!
//! Turns the bootstrap [`TomlConfig`] into absolute file locations.
//!
//! **Priority:** CLI argument → environment → TOML → compiled default, as
//! implemented by [`ub_common::config`]. Relative paths from the TOML file are
//! joined onto the resolved root folder; absolute ones are kept.

use std::path::{Path, PathBuf};
use tracing::info;
use ub_common::config::{DeckConfig, ScrapeConfig, TomlConfig};

/// Resolved input, intermediate and output locations
#[derive(Debug, Clone, PartialEq)]
pub struct BuilderPaths {
    pub ebird_taxonomy: PathBuf,
    pub ioc_names: PathBuf,
    pub clements_ioc: PathBuf,
    pub mnemonics: PathBuf,
    pub legacy_deck: PathBuf,
    pub audio_multimedia: PathBuf,
    pub audio_occurrence: PathBuf,
    pub prior_notes: PathBuf,
    pub processed_dir: PathBuf,
    pub base_data: PathBuf,
    pub output: PathBuf,
    pub output_header: PathBuf,
    pub output_notes: PathBuf,
}

/// Everything a pipeline run needs, resolved once at startup
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    pub root_folder: PathBuf,
    pub paths: BuilderPaths,
    pub deck: DeckConfig,
    pub scrape: ScrapeConfig,
    pub ioc_scientific_column: String,
    pub notes_header_rows: usize,
}

fn under(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

impl BuilderConfig {
    pub fn resolve(toml: &TomlConfig, root_folder: PathBuf) -> Self {
        let p = &toml.paths;
        let at = |path: &PathBuf| under(&root_folder, path);
        let paths = BuilderPaths {
            ebird_taxonomy: at(&p.ebird_taxonomy),
            ioc_names: at(&p.ioc_names),
            clements_ioc: at(&p.clements_ioc),
            mnemonics: at(&p.mnemonics),
            legacy_deck: at(&p.legacy_deck),
            audio_multimedia: at(&p.audio_multimedia),
            audio_occurrence: at(&p.audio_occurrence),
            prior_notes: at(&p.prior_notes),
            processed_dir: at(&p.processed_dir),
            base_data: at(&p.base_data),
            output: at(&p.output),
            output_header: at(&p.output_header),
            output_notes: at(&p.output_notes),
        };

        info!("Root folder: {}", root_folder.display());
        Self {
            root_folder,
            paths,
            deck: toml.deck.clone(),
            scrape: toml.scrape.clone(),
            ioc_scientific_column: toml.ioc_scientific_column.clone(),
            notes_header_rows: toml.notes_header_rows,
        }
    }

    /// Location of a pass's processed table
    pub fn processed_table(&self, pass: &str) -> PathBuf {
        self.paths.processed_dir.join(format!("{}.csv", pass))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_paths_join_root() {
        let mut toml = TomlConfig::default();
        toml.paths.mnemonics = PathBuf::from("/abs/Mnemonics.txt");
        let config = BuilderConfig::resolve(&toml, PathBuf::from("/data/birds"));

        assert_eq!(
            config.paths.base_data,
            PathBuf::from("/data/birds/data/output/base_data.csv")
        );
        assert_eq!(config.paths.mnemonics, PathBuf::from("/abs/Mnemonics.txt"));
        assert_eq!(
            config.processed_table("avibase"),
            PathBuf::from("/data/birds/data/processed/avibase.csv")
        );
        assert_eq!(config.ioc_scientific_column, "IOC14.2");
        assert_eq!(config.deck.deck, "Ultimate Birds");
    }
}
