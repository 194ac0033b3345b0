//! Configuration loading and root folder resolution
//!
//! Bootstrap configuration lives in a single TOML file. Every field has a
//! built-in default, so a missing file is never fatal.
//!
//! # Resolution Priority
//!
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`UB_ROOT_FOLDER`, `UB_CONFIG`)
//! 3. TOML config file
//! 4. Compiled default (current directory)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the data root folder
pub const ROOT_FOLDER_ENV: &str = "UB_ROOT_FOLDER";

/// Environment variable overriding the config file location
pub const CONFIG_FILE_ENV: &str = "UB_CONFIG";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Folder all relative paths are resolved against
    pub root_folder: Option<PathBuf>,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Input, intermediate and output file locations
    pub paths: PathsConfig,

    /// Anki notetype/deck identifiers written into export preambles
    pub deck: DeckConfig,

    /// Fetch adapter tuning
    pub scrape: ScrapeConfig,

    /// Header of the versioned scientific-name column in the IOC list
    pub ioc_scientific_column: String,

    /// Number of preamble lines in the previous notes export
    pub notes_header_rows: usize,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            logging: LoggingConfig::default(),
            paths: PathsConfig::default(),
            deck: DeckConfig::default(),
            scrape: ScrapeConfig::default(),
            ioc_scientific_column: "IOC14.2".to_string(),
            notes_header_rows: 6,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// File locations, relative to the root folder unless absolute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
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

impl Default for PathsConfig {
    fn default() -> Self {
        let dwca = Path::new("data/input/wildlife-sounds-birds-20250207.dwca");
        Self {
            ebird_taxonomy: "data/input/eBird_Taxonomy_v2024.csv".into(),
            ioc_names: "data/input/Multiling IOC 14.2_b.csv".into(),
            clements_ioc: "data/input/IOC v14-2 v Clements 2023.csv".into(),
            mnemonics: "data/input/Mnemonics.txt".into(),
            legacy_deck: "data/input/Ultimate Birds - old version.csv".into(),
            audio_multimedia: dwca.join("Multimedia.txt"),
            audio_occurrence: dwca.join("Occurrence.txt"),
            prior_notes: "data/input/Ultimate Birds.txt".into(),
            processed_dir: "data/processed".into(),
            base_data: "data/output/base_data.csv".into(),
            output: "data/output/Ultimate Birds.csv".into(),
            output_header: "data/output/Ultimate Birds_header.csv".into(),
            output_notes: "data/output/Ultimate Birds_notes.txt".into(),
        }
    }
}

/// Anki import identifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    pub notetype: String,
    pub deck: String,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            notetype: "Birds".to_string(),
            deck: "Ultimate Birds".to_string(),
        }
    }
}

/// Fetch adapter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Attempts per URL before giving up
    pub max_retries: u32,
    /// Fixed delay between attempts (seconds)
    pub retry_delay_secs: u64,
    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
    /// Minimum spacing between two requests (milliseconds, 0 = unthrottled)
    pub min_interval_ms: u64,
    /// Contact address sent in the `From` header
    pub contact_email: Option<String>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_secs: 2,
            timeout_secs: 120,
            min_interval_ms: 0,
            contact_email: None,
        }
    }
}

/// Locate the config file
///
/// **Priority:** CLI argument → `UB_CONFIG` → `<config dir>/ultimate-birds/config.toml`
pub fn config_file_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir().map(|d| d.join("ultimate-birds").join("config.toml"))
}

/// Where [`read_toml_config`] took its values from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// No config file location could be determined
    NoLocation,
    /// The location was known but held no file
    NotFound(PathBuf),
    /// Values were read from this file
    File(PathBuf),
}

impl ConfigSource {
    /// Report the source; call once logging is initialised
    pub fn log(&self) {
        match self {
            ConfigSource::NoLocation => {
                warn!("No config file location available, using built-in defaults")
            }
            ConfigSource::NotFound(path) => {
                warn!("Config file not found: {}, using built-in defaults", path.display())
            }
            ConfigSource::File(path) => info!("Loaded config from {}", path.display()),
        }
    }
}

/// Read TOML configuration without logging, falling back to defaults when the
/// file is absent
///
/// Used before the subscriber exists; the returned [`ConfigSource`] is logged
/// afterwards. A file that exists but does not parse is a configuration error.
pub fn read_toml_config(path: Option<&Path>) -> Result<(TomlConfig, ConfigSource)> {
    let Some(path) = path else {
        return Ok((TomlConfig::default(), ConfigSource::NoLocation));
    };

    if !path.exists() {
        return Ok((TomlConfig::default(), ConfigSource::NotFound(path.to_path_buf())));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;

    Ok((config, ConfigSource::File(path.to_path_buf())))
}

/// Load TOML configuration and log where it came from
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let (config, source) = read_toml_config(path)?;
    source.log();
    Ok(config)
}

/// Resolve the data root folder
///
/// **Priority:** CLI argument → `UB_ROOT_FOLDER` → TOML `root_folder` → current directory
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    // Priority 4: Compiled default
    PathBuf::from(".")
}

/// Write configuration atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    std::fs::write(&temp_path, content)?;
    std::fs::rename(&temp_path, path)?;

    Ok(())
}
