//! ub-builder - Ultimate Birds deck builder
//!
//! Every pass can be run on its own; results are kept under the processed
//! folder between invocations. `all` runs the whole batch.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use ub_builder::{default_version, BuilderConfig, CombineSummary, Pipeline};
use ub_common::config::{
    config_file_path, read_toml_config, resolve_root_folder, write_toml_config, TomlConfig,
};

/// Command-line arguments for ub-builder
#[derive(Parser, Debug)]
#[command(name = "ub-builder")]
#[command(about = "Build the Ultimate Birds Anki deck")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folder all relative data paths are resolved against
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Log level, overriding the configuration file
    #[arg(long, env = "UB_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconcile eBird and IOC names into the base data file
    Base,
    /// Translated common names from the IOC list and the first deck
    Translations,
    /// Mnemonic text per species
    Mnemonics,
    /// Range tags and conservation status scraped from Avibase
    Avibase,
    /// Photos and identification text scraped from eBird
    Images,
    /// Recordings selected from the sound archive
    Audio,
    /// Join every processed table and write the import files
    Combine {
        /// Version tag appended to every note
        #[arg(long)]
        version: Option<String>,
    },
    /// Run every stage in order
    All {
        /// Version tag appended to every note
        #[arg(long)]
        version: Option<String>,
    },
    /// Write a configuration file with the built-in defaults
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = config_file_path(args.config.as_deref());
    let (mut toml_config, config_source) =
        read_toml_config(config_path.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = &args.log_level {
        toml_config.logging.level = level.clone();
    }
    ub_common::logging::init(&toml_config.logging).context("Failed to initialise logging")?;

    info!(
        build = env!("UB_BUILD_ID"),
        "Starting ub-builder v{}",
        env!("CARGO_PKG_VERSION")
    );
    config_source.log();

    if let Command::InitConfig { force } = args.command {
        return init_config(config_path, force);
    }

    let root = resolve_root_folder(args.root.as_deref(), &toml_config);
    let pipeline = Pipeline::new(BuilderConfig::resolve(&toml_config, root))
        .context("Failed to initialise pipeline")?;
    run(&pipeline, args.command).await
}

fn init_config(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let Some(path) = config_path else {
        bail!("No configuration file location available; pass --config");
    };
    if path.exists() && !force {
        bail!("{} already exists; use --force to overwrite", path.display());
    }
    write_toml_config(&TomlConfig::default(), &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote default configuration to {}", path.display());
    Ok(())
}

async fn run(pipeline: &Pipeline, command: Command) -> Result<()> {
    match command {
        Command::Base => {
            pipeline.base().context("Base stage failed")?;
        }
        Command::Translations => {
            pipeline.translations().context("Translations pass failed")?;
        }
        Command::Mnemonics => {
            pipeline.mnemonics().context("Mnemonics pass failed")?;
        }
        Command::Avibase => {
            pipeline.avibase().await.context("Avibase pass failed")?;
        }
        Command::Images => {
            pipeline.images().await.context("Images pass failed")?;
        }
        Command::Audio => {
            pipeline.audio().context("Audio pass failed")?;
        }
        Command::Combine { version } => {
            let version = version.unwrap_or_else(default_version);
            let summary = pipeline.combine(&version).context("Combine failed")?;
            print_summary(&summary)?;
        }
        Command::All { version } => {
            let version = version.unwrap_or_else(default_version);
            let summary = pipeline.all(&version).await.context("Pipeline failed")?;
            print_summary(&summary)?;
        }
        Command::InitConfig { .. } => {}
    }

    Ok(())
}

fn print_summary(summary: &CombineSummary) -> Result<()> {
    info!(rows = summary.rows, updates = summary.updates, "Deck written");
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}
