//! Sector catalog generator CLI.
//!
//! Turns ATCF deck files into a directory of dynamic sector records.
//! Storm year comes from each deck filename and the storm name from the
//! last named advisory, so every fix of a storm shares one sector name.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use deck_ingest::{final_storm_name, generate, parse_deck, storm_year_from_filename,
    GeneratorConfig};

#[derive(Parser, Debug)]
#[command(name = "sectorgen")]
#[command(about = "Dynamic sector generation from tropical cyclone deck files")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one sector record per synoptic fix in each deck file.
    RunYamlFromDeckfile {
        /// Deck file paths
        #[arg(required = true)]
        decks: Vec<PathBuf>,

        /// Directory the sector catalog is written into
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Overwrite existing catalog entries
        #[arg(long)]
        force: bool,
    },

    /// Push deck files into the ATCF storm database (external tool).
    UpdateAtcfDatabase {
        /// Arguments forwarded to the updater
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::RunYamlFromDeckfile {
            decks,
            output_dir,
            force,
        } => {
            let written = run_yaml_from_deckfile(&decks, &output_dir, force)?;
            if written.is_empty() {
                warn!("no sector records written, nothing to do");
            }
            Ok(())
        }
        Command::UpdateAtcfDatabase { args } => {
            // The database updater ships separately; this entry point only
            // documents the interface.
            bail!(
                "update-atcf-database delegates to the external ATCF database \
                 updater (args: {args:?}); it is not bundled with sectorgen"
            );
        }
    }
}

/// Generate sector records for every deck, creating the output directory
/// (mode 0o755) when absent. Returns all written paths.
fn run_yaml_from_deckfile(
    decks: &[PathBuf],
    output_dir: &Path,
    force: bool,
) -> Result<Vec<PathBuf>> {
    create_output_dir(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let config = GeneratorConfig {
        force,
        ..GeneratorConfig::default()
    };

    let mut written = Vec::new();
    for deck in decks {
        let storm_year = storm_year_from_filename(deck)?;
        let fixes = parse_deck(deck)?;
        let storm_name = final_storm_name(&fixes);
        info!(
            deck = %deck.display(),
            storm_year,
            storm_name = %storm_name,
            fixes = fixes.len(),
            "processing deck file"
        );

        let paths = generate(deck, output_dir, storm_year, &storm_name, &config)?;
        for path in &paths {
            info!(sector_file = %path.display(), "WORKFLOWSUCCESS");
        }
        written.extend(paths);
    }
    Ok(written)
}

#[cfg(unix)]
fn create_output_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    if dir.exists() {
        return Ok(());
    }
    fs::DirBuilder::new().recursive(true).mode(0o755).create(dir)
}

#[cfg(not(unix))]
fn create_output_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}
