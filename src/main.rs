mod commands;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wastecal_core::{Mode, Store, WastecalConfig};

#[derive(Parser)]
#[command(name = "wastecal")]
#[command(about = "Edit the waste collection calendar and commit or revert your changes")]
struct Cli {
    /// Directory holding the per-year calendar files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Directory for backups of overwritten calendar files
    #[arg(long, global = true)]
    backup_dir: Option<PathBuf>,

    /// Config file (defaults to ~/.config/wastecal/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List calendar years
    Years,
    /// Print the events of a year
    Show {
        /// Year to show (defaults to the current one)
        year: Option<i32>,

        /// Only show this district
        #[arg(short, long)]
        district: Option<String>,

        /// Ignore unsaved changes and show the committed files
        #[arg(long)]
        committed: bool,

        /// Print the year as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show which years have unsaved changes
    Status,
    /// Add a collection date
    Add {
        district: String,

        /// Date (YYYY-MM-DD)
        date: String,

        /// Waste type key (restmuell, biotonne, papiertonne, gelber_sack, sondermuell, altkleider)
        waste_type: String,

        /// Description (defaults to the waste type's name)
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a collection date
    Delete {
        district: String,
        date: String,
        waste_type: String,
    },
    /// Move a collection to another date
    Move {
        district: String,
        old_date: String,
        new_date: String,
        waste_type: String,
    },
    /// Commit unsaved changes (all years unless one is given)
    Commit { year: Option<i32> },
    /// Discard unsaved changes (all years unless one is given)
    Revert { year: Option<i32> },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Years => commands::years::run(&open(&config, Mode::Edit)?),
        Commands::Show {
            year,
            district,
            committed,
            json,
        } => {
            let mode = if committed { Mode::Serve } else { Mode::Edit };
            commands::show::run(&open(&config, mode)?, year, district.as_deref(), json)
        }
        Commands::Status => commands::status::run(&open(&config, Mode::Edit)?),
        Commands::Add {
            district,
            date,
            waste_type,
            description,
        } => commands::edit::add(
            &open(&config, Mode::Edit)?,
            &district,
            &date,
            &waste_type,
            description,
        ),
        Commands::Delete {
            district,
            date,
            waste_type,
        } => commands::edit::delete(&open(&config, Mode::Edit)?, &district, &date, &waste_type),
        Commands::Move {
            district,
            old_date,
            new_date,
            waste_type,
        } => commands::edit::move_event(
            &open(&config, Mode::Edit)?,
            &district,
            &old_date,
            &new_date,
            &waste_type,
        ),
        Commands::Commit { year } => commands::commit::run(&open(&config, Mode::Edit)?, year),
        Commands::Revert { year } => commands::revert::run(&open(&config, Mode::Edit)?, year),
    }
}

/// Config file, then environment, then command line flags.
fn load_config(cli: &Cli) -> Result<WastecalConfig> {
    let mut config = match &cli.config {
        Some(path) => WastecalConfig::load_from(path)?,
        None => WastecalConfig::load()?,
    };

    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(dir) = &cli.backup_dir {
        config.backup_dir = Some(dir.clone());
    }

    Ok(config)
}

fn open(config: &WastecalConfig, mode: Mode) -> Result<Store> {
    let layout = config.layout();
    Store::open(layout, mode).with_context(|| {
        format!(
            "Failed to load calendar data from {}",
            config.data_path().display()
        )
    })
}
