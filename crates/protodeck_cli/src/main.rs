//! Command-line entry point for maintenance operations on a data directory.
//!
//! # Responsibility
//! - Probe core linkage (`ping`, `version`).
//! - Trigger a manual merge of an edited module copy.
//! - Run the one-shot normalization pass over a module.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use protodeck_core::{init_logging_from_config, CoreConfig, FileModuleService};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "protodeck")]
#[command(about = "Maintenance commands for prototype module data", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a liveness probe
    Ping,
    /// Print the core version
    Version,
    /// Merge an edited copy of a module into the live module
    Merge {
        /// Directory holding `<module>.json` files (defaults to PROTODECK_DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Module to merge into
        #[arg(short, long)]
        module: String,
        /// Edited copy of the module
        #[arg(long = "new")]
        incoming: PathBuf,
    },
    /// Assign missing ids and rewrite addressing fields in a module
    Normalize {
        /// Directory holding `<module>.json` files (defaults to PROTODECK_DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Module to normalize
        #[arg(short, long)]
        module: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Ping => println!("protodeck_core ping={}", protodeck_core::ping()),
        Commands::Version => {
            println!("protodeck_core version={}", protodeck_core::core_version())
        }
        Commands::Merge {
            data_dir,
            module,
            incoming,
        } => cmd_merge(data_dir.as_deref(), &module, &incoming)?,
        Commands::Normalize { data_dir, module } => {
            cmd_normalize(data_dir.as_deref(), &module)?
        }
    }
    Ok(())
}

fn open_service(data_dir: Option<&Path>) -> Result<FileModuleService> {
    let config = CoreConfig::from_env(data_dir).context("loading configuration")?;
    init_logging_from_config(&config).map_err(|err| anyhow!(err))?;
    info!(
        "event=cli_start module=cli status=ok data_dir={}",
        config.data_dir.display()
    );
    Ok(FileModuleService::open(&config))
}

fn cmd_merge(data_dir: Option<&Path>, module: &str, incoming: &Path) -> Result<()> {
    let service = open_service(data_dir)?;
    let summary = service
        .merge_file(module, incoming)
        .with_context(|| format!("merging `{}` into `{module}`", incoming.display()))?;
    if summary.changed {
        println!("merged {} into {module}", incoming.display());
    } else {
        println!("{module} already up to date");
    }
    Ok(())
}

fn cmd_normalize(data_dir: Option<&Path>, module: &str) -> Result<()> {
    let service = open_service(data_dir)?;
    let report = service
        .normalize_module(module)
        .with_context(|| format!("normalizing `{module}`"))?;
    println!(
        "normalized {module}: ids_assigned={} legacy_items_migrated={}",
        report.ids_assigned, report.legacy_items_migrated
    );
    Ok(())
}
