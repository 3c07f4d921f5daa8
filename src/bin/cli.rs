//! feedsync CLI
//!
//! Batch entry point, intended to be invoked by an external scheduler.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use feedsync::{
    error::Result,
    models::{Config, Credentials},
    pipeline::{self, FetchedFiles},
    storage::BaselineStore,
};

/// feedsync - supplier feed to storefront import sync
#[derive(Parser, Debug)]
#[command(
    name = "feedsync",
    version,
    about = "Supplier catalog, pricing, and stock feed sync"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "feedsync.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline: fetch feed files, then generate the import
    Sync {
        /// Skip the fetch step and reuse existing downloads
        #[arg(long)]
        skip_fetch: bool,
    },

    /// Download the three feed files only
    Fetch,

    /// Generate the import file from already-downloaded feed files
    Generate,

    /// Validate the configuration file
    Validate,

    /// Show baseline info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("feedsync starting...");

    let config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Sync { skip_fetch } => {
            config.validate()?;
            let stats = if skip_fetch {
                log::info!("Skipping fetch, using existing downloads...");
                pipeline::run_generate(&config, &FetchedFiles::locate(&config))?
            } else {
                let credentials = Credentials::from_env()?;
                pipeline::run_sync(&config, &credentials)?
            };
            log::info!(
                "Sync complete! {} products ({} new, {} existing, {} discontinued)",
                stats.total,
                stats.new,
                stats.existing,
                stats.discontinued
            );
        }

        Command::Fetch => {
            config.validate()?;
            let credentials = Credentials::from_env()?;
            let files = pipeline::run_fetch(&config, &credentials)?;
            log::info!("Fetch complete!");
            log::info!("  pricing:      {}", files.pricing.display());
            log::info!("  products:     {}", files.products.display());
            log::info!("  availability: {}", files.availability.display());
        }

        Command::Generate => {
            config.validate()?;
            let stats = pipeline::run_generate(&config, &FetchedFiles::locate(&config))?;
            log::info!(
                "Generate complete! {} products ({} new, {} existing, {} discontinued)",
                stats.total,
                stats.new,
                stats.existing,
                stats.discontinued
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
            log::info!("  feed base URL: {}", config.feed.base_url);
            log::info!("  output file:   {}", config.paths.output_file.display());
            log::info!("All validations passed!");
        }

        Command::Info => {
            let store = BaselineStore::new(&config.paths.baseline_file);
            log::info!("Baseline file: {}", store.path().display());
            if store.path().exists() {
                let baseline = store.load()?;
                log::info!("Known SKUs: {}", baseline.len());
                match baseline.updated() {
                    Some(updated) => log::info!("Last updated: {}", updated),
                    None => log::info!("Last updated: unknown"),
                }
            } else {
                log::info!("No baseline yet. First run treats every product as new.");
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
