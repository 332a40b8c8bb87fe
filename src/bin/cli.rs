//! Roster exporter CLI
//!
//! Fetches teacher enrollments for every course in an account and exports
//! a deduplicated CSV roster. Progress is checkpointed after each course,
//! so an interrupted run resumes where it left off.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use roster::{
    error::Result,
    models::Config,
    pipeline,
    report::LogReporter,
    storage::{CheckpointStore, FileCheckpointStore},
    utils::http,
};

/// roster - Canvas teacher enrollment export
#[derive(Parser, Debug)]
#[command(name = "roster", version, about = "Canvas teacher enrollment export")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "roster.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch all courses, process teacher enrollments, export the CSV
    Run {
        /// Only process courses in this enrollment term
        #[arg(long)]
        term: Option<u64>,

        /// Override the export file path from config
        #[arg(short, long)]
        output: Option<String>,

        /// Override the checkpoint file path from config
        #[arg(long)]
        checkpoint: Option<String>,

        /// Override the API token from config
        #[arg(long)]
        token: Option<String>,
    },

    /// Validate the configuration file
    Validate,

    /// Show checkpoint status
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
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Run {
            term,
            output,
            checkpoint,
            token,
        } => {
            if let Some(path) = output {
                config.paths.export_file = path;
            }
            if let Some(path) = checkpoint {
                config.paths.checkpoint_file = path;
            }
            if let Some(token) = token {
                config.api.token = token;
            }
            config.validate()?;

            let client = http::create_client(&config)?;
            let store = FileCheckpointStore::new(&config.paths.checkpoint_file);
            let reporter = Arc::new(LogReporter);
            let config = Arc::new(config);

            let stats =
                pipeline::run_export(Arc::clone(&config), client, &store, reporter, term).await?;

            log::info!(
                "Courses completed: {}/{} ({} failed this run)",
                stats.already_processed + stats.succeeded,
                stats.total_courses,
                stats.failed
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }

            log::info!("All validations passed!");
        }

        Command::Info => {
            let store = FileCheckpointStore::new(&config.paths.checkpoint_file);
            log::info!("Checkpoint file: {}", store.path().display());

            let checkpoint = store.load().await?;
            if checkpoint.processed.is_empty() && checkpoint.teachers.is_empty() {
                log::info!("No progress recorded yet.");
            } else {
                log::info!("Courses processed: {}", checkpoint.processed.len());
                log::info!("Teachers accumulated: {}", checkpoint.teachers.len());
            }
        }
    }

    Ok(())
}
