//! # Catalog Segments CLI
//!
//! Evaluates segment rules against a JSON record file, lists records and
//! ingests upstream product listings.

use clap::{Parser, Subcommand};
use segment_compiler::config::runtime::LogBackend;
use segment_compiler::config::{ConfigError, RuntimeConfig};
use segment_compiler::logging::codes;
use segment_compiler::{log_error, log_info, logging};
use segment_engine::ingest::{self, IngestSummary};
use segment_engine::{
    EvaluatorConfig, InMemoryStore, SegmentEvaluator, SegmentResponse, SegmentService,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "segments", version, about = "Evaluate catalog segment rules")]
struct Cli {
    /// Runtime configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate a rule set and print matching records
    Evaluate {
        /// JSON array of catalog records
        #[arg(long, value_name = "FILE")]
        records: PathBuf,

        /// File with one condition per line
        #[arg(long, value_name = "FILE", conflicts_with = "rule")]
        rules: Option<PathBuf>,

        /// A single condition; repeat for several
        #[arg(long, value_name = "CONDITION")]
        rule: Vec<String>,
    },

    /// Print every stored record
    Products {
        #[arg(long, value_name = "FILE")]
        records: PathBuf,
    },

    /// Map upstream products into the record file (upsert by id)
    Ingest {
        /// Upstream product listing: a JSON array, or an array of pages
        #[arg(long, value_name = "FILE")]
        source: PathBuf,

        #[arg(long, value_name = "FILE")]
        records: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct IngestResponse {
    success: bool,
    #[serde(flatten)]
    summary: IngestSummary,
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            logging::safe_log_error(error.error_code(), &error.to_string());
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = init_logging(&config) {
        logging::safe_log_error(codes::system::INITIALIZATION_FAILURE, &error.to_string());
        return ExitCode::FAILURE;
    }

    match run(cli.command, &config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            log_error!(codes::system::INTERNAL_ERROR, "Command failed",
                "error" => &error
            );
            print_json(&SegmentResponse::<()>::failure(error.to_string(), 500));
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<RuntimeConfig, ConfigError> {
    match path {
        Some(path) => RuntimeConfig::load_from_file(path),
        None => Ok(RuntimeConfig::default()),
    }
}

fn init_logging(config: &RuntimeConfig) -> CliResult<()> {
    if config.logging.backend == LogBackend::Facade {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init()?;
    }

    logging::init_global_logging_with_preferences(config.logging.clone())?;
    log::debug!("{}", logging::get_system_diagnostics());
    Ok(())
}

/// Run a command; `Ok(false)` means the response reported a failure
fn run(command: Command, config: &RuntimeConfig) -> CliResult<bool> {
    match command {
        Command::Evaluate {
            records,
            rules,
            rule,
        } => {
            let rule_text = match rules {
                Some(path) => std::fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read rules '{}': {}", path.display(), e))?,
                None => rule.join("\n"),
            };

            let service = open_service(&records, config)?;
            log_info!("Evaluating segment", "records" => records.display());

            let response = service.evaluate(&rule_text);
            print_json(&response);
            Ok(response.success)
        }

        Command::Products { records } => {
            let response = open_service(&records, config)?.products();
            print_json(&response);
            Ok(response.success)
        }

        Command::Ingest { source, records } => {
            let store = InMemoryStore::load_json_file(&records)?;
            let summary = ingest::ingest_file(&store, &source)?;
            store.save_json_file(&records)?;

            print_json(&IngestResponse {
                success: true,
                summary,
            });
            Ok(true)
        }
    }
}

fn open_service(records: &Path, config: &RuntimeConfig) -> CliResult<SegmentService> {
    let store = InMemoryStore::load_json_file(records)?;
    let evaluator = SegmentEvaluator::with_config(
        Arc::new(store),
        EvaluatorConfig::from_preferences(&config.evaluation),
    );
    Ok(SegmentService::new(evaluator))
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(error) => eprintln!("Error: failed to render response: {}", error),
    }
}
