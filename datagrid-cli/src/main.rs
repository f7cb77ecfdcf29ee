mod catalog;
mod demo;

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use datagrid_lib::{ConfigError, TableConfig, TableError};
use log::{error, info};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};

/// Walk through a paginated, filterable table over mock data.
#[derive(Debug, Parser)]
#[command(name = "datagrid", version)]
struct Args {
    /// Data set to browse.
    #[arg(value_enum, default_value_t = Dataset::Products)]
    dataset: Dataset,

    /// JSON file with `initialPage`, `pageSize` and `pageSizeOptions`.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Dataset {
    Products,
    Users,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to create log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Table(#[from] TableError),
}

fn init_logging(args: &Args) -> Result<(), CliError> {
    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    match &args.log_file {
        Some(path) => {
            let file = File::create(path).map_err(|source| CliError::LogFile {
                path: path.clone(),
                source,
            })?;
            WriteLogger::init(level, Config::default(), file)?;
        }
        None => TermLogger::init(
            level,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        )?,
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<TableConfig, CliError> {
    let config = match &args.config {
        Some(path) => {
            info!("Loading table config from {}", path.display());
            TableConfig::from_json_file(path)?
        }
        None => TableConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

async fn run(args: Args) -> Result<(), CliError> {
    init_logging(&args)?;
    let config = load_config(&args)?;
    match args.dataset {
        Dataset::Products => demo::products(config).await,
        Dataset::Users => demo::users(config).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
