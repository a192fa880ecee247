//! fin_export - CLI tool for exporting MT940 statement files to CSV, JSON or SQLite.

use clap::Parser;
use fin_export::{pipeline, ExportRequest, Format, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fin_export")]
#[command(about = "Parse SWIFT .fin files (MT940) into CSV, JSON, or SQLite", long_about = None)]
struct Cli {
    /// One or more .fin files (MT940) to process
    #[arg(value_name = "FILE", required = true)]
    inputs: Vec<PathBuf>,

    /// Output path (file or directory)
    #[arg(short, long, value_name = "OUTPUT", default_value = ".")]
    output: PathBuf,

    /// Output format
    #[arg(long, default_value = "csv", value_parser = ["csv", "json", "sqlite"])]
    format: String,

    /// SQLite database file, used when the format is sqlite
    #[arg(long = "sqlite-db", value_name = "DB_PATH")]
    sqlite_db: Option<PathBuf>,

    /// Log level, unless RUST_LOG is set
    #[arg(long, env = "FIN_EXPORT_LOG_LEVEL", default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,
}

impl Cli {
    fn request(&self) -> Result<ExportRequest> {
        let format = self.format.parse::<Format>()?;

        let destination = match (format, &self.sqlite_db) {
            (Format::Sqlite, Some(db_path)) => db_path.clone(),
            _ => self.output.clone(),
        };

        Ok(ExportRequest::new(self.inputs.iter().cloned())
            .with_format(format)
            .with_destination(destination))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.log_level);
    debug!("Log level set to {}", cli.log_level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(error = ?e, "Export failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    trace!("{cli:?}");
    let request = cli.request()?;
    let summary = pipeline::run(&request)?;

    for failure in &summary.failures {
        eprintln!("Failed to parse {}: {}", failure.path.display(), failure.error);
    }

    let artifact = summary.artifact;
    match artifact.format {
        Format::Sqlite => println!("Wrote data into SQLite DB at {}", artifact.path.display()),
        format => println!(
            "Wrote {} to {}",
            format.name().to_uppercase(),
            artifact.path.display()
        ),
    }

    Ok(())
}

/// Initializes the tracing subscriber.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        // RUST_LOG exists; use it.
        Some(_) => EnvFilter::from_default_env(),
        // Otherwise log this crate only, at the requested level.
        None => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
