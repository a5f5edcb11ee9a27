//! Command driver for the armada registries.
//!
//! Reads commands from a file or stdin and prints one result line per
//! command on stdout. Logs go to stderr.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use armada::cli::{Driver, DriverConfig, Mode};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "armada")]
#[command(about = "Run ship and fleet registry commands")]
struct Args {
    /// Command file; reads stdin when omitted
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Registry to drive (overrides the config file)
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Stop at the first command that does not succeed
    #[arg(long)]
    fail_fast: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match DriverConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("armada: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => DriverConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    config.fail_fast |= args.fail_fast;

    setup_tracing(&config.log_filter);
    info!(mode = ?config.mode, fail_fast = config.fail_fast, "starting armada");

    let mut driver = Driver::new(&config);
    let stdout = io::stdout().lock();
    let result = match &args.input {
        Some(path) => match File::open(path) {
            Ok(file) => driver.run(BufReader::new(file), stdout),
            Err(err) => {
                eprintln!("armada: failed to open {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => driver.run(io::stdin().lock(), stdout),
    };

    match result {
        Ok(summary) if summary.malformed > 0 => {
            eprintln!("armada: skipped {} malformed line(s)", summary.malformed);
            ExitCode::from(2)
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("armada: {err}");
            ExitCode::FAILURE
        }
    }
}

fn setup_tracing(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
