//! Log Triage reporter service entry point.

use clap::Parser;
use lt_config::{Config, ConfigOverrides};
use lt_server::{ReporterServer, ServerError};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Log Triage reporter: browse per-host log uploads and their
/// AI-generated diagnostic reports.
#[derive(Parser, Debug)]
#[command(name = "lt-server", version, about)]
struct Cli {
    /// Root directory holding the uploads/reports/archive artifact roots
    #[arg(long, env = "LOGTRIAGE_INGEST_ROOT")]
    ingest_root: Option<PathBuf>,

    /// Directory holding static assets, pages and template.html
    #[arg(long, env = "LOGTRIAGE_PUBLIC_DIR")]
    public_dir: Option<PathBuf>,

    /// Listen address, host:port
    #[arg(long, env = "LOGTRIAGE_LISTEN")]
    listen: Option<String>,

    /// Generate endpoint of the text-generation backend
    #[arg(long, env = "LOGTRIAGE_BACKEND_URL")]
    backend_url: Option<String>,

    /// Model identifier submitted with every generation request
    #[arg(long, env = "LOGTRIAGE_MODEL")]
    model: Option<String>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        tracing::error!(error = %err, "fatal");
        eprintln!("lt-server: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), ServerError> {
    let config = Config::resolve(ConfigOverrides {
        ingest_root: cli.ingest_root,
        public_dir: cli.public_dir,
        listen: cli.listen,
        backend_url: cli.backend_url,
        model: cli.model,
    })?;

    let server = ReporterServer::start(config)?;
    server.join();
    Ok(())
}

fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
