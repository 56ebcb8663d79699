//! butio-salt-rs - salt-master bootstrap for cloud instances
//!
//! Runs once per provisioning cycle: reads the provisioning argument blob
//! from instance metadata, sets up DNS resolution, writes the master.d
//! configuration fragments, and restarts the salt-master if any fragment
//! changed.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, error};
use tracing_subscriber::FmtSubscriber;

use butio_salt_rs::BootstrapError;
use butio_salt_rs::sources::{ArgumentSource, file::FileSource, gce::GceSource};
use butio_salt_rs::state::ExecutionContext;

#[derive(Parser)]
#[command(name = "butio-salt-rs")]
#[command(author, version, about = "Salt-master bootstrap for cloud instances", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Read provisioning args from a local JSON file instead of metadata
    #[arg(long)]
    args_file: Option<PathBuf>,

    /// Override the metadata server base URL
    #[arg(long, env = "BUTIO_SALT_METADATA_URL")]
    metadata_url: Option<String>,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source: Box<dyn ArgumentSource> = match (&cli.args_file, &cli.metadata_url) {
        (Some(path), _) => Box::new(FileSource::new(path)),
        (None, Some(url)) => Box::new(GceSource::with_base_url(url)),
        (None, None) => Box::new(GceSource::new()),
    };

    let ctx = ExecutionContext::local();

    match butio_salt_rs::run(&ctx, source.as_ref()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(BootstrapError::ConfigSyntax { diagnostic, .. }) => {
            eprintln!("{diagnostic}");
            ExitCode::from(1)
        }
        Err(e) => {
            error!("Bootstrap failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
