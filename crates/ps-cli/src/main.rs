//! poolstat CLI
//!
//! View live connection pool statistics from a remote instrumentation
//! registry: one text report per poll iteration, printed to stdout.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use poolstat::driver::PollingDriver;
use poolstat::output::{print_error, print_warning};
use ps_core::config::{self, ConfigFile, MonitorConfig};
use ps_registry::TcpRegistryClient;

#[derive(Parser)]
#[command(name = "poolstat")]
#[command(author, version)]
#[command(about = "View live connection pool statistics from a remote registry")]
struct Cli {
    /// Registry host; may carry an embedded port as "host:port"
    #[arg(long)]
    host: Option<String>,

    /// Registry port (required unless the host embeds one)
    #[arg(long)]
    port: Option<u16>,

    /// Number of reports to print (0 for indefinite)
    #[arg(short = 'n', long = "rowcount")]
    rowcount: Option<u64>,

    /// Seconds to wait between polls
    #[arg(value_name = "SLEEP")]
    sleep: Option<u64>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors and reports
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity. Logs go to stderr so reports on
    // stdout stay parsable.
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let settings = resolve_settings(&cli)?;

    let Some(address) = settings.registry_address() else {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "--port is required unless --host carries one (host:port)",
            )
            .exit();
    };

    // Stop cleanly on Ctrl+C: finish nothing past the current iteration
    let cancel = CancellationToken::new();
    let cancel_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            print_warning("Interrupted, stopping after the current iteration");
            cancel_signal.cancel();
        }
    });

    // The registry connection lives for the whole run and is released on
    // every exit path below.
    let mut client = TcpRegistryClient::new(address.clone());
    if let Err(e) = client.connect().await {
        print_error(&e.to_string());
        anyhow::bail!("failed to reach registry at {}", address);
    }
    tracing::info!("Connected to registry at {}", address);

    let driver = PollingDriver::new(settings.rowcount, settings.interval());
    let result = driver
        .run(&mut client, &mut io::stdout(), &cancel)
        .await;

    client.close().await;

    match result {
        Ok(reports) => {
            tracing::debug!(reports, "Run complete");
            Ok(())
        }
        Err(e) => {
            print_error(&e.to_string());
            Err(e.into())
        }
    }
}

/// Merge CLI flags over the config file over built-in defaults.
///
/// An explicitly named config file must load; the default-path file is
/// best-effort.
fn resolve_settings(cli: &Cli) -> Result<MonitorConfig> {
    let file: ConfigFile = if let Some(path) = &cli.config {
        config::load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?
    } else {
        let default_path = config::default_config_path();
        if default_path.exists() {
            config::load_config(&default_path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {:?}: {}", default_path, e);
                ConfigFile::default()
            })
        } else {
            ConfigFile::default()
        }
    };

    Ok(merge_settings(cli, file.monitor))
}

fn merge_settings(cli: &Cli, defaults: MonitorConfig) -> MonitorConfig {
    MonitorConfig {
        host: cli.host.clone().unwrap_or(defaults.host),
        port: cli.port.or(defaults.port),
        rowcount: cli.rowcount.unwrap_or(defaults.rowcount),
        interval_secs: cli.sleep.unwrap_or(defaults.interval_secs),
    }
}
