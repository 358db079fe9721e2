//! udpkv - A Minimal In-Memory Key-Value Store over UDP
//!
//! This is the main entry point for the udpkv server.
//! It parses the command line, sets up logging and the storage engine,
//! binds the UDP socket and serves requests until Ctrl+C.

use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use udpkv::commands::CommandHandler;
use udpkv::config::{CliAction, Config};
use udpkv::server::{DatagramServer, ServerStats};
use udpkv::storage::{ExpiryConfig, ExpirySweeper, StorageEngine};

fn print_help() {
    println!(
        r#"
udpkv - A Minimal In-Memory Key-Value Store over UDP

USAGE:
    udpkv [OPTIONS]

OPTIONS:
    -h, --host <HOST>             Host to bind to (default: {host})
    -p, --port <PORT>             Port to listen on (default: {port})
        --sweep-interval <MS>     Run a background expiry sweep every MS milliseconds
                                  (default: 0, expired keys are removed on access only)
    -v, --version                 Print version information
        --help                    Print this help message

EXAMPLES:
    udpkv                         # Listen on {host}:{port}
    udpkv --port 9000             # Listen on port 9000

TALKING TO IT:
    $ echo -n "SET name Ariz PX 60000" | nc -u -w1 127.0.0.1 {port}
    OK
    $ echo -n "GET name" | nc -u -w1 127.0.0.1 {port}
    Ariz
"#,
        host = udpkv::DEFAULT_HOST,
        port = udpkv::DEFAULT_PORT,
    );
}

fn main() -> ExitCode {
    let config = match Config::parse(std::env::args().skip(1)) {
        Ok(CliAction::Run(config)) => config,
        Ok(CliAction::Help) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Ok(CliAction::Version) => {
            println!("udpkv version {}", udpkv::VERSION);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_help();
            return ExitCode::FAILURE;
        }
    };

    // Set up logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn run(config: Config) -> anyhow::Result<()> {
    // The store lives exactly as long as the server
    let storage = Arc::new(StorageEngine::new());
    info!("Storage engine initialized");

    let _sweeper = config.sweep_interval.map(|interval| {
        ExpirySweeper::start(Arc::clone(&storage), ExpiryConfig { interval })
    });

    let stats = Arc::new(ServerStats::new());
    let handler = CommandHandler::new(Arc::clone(&storage));

    let server =
        DatagramServer::bind(&config.bind_address(), handler, Arc::clone(&stats)).await?;
    info!(
        version = udpkv::VERSION,
        addr = %config.bind_address(),
        "udpkv server started"
    );

    let shutdown = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received, stopping server..."),
            Err(e) => {
                error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = server.run() => {}
        _ = shutdown => {}
    }

    let storage_stats = storage.stats();
    info!(
        datagrams = stats.datagrams_received.load(Ordering::Relaxed),
        replies = stats.replies_sent.load(Ordering::Relaxed),
        keys = storage_stats.keys,
        expired = storage_stats.expired,
        "Server shutdown complete"
    );
    Ok(())
}
