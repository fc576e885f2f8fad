// vendor-enrich - Vendor identity enrichment from public company registries
// Copyright (c) 2025 vendor-enrich Contributors
// Licensed under the MIT License

use clap::Parser;
use std::process;
use tokio::sync::watch;
use vendor_enrich::cli::{Cli, Commands, EXIT_FATAL};
use vendor_enrich::config::{load_config, LoggingConfig};
use vendor_enrich::logging::{init_logging, LoggingGuard};

#[tokio::main]
async fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logging follows the config file when it loads; commands report config errors themselves
    let file_config = load_config(&cli.config).ok();
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| file_config.as_ref().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let logging_config = file_config
        .map(|c| c.logging)
        .unwrap_or_else(|| LoggingConfig {
            local_enabled: false,
            ..LoggingConfig::default()
        });

    let _guard = match start_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "vendor-enrich - Vendor identity enrichment"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    if tokio::signal::ctrl_c().await.is_ok() {
                        request_shutdown(&shutdown_tx, "SIGINT");
                    }
                    return;
                }
            };

            tokio::select! {
                _ = tokio::signal::ctrl_c() => request_shutdown(&shutdown_tx, "SIGINT"),
                _ = sigterm.recv() => request_shutdown(&shutdown_tx, "SIGTERM"),
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            } else {
                request_shutdown(&shutdown_tx, "SIGINT");
            }
        }
    });

    let exit_code = match execute_command(&cli, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    process::exit(exit_code);
}

/// Initialize logging, falling back to console only when the log directory is unusable
fn start_logging(level: &str, config: &LoggingConfig) -> vendor_enrich::domain::Result<LoggingGuard> {
    match init_logging(level, config) {
        Ok(guard) => Ok(guard),
        Err(e) if config.local_enabled => {
            eprintln!("File logging disabled: {e}");
            init_logging(
                level,
                &LoggingConfig {
                    local_enabled: false,
                    ..config.clone()
                },
            )
        }
        Err(e) => Err(e),
    }
}

fn request_shutdown(shutdown_tx: &watch::Sender<bool>, signal: &str) {
    tracing::info!(signal, "Shutdown requested, finishing current batch");
    println!("\n⚠️  Shutdown signal received, completing current batch...");
    let _ = shutdown_tx.send(true);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, shutdown_signal: watch::Receiver<bool>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Enrich(args) => args.execute(&cli.config, shutdown_signal).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Status(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
