//! Main entry point for the first-match demo
//!
//! Runs the services host, the toy game client, or both in one process, with
//! structured logging and graceful shutdown on SIGINT/SIGTERM.

use anyhow::Result;
use clap::{Parser, Subcommand};
use first_match::config::AppConfig;
use first_match::service::{AppState, RunMode};
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info, warn};

/// First Match - toy game client and matchmaking services host
#[derive(Parser)]
#[command(
    name = "first-match",
    version,
    about = "A toy game client and pluggable matchmaking services host",
    long_about = "First Match exercises a matchmaking platform's wrapper API: the client asks the \
                 front door for a match and waits for an assignment, while the services host \
                 supplies the ticket generator, profiles, match function, evaluator and allocator."
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        global = true,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Health port override
    #[arg(long, global = true, value_name = "PORT", help = "Override health server port")]
    health_port: Option<u16>,

    /// Dry run mode (validate config and exit)
    #[arg(
        long,
        global = true,
        help = "Validate configuration and exit without starting"
    )]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the match function, evaluator, allocator and stubs
    Services {
        /// Listen port override
        #[arg(long, value_name = "PORT")]
        port: Option<u16>,
        /// Logic service endpoint override
        #[arg(long, value_name = "URL")]
        mmlogic: Option<String>,
    },
    /// Run the toy game client loop
    Client {
        /// Front door endpoint override
        #[arg(long, value_name = "URL")]
        front_door: Option<String>,
    },
    /// Run the services host and the game client together
    All,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C) signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

/// Load configuration and apply CLI overrides
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }
    if let Some(health_port) = args.health_port {
        config.service.health_port = health_port;
    }

    match &args.command {
        Command::Services { port, mmlogic } => {
            if let Some(port) = port {
                config.services_host.listen_port = *port;
            }
            if let Some(mmlogic) = mmlogic {
                config.services_host.mmlogic_endpoint = mmlogic.clone();
            }
        }
        Command::Client { front_door } => {
            if let Some(front_door) = front_door {
                config.client.front_door_endpoint = front_door.clone();
            }
        }
        Command::All => {}
    }

    first_match::config::validate_config(&config)?;
    Ok(config)
}

/// Display startup banner with service information
fn display_startup_banner(config: &AppConfig, mode: RunMode) {
    info!("First Match ({})", mode);
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!("   Health port: {}", config.service.health_port);
    if mode != RunMode::Client {
        info!("   Listen port: {}", config.services_host.listen_port);
        info!("   Logic service: {}", config.services_host.mmlogic_endpoint);
    }
    if mode != RunMode::Services {
        info!("   Front door: {}", config.client.front_door_endpoint);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let mode = match args.command {
        Command::Services { .. } => RunMode::Services,
        Command::Client { .. } => RunMode::Client,
        Command::All => RunMode::All,
    };

    display_startup_banner(&config, mode);

    if args.dry_run {
        info!("Dry run completed - exiting without starting");
        return Ok(());
    }

    let shutdown_timeout = config.shutdown_timeout();
    let app_state = AppState::new(config)?;
    let shutdown = app_state.shutdown_token();

    let mut run = Box::pin(app_state.run(mode));

    let result = tokio::select! {
        result = &mut run => result,
        _ = wait_for_shutdown_signal() => {
            info!("Shutdown signal received, beginning graceful shutdown...");
            shutdown.cancel();
            match tokio::time::timeout(shutdown_timeout, &mut run).await {
                Ok(result) => result,
                Err(_) => {
                    warn!("Shutdown timeout exceeded, forcing exit");
                    Err(anyhow::anyhow!(
                        "Graceful shutdown did not finish within {:?}",
                        shutdown_timeout
                    ))
                }
            }
        }
    };

    if let Err(e) = result {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }

    info!("First Match stopped");
    Ok(())
}
