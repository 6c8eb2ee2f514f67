//! Booking service CLI server
//!
//! Headless reservation API suitable for deployment as a systemd service,
//! Docker container, or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/booking-service/config.toml)
//! booking-service
//!
//! # Custom config path
//! booking-service --config /etc/booking-service/config.toml
//!
//! # Override the port, keep reservations in memory
//! booking-service --port 8080 --in-memory
//!
//! # Validate config without starting
//! booking-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use booking_service::config::AppConfig;
use booking_service::server::{init_tracing, ServerHandle, ServerOptions};

/// Booking service: date-range reservations with a fixed daily capacity.
#[derive(Parser, Debug)]
#[command(
    name = "booking-service",
    version,
    about = "REST API for reserving date ranges against a daily capacity",
    long_about = "Booking service: availability, reserve, change and cancel \
                  over a REST API with Swagger UI.\n\n\
                  Default config: ~/.config/booking-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "BOOKING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Keep reservations in memory instead of the database.
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .unwrap_or_else(booking_service::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            if cli.check {
                eprintln!("❌ Invalid configuration in {}: {}", config_path.display(), e);
                std::process::exit(1);
            }
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            return Err(e.into());
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("✅ Configuration is valid");
        println!("   Config file  : {}", config_path.display());
        println!("   API address  : {}", config.server.address());
        println!("   Database     : {}", config.database.connection_url());
        println!("   Capacity     : {} per day", config.booking.capacity);
        println!("   Max stay     : {} days", config.booking.max_stay_days);
        println!("   Log level    : {}", config.logging.level);
        return Ok(());
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        in_memory: cli.in_memory,
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
