//! Admin route table server.
//!
//! # Architecture Overview
//!
//! ```text
//!     routes.rs / route file ──▶ RouteTableBuilder ──▶ RouteTable ◀── watcher (hot reload)
//!                                                          │
//!     Client Request ──▶ http server ──▶ match ──▶ middleware ──▶ controller ──▶ Response
//!                            │
//!                    request id / trace / timeout
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use admin_routes::config::{watcher::SharedResolver, AppConfig, RouteFileWatcher};
use admin_routes::controllers;
use admin_routes::lifecycle::{signals, startup, Shutdown};
use admin_routes::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "admin-routes", version, about = "Admin route table server")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the route table over HTTP (default)
    Serve,
    /// Print the route table
    Routes {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = startup::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Routes { json } => {
            let table = startup::build_table(&config, &controllers::registry())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                print!("{}", table);
            }
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    logging::init(&config.observability)?;

    tracing::info!("admin-routes v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        route_file = ?config.routes.file,
        "Configuration loaded"
    );

    let server = startup::assemble(config.clone())?;

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    // The watcher stops when dropped, so hold it until the server exits.
    let (_watcher, table_updates) = match (&config.routes.file, config.routes.watch) {
        (Some(file), true) => {
            let resolver: SharedResolver = Arc::new(controllers::registry());
            let (watcher, rx) = RouteFileWatcher::new(Path::new(file), resolver);
            (Some(watcher.run()?), rx)
        }
        _ => {
            let (_tx, rx) = mpsc::unbounded_channel();
            (None, rx)
        }
    };

    let shutdown = Shutdown::new();
    signals::spawn(shutdown.clone());

    server.run(listener, table_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
