use std::future::IntoFuture;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::Notify;
use tracing::{error, info, warn};

use folio_engine::FolderServiceBuilder;
use folio_server::api::AppState;
use folio_server::config::FolioConfig;
use folio_server::grant_store_factory::create_grant_store;
use folio_server::object_store_factory::create_object_store;

/// Folio folder listing server.
#[derive(Parser, Debug)]
#[command(name = "folio-server", about = "Time-limited folder listings over object storage")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "folio.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the DynamoDB grant table if it does not exist, then exit.
    CreateTable,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = FolioConfig::load(Path::new(&cli.config))?;
    folio_server::telemetry::init(&config.logging)?;

    if !Path::new(&cli.config).exists() {
        info!(path = %cli.config, "config file not found, using defaults");
    }

    if let Some(Commands::CreateTable) = cli.command {
        return run_create_table(&config).await;
    }

    let grants = create_grant_store(&config.grants).await?;
    let objects = create_object_store(&config.storage, &config.listing).await?;

    let service = FolderServiceBuilder::new()
        .grant_store(grants)
        .object_store(objects.store)
        .bucket(objects.bucket)
        .grant_ttl_seconds(config.grants.ttl_seconds)
        .page_timeout(Duration::from_secs(config.listing.page_timeout_seconds))
        .max_concurrent_signatures(config.listing.max_concurrent_signatures)
        .build()?;
    info!(?service, "folder service ready");

    let state = AppState::new(Arc::new(service), config.server.external_url.clone())?;
    let app = folio_server::api::router(state);

    // CLI overrides take precedence.
    let host = cli.host.unwrap_or(config.server.host);
    let port = cli.port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "folio-server listening");

    let signalled = Arc::new(Notify::new());
    let server = axum::serve(listener, app).with_graceful_shutdown({
        let signalled = Arc::clone(&signalled);
        async move {
            shutdown_signal().await;
            signalled.notify_one();
        }
    });

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);
    tokio::select! {
        result = server.into_future() => result?,
        () = async {
            signalled.notified().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            warn!(
                timeout_secs = config.server.shutdown_timeout_seconds,
                "shutdown timeout exceeded, dropping in-flight requests"
            );
        }
    }

    info!("folio-server shut down");
    Ok(())
}

#[cfg(feature = "dynamodb")]
async fn run_create_table(config: &FolioConfig) -> Result<(), Box<dyn std::error::Error>> {
    folio_server::grant_store_factory::provision_grant_table(&config.grants).await?;
    Ok(())
}

#[cfg(not(feature = "dynamodb"))]
#[allow(clippy::unused_async)]
async fn run_create_table(_config: &FolioConfig) -> Result<(), Box<dyn std::error::Error>> {
    Err("create-table requires the `dynamodb` feature".into())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM, then return to trigger graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
