//! Gradebook HTTP API server.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use gradebook::server::{self, AppState, Config, router};

/// Gradebook HTTP API server.
#[derive(Parser, Debug)]
#[command(name = "gradebook-server")]
#[command(about = "HTTP API server for weighted course-score aggregation")]
struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "gradebook.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_file(&args.config)?;
    let bind_addr = config.bind_addr();

    // Initialize tracing
    server::logging::init(&config.logging)?;

    tracing::info!("Opening grade store at {}", config.database.path);

    // Create application state
    let state = AppState::from_config(&config)?;

    // Build router
    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Parse bind address
    let addr: SocketAddr = bind_addr.parse()?;

    tracing::info!("Starting server on {}", addr);

    // Create the listener
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
