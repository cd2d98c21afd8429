use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use depscan::cli::Args;
use depscan::config::Config;
use depscan::prelude::*;
use depscan::store::{ResultStore, RESULT_RETENTION};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("Caused by: {}", err);
            source = err.source();
        }
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("depscan=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();
    config.warn_on_partial_credentials();

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);

    // Wire the source adapters (dependency injection)
    let sources: Vec<Arc<dyn VulnerabilitySource>> = vec![
        Arc::new(NvdClient::new(config.sources.nvd_api_key.clone())?),
        Arc::new(SnykClient::new(
            config.sources.snyk_api_token.clone(),
            config.sources.snyk_org_id.clone(),
        )?),
        Arc::new(OssIndexClient::new(config.sources.oss_index_api_key.clone())?),
    ];

    let state = AppState {
        scanner: Arc::new(RunScanUseCase::new(sources)),
        store: Arc::new(ResultStore::new(RESULT_RETENTION)),
    };
    let app = create_router(state);

    let addr = SocketAddr::new(host.parse()?, port);
    info!("Server listening on {}", addr);
    info!("Health check: http://{}/api/health", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves when the process receives Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        },
    }
}
