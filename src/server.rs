//! HTTP server initialization and runtime setup.
//!
//! Runs the two-phase store bootstrap, builds the redirect chain and drives the
//! Axum server until a shutdown signal arrives.

use crate::api::handlers::default_handler;
use crate::application::chain::standard_chain;
use crate::config::Config;
use crate::infrastructure::persistence::{DEFAULT_SEED, ServingStore, seed};
use crate::infrastructure::resolvers::{DEFAULT_DOCUMENT, load_document};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

/// Runs the HTTP server with the given configuration.
///
/// Startup order:
/// 1. Seed the store read-write and release that handle (unless `SKIP_SEED`)
/// 2. Open the serving store handle
/// 3. Load the YAML document and build the chain
///    store → YAML → static map → greeting
/// 4. Bind and serve until Ctrl-C / SIGTERM, then release the store
///
/// # Errors
///
/// Returns an error if:
/// - The store cannot be seeded or opened
/// - The configured `REDIRECTS_FILE` cannot be read
/// - Server bind fails
/// - Server runtime error occurs
///
/// A YAML document that fails to parse is not fatal: it is logged and the
/// YAML source is skipped for every request.
pub async fn run(config: Config) -> Result<()> {
    if config.skip_seed {
        info!("Skipping store seeding");
    } else {
        seed(&config.store_path, DEFAULT_SEED).context("Failed to seed store")?;
    }

    let store = ServingStore::open(&config.store_path)
        .context("Failed to open store for serving")?;

    let document = match &config.redirects_file {
        Some(path) => load_document(path).context("Failed to load REDIRECTS_FILE")?,
        None => DEFAULT_DOCUMENT.as_bytes().to_vec(),
    };

    let (chain, parse_error) = standard_chain(
        store.clone(),
        &document,
        config.failure_policy,
        default_handler(),
    );
    if let Some(e) = parse_error {
        error!("{}. YAML redirects are disabled until the document is fixed", e);
    }

    let app = app_router(AppState::new(store.clone()), chain);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close();
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
