use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use atrium::engine::Engine;
use atrium::store::{self, MemStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let metrics_port: Option<u16> = std::env::var("ATRIUM_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok());
    atrium::observability::init(metrics_port);

    let port = std::env::var("ATRIUM_PORT").unwrap_or_else(|_| "8080".into());
    let bind = std::env::var("ATRIUM_BIND").unwrap_or_else(|_| "0.0.0.0".into());
    let catalog = std::env::var("ATRIUM_CATALOG").ok();

    // The store is built here and passed down; nothing reaches for a global.
    let store = Arc::new(MemStore::new());
    if let Some(ref path) = catalog {
        let venues = store::load_catalog(Path::new(path))?;
        for venue in venues {
            store.insert_venue(venue);
        }
        info!("loaded {} venues from {path}", store.venue_count());
        metrics::gauge!(atrium::observability::VENUES_LOADED).set(store.venue_count() as f64);
    }

    let engine = Arc::new(Engine::new(store));
    let app = atrium::http::router(engine);

    let addr = format!("{bind}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!("atrium listening on {addr}");
    info!("  catalog: {}", catalog.as_deref().unwrap_or("none (empty store)"));
    info!(
        "  metrics: {}",
        metrics_port.map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics"))
    );

    // Graceful shutdown: stop accepting on SIGTERM/ctrl-c, drain in-flight requests
    let shutdown = async {
        let ctrl_c = tokio::signal::ctrl_c();
        #[cfg(unix)]
        {
            let mut sigterm =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("failed to register SIGTERM handler");
            tokio::select! {
                _ = ctrl_c => {}
                _ = sigterm.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            ctrl_c.await.ok();
        }
        info!("shutdown signal received, draining requests");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("atrium stopped");
    Ok(())
}
