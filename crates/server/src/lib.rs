pub mod config;
pub mod errors;
pub mod handlers;
pub mod router;
pub mod state;
pub mod types;

use crate::{config::get_config, router::create_router, state::build_app_state};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Serves the HTTP entry points and runs the polling coordinator until
/// `shutdown` fires.
pub async fn run(
    listener: TcpListener,
    app_state: state::AppState,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let coordinator = app_state.coordinator.clone();
    let poller = tokio::spawn({
        let token = shutdown.clone();
        async move { coordinator.run(token).await }
    });

    let app = create_router(app_state);
    info!("listening on {}", listener.local_addr()?);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown({
            let token = shutdown.clone();
            async move { token.cancelled().await }
        })
        .await;

    shutdown.cancel();
    if let Err(e) = poller.await {
        warn!("Coordinator task ended abnormally: {e}");
    }
    served?;
    Ok(())
}

/// The library's main entry point.
///
/// Sets up logging, configuration, and the TCP listener, then calls `run`.
/// Ctrl-C stops the server and the coordinator.
pub async fn start() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = get_config()?;
    debug!(?config, "Server configuration loaded");
    let app_state = build_app_state(&config.pipeline)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let token = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
            }
            token.cancel();
        }
    });

    run(listener, app_state, shutdown).await
}
