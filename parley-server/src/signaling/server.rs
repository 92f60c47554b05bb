use crate::config::RelayConfig;
use crate::room::RoomManager;
use crate::signaling::{AppState, health, stats, ws_handler};
use anyhow::{Context, Result};
use axum::Router;
use axum::http::HeaderValue;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

/// Build the relay's HTTP surface: the WebSocket route plus `/health` and `/stats`.
pub fn router(state: AppState, config: &RelayConfig) -> Result<Router> {
    let ws_route = format!("{}/{{room_id}}", config.ws_path.trim_end_matches('/'));

    let origin = match config.cors_origin.as_deref() {
        None | Some("*") => AllowOrigin::from(Any),
        Some(origin) => AllowOrigin::exact(
            HeaderValue::from_str(origin)
                .with_context(|| format!("invalid CORS origin: {origin}"))?,
        ),
    };

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        .route(&ws_route, get(ws_handler))
        .route("/health", get(health))
        .route("/stats", get(stats))
        .layer(cors)
        .with_state(state))
}

/// Run the relay until Ctrl-C or SIGTERM.
pub async fn serve(config: RelayConfig) -> Result<()> {
    config.validate()?;

    let rooms = RoomManager::new(config.room.clone());
    let app = router(AppState::new(rooms), &config)?;

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(
        "Signaling relay listening on http://{} (ws path {})",
        listener.local_addr()?,
        config.ws_path
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated with an error")?;

    info!("Signaling relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
