use std::sync::Arc;

use {
    axum::{
        Router,
        extract::{DefaultBodyLimit, State},
        response::{IntoResponse, Json},
        routing::get,
    },
    bistro_config::BistroConfig,
    tower_http::{limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer},
    tracing::{info, warn},
};

use crate::{
    authorize::authorize,
    error::{Error, Result},
    state::AppState,
    webhook,
};

// ── Router ───────────────────────────────────────────────────────────────────

/// Build the bot router (shared between production startup and tests).
pub fn build_app(state: AppState) -> Router {
    let server = &state.config.server;
    let assets = ServeDir::new(&server.assets_dir);
    let body_limit = RequestBodyLimitLayer::new(server.max_body_bytes);

    Router::new()
        .route("/health", get(health_handler))
        .route("/webhook", get(webhook::verify).post(webhook::receive))
        .route("/authorize", get(authorize))
        .fallback_service(assets)
        .layer(DefaultBodyLimit::disable())
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Serve until Ctrl-C or SIGTERM, then let in-flight replies finish.
pub async fn start(config: BistroConfig) -> Result<()> {
    let (host, port) = (config.server.bind.clone(), config.server.port);
    let state = AppState::from_config(config)?;
    let outbox = Arc::clone(state.outbox());
    let app = build_app(state.clone());

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .map_err(|source| Error::Bind {
            addr: format!("{host}:{port}"),
            source,
        })?;
    let addr = listener.local_addr().map_err(Error::Serve)?;
    info!(
        %addr,
        server_url = %state.config.server.server_url,
        assets = %state.config.server.assets_dir,
        missing_signature = %state.config.messenger.missing_signature,
        "bistro gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Error::Serve)?;

    outbox.shutdown().await;
    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("received shutdown signal, cleaning up");
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "pending_replies": state.outbox().pending(),
    }))
}
