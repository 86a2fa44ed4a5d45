//! Subscription PDF service binary.
//!
//! Wires the shared browser session, capture cache, and renderer into an
//! axum application:
//!
//! - `POST /api/pdf/generate` - JSON subscription payload in, PDF attachment
//!   out; `500` with `{error, details}` on any failure
//! - `GET /health` - liveness probe
//!
//! Browser work is blocking CDP, so every generation runs inside
//! `tokio::task::spawn_blocking`. On SIGTERM/ctrl-c the server drains and
//! the browser session is closed.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};

use subscription_pdf_api::prelude::*;

/// Shared handler state.
#[derive(Clone)]
struct AppState {
    generator: Arc<SubscriptionPdfGenerator>,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    #[cfg(feature = "env-config")]
    let config = subscription_pdf_api::from_env().expect("invalid service configuration");

    #[cfg(not(feature = "env-config"))]
    let config = ServiceConfig::default();

    let port = config.port;

    let session: SharedBrowserSession = Arc::new(BrowserSession::new(Box::new(
        ChromeBrowserFactory::from_config_path(config.chrome_path.clone()),
    )));
    let cache = CaptureCache::from_config(&config);
    let generator = Arc::new(SubscriptionPdfGenerator::new(
        Arc::clone(&session),
        cache,
        config,
    ));

    let app = Router::new()
        .route("/api/pdf/generate", post(generate_pdf))
        .route("/health", get(health))
        .with_state(AppState { generator });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .expect("failed to bind listen port");

    log::info!("PDF generator service running on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(session))
        .await
        .expect("server error");
}

/// `POST /api/pdf/generate`
///
/// Runs the blocking render pipeline off the async runtime and maps the
/// outcome onto the wire contract: `200` with the PDF bytes and an
/// attachment disposition, or `500` with the JSON error body.
async fn generate_pdf(
    State(state): State<AppState>,
    Json(document): Json<SubscriptionDocument>,
) -> Response {
    let generator = Arc::clone(&state.generator);

    let result = tokio::task::spawn_blocking(move || generator.generate(document)).await;

    match result {
        Ok(Ok(artifact)) => {
            log::info!(
                "Returning {} ({} bytes)",
                artifact.file_name,
                artifact.size()
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (header::CONTENT_DISPOSITION, artifact.content_disposition()),
                ],
                artifact.data,
            )
                .into_response()
        }
        Ok(Err(e)) => {
            log::error!("Error generating PDF: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::from(&e)),
            )
                .into_response()
        }
        Err(e) => {
            log::error!("PDF generation task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to generate PDF".to_string(),
                    details: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// `GET /health`
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Wait for ctrl-c or SIGTERM, then close the browser session.
async fn shutdown_signal(session: SharedBrowserSession) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl+c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
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

    log::info!("Shutting down...");
    session.shutdown();
}
