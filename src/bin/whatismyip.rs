//! Serves the caller's address over HTTP
//!
//! Configured from the environment, e.g.:
//! ```sh
//! WHATISMYIP_IP_SOURCE=ConnectInfo WHATISMYIP_LISTEN_ADDR=127.0.0.1:3000 whatismyip
//! ```
use std::{error::Error, net::SocketAddr};

use axum::{
    extract::{self, FromRequestParts},
    http,
    middleware::{self, Next},
};
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{Span, info, info_span, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use whatismyip::{ConnectingIp, config::ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let app = whatismyip::router().layer(
        ServiceBuilder::new()
            .layer(config.ip_source.into_extension())
            // Request span with a placeholder for the client address
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &http::Request<_>| {
                    info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        ip = tracing::field::Empty
                    )
                }),
            )
            .layer(middleware::from_fn(record_ip)),
    );

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(addr = %listener.local_addr()?, source = ?config.ip_source, "listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

/// Fills the span placeholder with the address the handler is about to echo
async fn record_ip(request: extract::Request, next: Next) -> axum::response::Response {
    let (mut parts, body) = request.into_parts();
    if let Ok(ConnectingIp(Some(ip))) = ConnectingIp::from_request_parts(&mut parts, &()).await {
        Span::current().record("ip", ip);
    }
    next.run(extract::Request::from_parts(parts, body)).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutting down");
}
