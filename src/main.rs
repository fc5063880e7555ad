use std::net::SocketAddr;

use tracka::config::DEFAULT_PORT;

#[tokio::main]
async fn main() {
    tracka::telemetry::init();

    let state = match tracka::initialize_state().await {
        Ok(state) => state,
        Err(err) => {
            tracing::error!(error = %err, "cannot initialize server state");
            std::process::exit(1);
        },
    };

    let port = state.config.port.unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = tracka::app(state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, %addr, "cannot bind address");
            std::process::exit(1);
        },
    };

    tracing::info!(%addr, "server started");

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %err, "server stopped unexpectedly");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
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

    tracing::info!("shutdown signal received");
}
