//! swangate web service
//!
//! OIDC login against Cognito gating the swan page behind a session.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use swangate_auth_core::{
    provider_http_client, AuthFlow, CognitoProvider, CookieCodec, MemorySessionStore,
    ProviderHandle,
};
use swangate_web::config::Config;
use swangate_web::router;
use swangate_web::state::AppState;

/// In-flight requests get this long to finish after a shutdown signal
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// How often expired session records are swept
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting swangate web");

    let config = Config::from_env()?;
    if !config.cookie_secure {
        tracing::warn!(
            "session cookie Secure flag is disabled; set COOKIE_SECURE=true behind end-to-end TLS"
        );
    }

    let oidc = Arc::new(config.oidc.clone());
    let sessions = Arc::new(MemorySessionStore::new(oidc.session_ttl));
    let provider = ProviderHandle::new();
    let flow = AuthFlow::new(Arc::clone(&oidc), provider.clone(), Arc::clone(&sessions));
    let codec = CookieCodec::new(&config.session_secret)?;

    let http = provider_http_client()?;
    let port = config.port;
    let state = AppState::new(flow, codec, config, http.clone());

    // Provider initialization is asynchronous relative to startup; routes
    // that need it answer ServiceUnavailable until it lands. Discovery
    // failure is fatal: do not serve authenticated routes without metadata.
    tokio::spawn({
        let provider = provider.clone();
        async move {
            match CognitoProvider::discover(oidc, http).await {
                Ok(cognito) => {
                    provider.set(Arc::new(cognito));
                    tracing::info!("identity provider initialized");
                }
                Err(e) => {
                    tracing::error!(error = %e, "identity provider discovery failed");
                    std::process::exit(1);
                }
            }
        }
    });

    // Periodic sweep of expired session records
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let purged = sessions.purge_expired().await;
            if purged > 0 {
                tracing::debug!(purged, "swept expired sessions");
            }
        }
    });

    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server closed");
    Ok(())
}

/// Resolves on SIGTERM/SIGINT, then bounds the drain period: if in-flight
/// requests have not finished within the grace period, terminate anyway.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install SIGINT handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Received shutdown signal");

    tokio::spawn(async {
        tokio::time::sleep(SHUTDOWN_GRACE).await;
        tracing::error!("could not drain connections in time, forcefully shutting down");
        std::process::exit(1);
    });
}
