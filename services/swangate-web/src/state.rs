//! Application state

use std::sync::Arc;

use swangate_auth_core::{AuthFlow, CookieCodec, MemorySessionStore};

use crate::config::Config;

/// The flow with the concrete store used in production
pub type WebAuthFlow = AuthFlow<MemorySessionStore>;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Login flow state machine
    pub flow: Arc<WebAuthFlow>,
    /// Session cookie signer/verifier
    pub codec: CookieCodec,
    /// Service configuration
    pub config: Arc<Config>,
    /// HTTP client for the image probes
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(flow: WebAuthFlow, codec: CookieCodec, config: Config, http: reqwest::Client) -> Self {
        Self {
            flow: Arc::new(flow),
            codec,
            config: Arc::new(config),
            http,
        }
    }

    /// Provider readiness, for the health endpoint
    pub fn provider_ready(&self) -> bool {
        self.flow.provider().is_ready()
    }
}
