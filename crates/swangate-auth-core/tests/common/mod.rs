//! Shared test fixtures

pub mod mock_provider;

use std::sync::Arc;
use std::time::Duration;

use swangate_auth_core::{AuthFlow, MemorySessionStore, OidcConfig, ProviderHandle};

/// Config pointing at a fake deployment; never contacted by tests.
pub fn test_config() -> Arc<OidcConfig> {
    Arc::new(
        OidcConfig::try_new(
            "eu-north-1",
            "eu-north-1_TESTPOOL",
            "test-client-id",
            "test-client-secret-test-client-secret",
            "http://localhost:3000/callback",
            "http://localhost:3000",
            "test-domain.auth.eu-north-1.amazoncognito.com",
        )
        .unwrap(),
    )
}

/// A flow over a fresh in-memory store and the given provider handle.
pub fn test_flow(
    provider: ProviderHandle,
) -> (AuthFlow<MemorySessionStore>, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::new(Duration::from_secs(60)));
    let flow = AuthFlow::new(test_config(), provider, Arc::clone(&store));
    (flow, store)
}

/// Extract a query parameter from an authorization URL.
pub fn query_param(url: &url::Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}
