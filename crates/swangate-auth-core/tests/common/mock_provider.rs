//! In-memory identity provider double
//!
//! Mimics the provider-side contract the flow depends on: authorization
//! codes are single-use, and failures can be injected per call site.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use openidconnect::AccessToken;
use swangate_auth_core::{AuthError, IdentityProvider, ProviderHandle, UserRecord};
use url::Url;

#[derive(Default)]
pub struct MockProvider {
    pub fail_exchange: bool,
    pub fail_user_info: bool,
    pub exchange_calls: AtomicUsize,
    pub user_info_calls: AtomicUsize,
    /// Nonce the flow forwarded on the most recent exchange
    pub last_nonce: Mutex<Option<String>>,
    redeemed_codes: Mutex<HashSet<String>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_exchange() -> Self {
        Self {
            fail_exchange: true,
            ..Self::default()
        }
    }

    pub fn failing_user_info() -> Self {
        Self {
            fail_user_info: true,
            ..Self::default()
        }
    }

    /// Wrap this mock in an already-initialized handle.
    pub fn into_handle(self) -> (Arc<Self>, ProviderHandle) {
        let provider = Arc::new(self);
        let handle = ProviderHandle::new();
        handle.set(Arc::clone(&provider) as Arc<dyn IdentityProvider>);
        (provider, handle)
    }

    pub fn exchange_count(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }
}

pub fn mock_user() -> UserRecord {
    UserRecord {
        sub: "mock-user-sub".to_string(),
        email: Some("swan.keeper@example.com".to_string()),
        name: Some("Swan Keeper".to_string()),
        extra: serde_json::Map::new(),
    }
}

#[async_trait]
impl IdentityProvider for MockProvider {
    fn authorization_url(&self, state: &str, nonce: &str) -> Url {
        Url::parse_with_params(
            "https://idp.example.com/oauth2/authorize",
            &[
                ("client_id", "test-client-id"),
                ("response_type", "code"),
                ("state", state),
                ("nonce", nonce),
            ],
        )
        .unwrap()
    }

    async fn exchange_code(&self, code: &str, nonce: &str) -> Result<AccessToken, AuthError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_nonce.lock().unwrap() = Some(nonce.to_owned());

        if self.fail_exchange {
            return Err(AuthError::TokenExchange("injected failure".to_string()));
        }

        let mut redeemed = self.redeemed_codes.lock().unwrap();
        if !redeemed.insert(code.to_owned()) {
            return Err(AuthError::TokenExchange(
                "authorization code already redeemed".to_string(),
            ));
        }

        Ok(AccessToken::new(format!("access-token-for-{code}")))
    }

    async fn fetch_user_info(&self, _access_token: &AccessToken) -> Result<UserRecord, AuthError> {
        self.user_info_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_user_info {
            return Err(AuthError::UserInfoFetch("injected failure".to_string()));
        }

        Ok(mock_user())
    }
}
