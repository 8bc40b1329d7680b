//! Login flow state machine
//!
//! Drives the `Anonymous -> LoginInitiated -> Authenticated -> Anonymous`
//! lifecycle. All session state lives in the [`SessionStore`]; the flow holds
//! no per-request state of its own and is shared across requests.

use std::sync::Arc;

use serde::Deserialize;
use url::Url;

use crate::config::OidcConfig;
use crate::crypto::{constant_time_str_eq, random_token};
use crate::provider::ProviderHandle;
use crate::session::{SessionId, SessionStore, UserRecord};
use crate::AuthError;

/// Parameters the provider appends to the callback redirect
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackParams {
    pub code: String,
    pub state: String,
}

/// The authentication state machine.
///
/// Generic over the session store so tests can substitute their own; the
/// provider is injected through a [`ProviderHandle`] because it becomes
/// available asynchronously after startup.
pub struct AuthFlow<S: SessionStore> {
    config: Arc<OidcConfig>,
    provider: ProviderHandle,
    sessions: Arc<S>,
}

impl<S: SessionStore> AuthFlow<S> {
    pub fn new(config: Arc<OidcConfig>, provider: ProviderHandle, sessions: Arc<S>) -> Self {
        Self {
            config,
            provider,
            sessions,
        }
    }

    pub fn config(&self) -> &OidcConfig {
        &self.config
    }

    pub fn provider(&self) -> &ProviderHandle {
        &self.provider
    }

    /// Start a login attempt: generate a fresh state/nonce pair, store it in
    /// the session (silently superseding any attempt already in flight), and
    /// return the authorization URL to redirect to.
    ///
    /// Fails with `ServiceUnavailable` before provider initialization
    /// completes, without touching the session.
    pub async fn initiate_login(&self, session_id: SessionId) -> Result<Url, AuthError> {
        let provider = self.provider.get()?;

        let state = random_token();
        let nonce = random_token();

        let mut record = self.sessions.load(session_id).await.unwrap_or_default();
        record.state = Some(state.clone());
        record.nonce = Some(nonce.clone());
        self.sessions.save(session_id, record).await;

        tracing::debug!(%session_id, "login initiated");
        Ok(provider.authorization_url(&state, &nonce))
    }

    /// Complete a login attempt from the provider callback.
    ///
    /// The stored state/nonce pair is consumed before any validation, so a
    /// failed callback can never be retried with the same values. On success
    /// the fetched user claims are stored and the session is authenticated.
    pub async fn handle_callback(
        &self,
        session_id: SessionId,
        params: &CallbackParams,
    ) -> Result<UserRecord, AuthError> {
        let provider = self.provider.get()?;

        let mut record = self.sessions.load(session_id).await.unwrap_or_default();
        let stored_state = record.state.take();
        let stored_nonce = record.nonce.take();
        if !record.is_empty() || stored_state.is_some() || stored_nonce.is_some() {
            // Persist the cleared pair up front: single-use regardless of outcome
            self.sessions.save(session_id, record.clone()).await;
        }

        let stored_state = stored_state.ok_or(AuthError::StateMismatch)?;
        if !constant_time_str_eq(&stored_state, &params.state) {
            tracing::warn!(%session_id, "callback state mismatch");
            return Err(AuthError::StateMismatch);
        }
        let nonce = stored_nonce.ok_or(AuthError::StateMismatch)?;

        let access_token = provider.exchange_code(&params.code, &nonce).await?;
        let user_info = provider.fetch_user_info(&access_token).await?;

        record.user_info = Some(user_info.clone());
        self.sessions.save(session_id, record).await;

        tracing::info!(%session_id, sub = %user_info.sub, "login completed");
        Ok(user_info)
    }

    /// End the session and return the provider end-session URL to redirect
    /// to. A missing store record is logged but never blocks the redirect.
    pub async fn logout(&self, session_id: SessionId) -> Url {
        if !self.sessions.destroy(session_id).await {
            tracing::debug!(%session_id, "logout with no session record to destroy");
        } else {
            tracing::info!(%session_id, "session destroyed");
        }
        self.config.end_session_url()
    }

    /// Pure predicate: true iff the session holds user claims.
    pub async fn is_authenticated(&self, session_id: SessionId) -> bool {
        self.user_info(session_id).await.is_some()
    }

    /// The session's user claims, if authenticated.
    pub async fn user_info(&self, session_id: SessionId) -> Option<UserRecord> {
        self.sessions
            .load(session_id)
            .await
            .and_then(|record| record.user_info)
    }
}

impl<S: SessionStore> std::fmt::Debug for AuthFlow<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthFlow")
            .field("config", &self.config)
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}
