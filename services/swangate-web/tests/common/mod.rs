//! Shared fixtures for route tests: an in-process app with a provider double.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use openidconnect::AccessToken;
use tower::ServiceExt;
use url::Url;

use swangate_auth_core::{
    AuthError, AuthFlow, CookieCodec, IdentityProvider, MemorySessionStore, OidcConfig,
    ProviderHandle, UserRecord,
};
use swangate_web::config::Config;
use swangate_web::router;
use swangate_web::state::AppState;

/// Provider double. Redeems any code unless told to fail.
#[derive(Default)]
pub struct MockProvider {
    pub fail_exchange: bool,
    pub fail_user_info: bool,
    pub exchange_calls: AtomicUsize,
}

#[async_trait]
impl IdentityProvider for MockProvider {
    fn authorization_url(&self, state: &str, nonce: &str) -> Url {
        let mut url = Url::parse("https://mock.auth.example.com/oauth2/authorize").unwrap();
        url.query_pairs_mut()
            .append_pair("client_id", "testclientid")
            .append_pair("state", state)
            .append_pair("nonce", nonce);
        url
    }

    async fn exchange_code(&self, code: &str, _nonce: &str) -> Result<AccessToken, AuthError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_exchange {
            return Err(AuthError::TokenExchange("mock exchange failure".to_string()));
        }
        Ok(AccessToken::new(format!("access-token-for-{code}")))
    }

    async fn fetch_user_info(&self, _access_token: &AccessToken) -> Result<UserRecord, AuthError> {
        if self.fail_user_info {
            return Err(AuthError::UserInfoFetch("mock userinfo failure".to_string()));
        }
        Ok(mock_user())
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

pub struct TestApp {
    pub router: Router,
    pub provider: ProviderHandle,
    pub codec: CookieCodec,
}

/// App with the provider still uninitialized
pub fn test_app() -> TestApp {
    let oidc = OidcConfig::try_new(
        "eu-north-1",
        "eu-north-1_TESTPOOL",
        "testclientid",
        "testclientsecret",
        "http://localhost:3000/callback",
        "http://localhost:3000",
        "test-domain.auth.eu-north-1.amazoncognito.com",
    )
    .unwrap();

    let config = Config {
        port: 3000,
        session_secret: "0123456789abcdef0123456789abcdef".to_string(),
        cookie_secure: false,
        oidc: oidc.clone(),
    };

    let oidc = Arc::new(oidc);
    let sessions = Arc::new(MemorySessionStore::new(oidc.session_ttl));
    let provider = ProviderHandle::new();
    let flow = AuthFlow::new(oidc, provider.clone(), sessions);
    let codec = CookieCodec::new(&config.session_secret).unwrap();
    let state = AppState::new(flow, codec.clone(), config, reqwest::Client::new());

    TestApp {
        router: router(state),
        provider,
        codec,
    }
}

/// App with an already-initialized default mock provider
pub fn ready_app() -> TestApp {
    let app = test_app();
    app.provider.set(Arc::new(MockProvider::default()));
    app
}

pub async fn get(app: &TestApp, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = builder.body(Body::empty()).unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// The `name=value` pair from the Set-Cookie header, attributes stripped
pub fn session_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

pub fn query_param(url: &str, name: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}
