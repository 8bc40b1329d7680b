//! Session records, the session store, and the signed session cookie
//!
//! The store owns all session state; the login flow only reads and writes
//! records through it. The cookie carries nothing but an HMAC-signed session
//! id, so a tampered cookie degrades to an anonymous session rather than an
//! error.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::crypto::{constant_time_eq, HmacKey};
use crate::AuthError;

/// Opaque session identifier carried (signed) in the session cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Claims returned by the identity provider.
///
/// Pass-through structure: anything beyond the few claims we render is kept
/// verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Per-browser session state.
///
/// `nonce`/`state` hold at most one in-flight login attempt; `user_info`
/// present means authenticated, regardless of any other field.
#[derive(Debug, Clone, Default)]
pub struct SessionRecord {
    pub nonce: Option<String>,
    pub state: Option<String>,
    pub user_info: Option<UserRecord>,
    /// Managed by the store: refreshed to now + TTL on every save
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// True iff the record carries nothing worth persisting
    pub fn is_empty(&self) -> bool {
        self.nonce.is_none() && self.state.is_none() && self.user_info.is_none()
    }
}

/// Server-side session storage keyed by session id.
///
/// Implementations must keep concurrent `load`/`save` on the same id
/// consistent; no ordering across concurrent requests is promised.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a record. Expired records are treated as absent.
    async fn load(&self, id: SessionId) -> Option<SessionRecord>;

    /// Idempotent upsert. Resets the record's TTL.
    async fn save(&self, id: SessionId, record: SessionRecord);

    /// Remove a record. Returns false if it did not exist.
    async fn destroy(&self, id: SessionId) -> bool;
}

/// In-memory session store with a fixed time-to-live from last write.
pub struct MemorySessionStore {
    ttl: Duration,
    records: RwLock<HashMap<SessionId, SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            records: RwLock::new(HashMap::new()),
        }
    }

    fn deadline(&self) -> DateTime<Utc> {
        Utc::now() + TimeDelta::from_std(self.ttl).unwrap_or(TimeDelta::zero())
    }

    /// Drop all expired records, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| r.expires_at.is_some_and(|t| t > now));
        before - records.len()
    }

    /// Number of live records, expired included until the next purge
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: SessionId) -> Option<SessionRecord> {
        {
            let records = self.records.read().await;
            match records.get(&id) {
                Some(r) if r.expires_at.is_some_and(|t| t > Utc::now()) => {
                    return Some(r.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }
        // Expired: remove under the write lock and report absent
        self.records.write().await.remove(&id);
        None
    }

    async fn save(&self, id: SessionId, mut record: SessionRecord) {
        record.expires_at = Some(self.deadline());
        self.records.write().await.insert(id, record);
    }

    async fn destroy(&self, id: SessionId) -> bool {
        self.records.write().await.remove(&id).is_some()
    }
}

/// Signs and verifies the session cookie value (`{uuid}.{signature}`).
///
/// Decoding is deliberately infallible-by-absence: any malformed or tampered
/// value yields `None` and the caller proceeds anonymously.
#[derive(Clone)]
pub struct CookieCodec {
    key: HmacKey,
}

impl CookieCodec {
    /// Create a codec from the session signing secret (32 bytes minimum).
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, AuthError> {
        let key = HmacKey::new(secret).map_err(|e| AuthError::Configuration(e.to_string()))?;
        Ok(Self { key })
    }

    /// Produce the signed cookie value for a session id
    pub fn encode(&self, id: SessionId) -> String {
        let id_str = id.to_string();
        let signature = self.key.sign(id_str.as_bytes());
        format!("{id_str}.{}", URL_SAFE_NO_PAD.encode(signature))
    }

    /// Verify and parse a cookie value back into a session id
    pub fn decode(&self, value: &str) -> Option<SessionId> {
        let parts: Vec<&str> = value.rsplitn(2, '.').collect();
        if parts.len() != 2 {
            return None;
        }
        let (signature_b64, id_str) = (parts[0], parts[1]);

        let provided = URL_SAFE_NO_PAD.decode(signature_b64).ok()?;
        let expected = self.key.sign(id_str.as_bytes());
        if !constant_time_eq(&expected, &provided) {
            return None;
        }

        Uuid::parse_str(id_str).ok().map(SessionId)
    }
}
