//! Session lifecycle: created on login, refreshed on token refresh,
//! destroyed on logout or when expiry is detected on load.

use crate::auth::token;
use crate::store::{self, KeyValueCollection};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

const SESSION_KEY: &str = "current";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub premium: bool,
}

impl Session {
    /// Builds a session from a freshly issued credential. The premium flag
    /// prefers the server-provided value and falls back to the claim.
    pub fn from_token(token_str: &str, premium: Option<bool>) -> Self {
        let claims = token::decode(token_str);
        let expires_at = claims
            .as_ref()
            .and_then(|c| c.exp)
            .and_then(|exp| Utc.timestamp_opt(exp, 0).single());
        let premium = premium
            .or_else(|| claims.as_ref().and_then(|c| c.premium))
            .unwrap_or(false);

        Session {
            token: token_str.to_string(),
            expires_at,
            premium,
        }
    }

    pub fn is_expired(&self) -> bool {
        !token::is_valid(&self.token)
    }

    /// True when the session declares an expiry inside the given window.
    /// Sessions without an expiry never report as expiring.
    pub fn expires_within(&self, window: Duration) -> bool {
        self.expires_at.is_some_and(|at| at - Utc::now() < window)
    }
}

/// Persists the session in the local store.
pub struct SessionStore {
    collection: Arc<dyn KeyValueCollection>,
}

impl SessionStore {
    pub fn new(collection: Arc<dyn KeyValueCollection>) -> Self {
        Self { collection }
    }

    /// Loads the persisted session. Absent, malformed or expired entries
    /// all read as `None`; an expired entry is removed on detection.
    pub async fn load(&self) -> Option<Session> {
        let session: Session = store::get_typed(self.collection.as_ref(), SESSION_KEY).await?;
        if session.is_expired() {
            debug!("Persisted session is expired, destroying it");
            self.collection.remove(SESSION_KEY).await;
            return None;
        }
        Some(session)
    }

    pub async fn save(&self, session: &Session) {
        store::put_typed(self.collection.as_ref(), SESSION_KEY, session, None).await;
    }

    pub async fn clear(&self) {
        self.collection.remove(SESSION_KEY).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::encode_test_token;
    use crate::store::{KeyValueStore, SESSION_COLLECTION};
    use serde_json::json;

    fn session_store() -> SessionStore {
        let store = KeyValueStore::in_memory();
        SessionStore::new(store.collection(SESSION_COLLECTION))
    }

    #[tokio::test]
    async fn test_session_roundtrip() {
        let store = session_store();
        let exp = Utc::now().timestamp() + 3600;
        let token = encode_test_token(&json!({"sub": "u1", "exp": exp}));

        let session = Session::from_token(&token, Some(true));
        assert!(session.premium);
        assert_eq!(
            session.expires_at.map(|t| t.timestamp()),
            Some(exp)
        );

        store.save(&session).await;
        assert_eq!(store.load().await, Some(session));
    }

    #[tokio::test]
    async fn test_expired_session_is_destroyed_on_load() {
        let store = session_store();
        let token = encode_test_token(&json!({"exp": Utc::now().timestamp() - 10}));

        store.save(&Session::from_token(&token, None)).await;
        assert!(store.load().await.is_none());
        // Second load also sees nothing, the entry is gone.
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn test_clear_destroys_session() {
        let store = session_store();
        let token = encode_test_token(&json!({"exp": Utc::now().timestamp() + 3600}));

        store.save(&Session::from_token(&token, None)).await;
        store.clear().await;
        assert!(store.load().await.is_none());
    }

    #[test]
    fn test_premium_falls_back_to_claim() {
        let token = encode_test_token(&json!({"premium": true}));
        let session = Session::from_token(&token, None);
        assert!(session.premium);

        let session = Session::from_token(&token, Some(false));
        assert!(!session.premium);
    }

    #[test]
    fn test_expires_within_window() {
        let soon = encode_test_token(&json!({"exp": Utc::now().timestamp() + 60}));
        let session = Session::from_token(&soon, None);
        assert!(session.expires_within(Duration::minutes(15)));
        assert!(!session.expires_within(Duration::seconds(30)));

        // No expiry claim means no declared expiry to fall inside.
        let unbounded = Session::from_token("h.e30.s", None);
        assert!(!unbounded.expires_within(Duration::minutes(15)));
    }

    #[test]
    fn test_undecodable_token_reads_as_expired() {
        let session = Session::from_token("opaque-token", None);
        assert!(session.expires_at.is_none());
        assert!(!session.premium);
        // The advisory check treats anything it cannot decode as invalid.
        assert!(session.is_expired());
    }
}
