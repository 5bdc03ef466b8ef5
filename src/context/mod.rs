//! Shared application context with lazily-loaded providers.
//!
//! Two cross-cutting contexts load on demand: the auth context (session
//! restore plus bearer install) and the translation catalog. The nesting
//! order is fixed by construction: auth initializes before translation,
//! and pages run only once both are ready. Pages obtain everything
//! through [`AppContext::ready`], so no page can observe a partially
//! composed tree.

pub mod lazy;
pub mod seq;

pub use lazy::{LazyProvider, ProviderState};
pub use seq::{RequestSeq, Ticket};

use crate::api::ApiClient;
use crate::api::budget::{BudgetService, BudgetSummary};
use crate::auth::{Session, SessionStore};
use crate::core::cache::Cache;
use crate::core::config::AppConfig;
use crate::i18n::Catalog;
use crate::store::{BUDGET_COLLECTION, KeyValueStore, SESSION_COLLECTION};
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

/// Sessions expiring inside this window are exchanged on restore.
const REFRESH_WINDOW_MINUTES: i64 = 15;

/// Authentication state shared by every page.
pub struct AuthContext {
    pub session: Option<Session>,
}

impl AuthContext {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn premium(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.premium)
    }
}

pub struct AppContext {
    config: AppConfig,
    client: Arc<ApiClient>,
    store: Arc<KeyValueStore>,
    budget_cache: Cache<u16, BudgetSummary>,
    auth: LazyProvider<AuthContext>,
    i18n: LazyProvider<Catalog>,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Result<Self> {
        let data_path = config.default_data_path()?;
        let store = Arc::new(KeyValueStore::open(&data_path));
        Ok(Self::with_store(config, store))
    }

    /// Builds the context over an explicit store. Tests use this with an
    /// in-memory store.
    pub fn with_store(config: AppConfig, store: Arc<KeyValueStore>) -> Self {
        let client = Arc::new(ApiClient::new(
            &config.api.base_url,
            config.api.api_key.clone(),
        ));
        Self {
            config,
            client,
            store,
            budget_cache: Cache::new(),
            auth: LazyProvider::new(),
            i18n: LazyProvider::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn client(&self) -> Arc<ApiClient> {
        Arc::clone(&self.client)
    }

    pub fn session_store(&self) -> SessionStore {
        SessionStore::new(self.store.collection(SESSION_COLLECTION))
    }

    pub fn store_collection(&self, name: &str) -> Arc<dyn crate::store::KeyValueCollection> {
        self.store.collection(name)
    }

    /// The budget service shares the context's session-scoped cache, so
    /// every page sees the same cached summaries.
    pub fn budget_service(&self) -> BudgetService {
        BudgetService::new(
            Arc::clone(&self.client),
            self.budget_cache.clone(),
            self.store.collection(BUDGET_COLLECTION),
        )
    }

    pub fn auth_state(&self) -> ProviderState {
        self.auth.state()
    }

    pub fn i18n_state(&self) -> ProviderState {
        self.i18n.state()
    }

    /// The auth context: restores the persisted session, refreshing it
    /// when its expiry is near, and installs the bearer credential on the
    /// client. First caller pays the cost.
    pub async fn auth(&self) -> Result<&AuthContext> {
        self.auth
            .get_or_init(|| async {
                let sessions = self.session_store();
                let mut session = sessions.load().await;
                if let Some(current) = session.take() {
                    let window = chrono::Duration::minutes(REFRESH_WINDOW_MINUTES);
                    session = Some(if current.expires_within(window) {
                        self.refresh_session(&sessions, current).await
                    } else {
                        current
                    });
                }
                match &session {
                    Some(s) => {
                        debug!("Restored session (premium: {})", s.premium);
                        self.client.set_bearer(Some(s.token.clone()));
                    }
                    None => debug!("No usable session persisted"),
                }
                Ok(AuthContext { session })
            })
            .await
    }

    /// Exchanges a near-expiry session for a fresh one and persists it.
    /// When the backend declines or is unreachable the current session
    /// stays in place; expiry handling falls to the next load.
    async fn refresh_session(&self, sessions: &SessionStore, current: Session) -> Session {
        match crate::api::auth::refresh(&self.client, &current.token).await {
            Ok(response) => {
                debug!("Refreshed near-expiry session");
                let refreshed = Session::from_token(&response.token, response.premium);
                sessions.save(&refreshed).await;
                refreshed
            }
            Err(error) => {
                debug!("Session refresh failed: {error}");
                current
            }
        }
    }

    /// The translation catalog. Always initializes the auth context
    /// first: translation must never become ready under an unready auth
    /// provider, whatever the relative timing.
    pub async fn catalog(&self) -> Result<&Catalog> {
        self.auth().await?;
        self.i18n
            .get_or_init(|| async { Ok(Catalog::load(&self.config.locale)) })
            .await
    }

    /// Brings every provider to `Ready`, in nesting order, and hands the
    /// page what it needs. Pages call this exactly once before rendering.
    pub async fn ready(&self) -> Result<(&AuthContext, &Catalog)> {
        let auth = self.auth().await?;
        let catalog = self.catalog().await?;
        Ok((auth, catalog))
    }
}
