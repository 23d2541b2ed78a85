use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;
use ecocart_pricing::Session;
use crate::app_config::SessionConfig;

pub type SharedSession = Arc<Mutex<Session>>;

/// Live shopper sessions, partitioned by id.
///
/// Each session sits behind its own mutex, so a request holds the lock for
/// the whole check-then-insert of the pricing cache while other sessions
/// proceed independently.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SharedSession>>,
    config: SessionConfig,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Start a new session
    pub async fn create(&self) -> Result<(Uuid, SharedSession), StoreError> {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.config.max_sessions {
            return Err(StoreError::CapacityExceeded(self.config.max_sessions));
        }

        let session = Session::new(self.config.seed_demo_inventory);
        let id = session.id();
        let shared = Arc::new(Mutex::new(session));
        sessions.insert(id, shared.clone());

        info!(session_id = %id, live_sessions = sessions.len(), "Session started");
        Ok((id, shared))
    }

    pub async fn get(&self, id: &Uuid) -> Result<SharedSession, StoreError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(StoreError::SessionNotFound(*id))
    }

    /// End a session, dropping its inventory and pricing cache
    pub async fn end(&self, id: &Uuid) -> Result<(), StoreError> {
        let removed = self.sessions.write().await.remove(id);
        match removed {
            Some(_) => {
                info!(session_id = %id, "Session ended");
                Ok(())
            }
            None => Err(StoreError::SessionNotFound(*id)),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Remove sessions idle since before `now - idle_timeout`.
    ///
    /// Sessions whose lock is held are in use and kept.
    pub async fn evict_idle_at(&self, now: DateTime<Utc>) -> usize {
        let idle_timeout = self.config.idle_timeout();
        let mut sessions = self.sessions.write().await;
        let initial_count = sessions.len();

        sessions.retain(|_, session| match session.try_lock() {
            Ok(s) => !s.is_idle(now, idle_timeout),
            Err(_) => true,
        });

        let removed = initial_count - sessions.len();
        if removed > 0 {
            info!(removed, live_sessions = sessions.len(), "Evicted idle sessions");
        }
        removed
    }

    pub async fn evict_idle(&self) -> usize {
        self.evict_idle_at(Utc::now()).await
    }
}

/// Periodically evict idle sessions until the task is dropped
pub async fn run_idle_sweeper(store: Arc<SessionStore>) {
    let mut interval = tokio::time::interval(store.config().sweep_interval());
    info!("Idle session sweeper started");

    loop {
        interval.tick().await;
        store.evict_idle().await;
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Session capacity of {0} reached")]
    CapacityExceeded(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use ecocart_catalog::{Item, Persona, PersonaType};
    use ecocart_pricing::{
        FallbackPolicy, PriceSuggester, PricingEngine, PricingResult, PricingService, RuleTableSuggester, SuggestError,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Rule-table suggester that yields mid-call and counts invocations
    #[derive(Default)]
    struct SlowCountingSuggester {
        calls: AtomicUsize,
        inner: RuleTableSuggester,
    }

    #[async_trait]
    impl PriceSuggester for SlowCountingSuggester {
        fn name(&self) -> &'static str {
            "slow_counting"
        }

        async fn suggest(&self, item: &Item, persona: &Persona) -> Result<PricingResult, SuggestError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.inner.suggest(item, persona).await
        }
    }

    fn config(max_sessions: usize) -> SessionConfig {
        SessionConfig {
            max_sessions,
            ..SessionConfig::default()
        }
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let store = SessionStore::new(config(10));
        assert!(store.is_empty().await);

        let (id, session) = store.create().await.unwrap();
        assert_eq!(session.lock().await.inventory().len(), 2);
        assert!(Arc::ptr_eq(&store.get(&id).await.unwrap(), &session));

        store.end(&id).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap_err(), StoreError::SessionNotFound(id));
        assert_eq!(store.end(&id).await.unwrap_err(), StoreError::SessionNotFound(id));
    }

    #[tokio::test]
    async fn test_sessions_are_partitioned() {
        let store = SessionStore::new(config(10));
        let service = PricingService::local(PricingEngine::default());

        let (_, a) = store.create().await.unwrap();
        let (_, b) = store.create().await.unwrap();

        a.lock().await.select_persona(PersonaType::Loyal);
        a.lock().await.storefront(&service).await.unwrap();

        let b = b.lock().await;
        assert_eq!(b.persona().persona_type, PersonaType::Student);
        assert!(b.cache().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_storefronts_compute_each_key_once() {
        let store = Arc::new(SessionStore::new(config(10)));
        let suggester = Arc::new(SlowCountingSuggester::default());
        let service = Arc::new(PricingService::new(
            PricingEngine::default(),
            suggester.clone(),
            FallbackPolicy::RuleTable,
        ));
        let (id, _) = store.create().await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let service = service.clone();
                tokio::spawn(async move {
                    let session = store.get(&id).await.unwrap();
                    let mut session = session.lock().await;
                    session.storefront(&service).await.unwrap()
                })
            })
            .collect();

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }

        assert!(results.windows(2).all(|w| w[0] == w[1]));
        // Two demo items, one persona
        assert_eq!(suggester.calls.load(Ordering::SeqCst), 2);
        let stats = store.get(&id).await.unwrap().lock().await.cache().stats();
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.hits, 14);
    }

    #[tokio::test]
    async fn test_capacity_limit() {
        let store = SessionStore::new(config(1));
        store.create().await.unwrap();
        assert_eq!(store.create().await.unwrap_err(), StoreError::CapacityExceeded(1));
    }

    #[tokio::test]
    async fn test_idle_eviction_skips_busy_sessions() {
        let store = SessionStore::new(config(10));
        let (idle_id, _) = store.create().await.unwrap();
        let (busy_id, busy) = store.create().await.unwrap();

        let _guard = busy.lock().await;
        let later = Utc::now() + Duration::hours(1);

        assert_eq!(store.evict_idle_at(later).await, 1);
        assert!(store.get(&idle_id).await.is_err());
        assert!(store.get(&busy_id).await.is_ok());

        assert_eq!(store.evict_idle().await, 0);
    }
}
