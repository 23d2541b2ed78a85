use std::sync::Arc;
use anyhow::Context;
use ecocart_pricing::{
    DiscountTable, PriceSuggester, PricingEngine, PricingService, RemoteSuggester, RuleTableSuggester,
};
use ecocart_store::app_config::{Config, SuggesterBackend};
use ecocart_store::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub pricing: Arc<PricingService>,
}

impl AppState {
    pub fn new(sessions: SessionStore, pricing: PricingService) -> Self {
        Self {
            sessions: Arc::new(sessions),
            pricing: Arc::new(pricing),
        }
    }

    /// Wire the session store and pricing service from configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let engine = PricingEngine::new(DiscountTable::standard());

        let suggester: Arc<dyn PriceSuggester> = match config.suggester.remote() {
            Some(remote) => {
                tracing::info!(
                    base_url = %remote.base_url,
                    model = %remote.model,
                    "Using remote price suggester"
                );
                let suggester = RemoteSuggester::new(remote, engine.table().clone())
                    .context("Failed to build remote price suggester")?;
                Arc::new(suggester)
            }
            None => {
                if config.suggester.backend == SuggesterBackend::Remote {
                    tracing::warn!("Remote suggester selected but no API key configured, using the local rule table");
                }
                Arc::new(RuleTableSuggester::new(engine.clone()))
            }
        };

        let pricing = PricingService::new(engine, suggester, config.pricing.fallback);
        Ok(Self::new(SessionStore::new(config.sessions.clone()), pricing))
    }
}
