use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use ecocart_catalog::{Item, Persona};
use crate::engine::PricingEngine;
use crate::error::{PricingError, SuggestError};
use crate::models::PricingResult;
use crate::suggester::{PriceSuggester, RuleTableSuggester};

/// What to show when the suggestion backend fails
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// The local discount table's answer
    #[default]
    RuleTable,
    /// Base price, no discount, "Standard Price"
    StandardPrice,
}

/// Prices items through a suggester, failing closed to the local engine
#[derive(Clone)]
pub struct PricingService {
    engine: PricingEngine,
    suggester: Arc<dyn PriceSuggester>,
    fallback: FallbackPolicy,
}

impl PricingService {
    pub fn new(engine: PricingEngine, suggester: Arc<dyn PriceSuggester>, fallback: FallbackPolicy) -> Self {
        Self { engine, suggester, fallback }
    }

    /// Deterministic service backed only by the discount table
    pub fn local(engine: PricingEngine) -> Self {
        let suggester = Arc::new(RuleTableSuggester::new(engine.clone()));
        Self::new(engine, suggester, FallbackPolicy::RuleTable)
    }

    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    pub fn suggester_name(&self) -> &'static str {
        self.suggester.name()
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    /// Price an item for a persona.
    ///
    /// Invalid input is rejected before the suggester is consulted.
    /// Suggester failures are logged and replaced by the fallback result.
    pub async fn price(&self, item: &Item, persona: &Persona) -> Result<PricingResult, PricingError> {
        let baseline = self.engine.price(item, persona)?;

        match self.suggester.suggest(item, persona).await {
            Ok(result) => Ok(result),
            Err(err) => {
                warn!(
                    suggester = self.suggester.name(),
                    item = %item.name,
                    persona = %persona.persona_type,
                    error = %err,
                    rate_limited = matches!(err, SuggestError::RateLimited),
                    "Price suggestion failed, using fallback"
                );
                match self.fallback {
                    FallbackPolicy::RuleTable => Ok(baseline),
                    FallbackPolicy::StandardPrice => self.engine.standard_price(item),
                }
            }
        }
    }
}
