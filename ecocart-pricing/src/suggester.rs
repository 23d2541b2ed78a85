use async_trait::async_trait;
use ecocart_catalog::{Item, Persona};
use crate::engine::PricingEngine;
use crate::error::SuggestError;
use crate::models::PricingResult;

/// Source of price suggestions for an item and shopper.
///
/// Implementations may be remote and unreliable; callers treat every
/// error as a signal to fall back, never as a pricing failure.
#[async_trait]
pub trait PriceSuggester: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    async fn suggest(&self, item: &Item, persona: &Persona) -> Result<PricingResult, SuggestError>;
}

/// Suggests exactly what the local discount table says
#[derive(Debug, Clone, Default)]
pub struct RuleTableSuggester {
    engine: PricingEngine,
}

impl RuleTableSuggester {
    pub fn new(engine: PricingEngine) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl PriceSuggester for RuleTableSuggester {
    fn name(&self) -> &'static str {
        "rule_table"
    }

    async fn suggest(&self, item: &Item, persona: &Persona) -> Result<PricingResult, SuggestError> {
        Ok(self.engine.price(item, persona)?)
    }
}
