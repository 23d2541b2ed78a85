use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;
use ecocart_catalog::{ConditionTier, ExpiryTier, Item, Persona, PersonaType};
use crate::error::PricingError;
use crate::models::PricingResult;
use crate::service::PricingService;

/// Everything that can change a price. Item id and purchase history are
/// not part of the key, so a re-added item with the same attributes
/// reuses its entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub name: String,
    pub expiry_tier: ExpiryTier,
    pub condition_tier: ConditionTier,
    pub base_price_cents: i64,
    pub persona: PersonaType,
}

impl CacheKey {
    pub fn new(item: &Item, persona: &Persona) -> Self {
        Self {
            name: item.name.clone(),
            expiry_tier: item.expiry_tier,
            condition_tier: item.condition_tier,
            base_price_cents: item.base_price_cents,
            persona: persona.persona_type,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Session-lifetime memo of pricing results.
///
/// No TTL and no eviction; entries live until the cache is cleared or
/// the owning session ends. `get_or_compute` takes `&mut self`, so a
/// shared session's mutex is held across the whole check-then-insert.
#[derive(Debug, Default)]
pub struct PricingCache {
    entries: HashMap<CacheKey, PricingResult>,
    hits: u64,
    misses: u64,
}

impl PricingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, item: &Item, persona: &Persona) -> Option<&PricingResult> {
        self.entries.get(&CacheKey::new(item, persona))
    }

    /// Return the stored result for this item and persona, computing and
    /// storing it on first use. Errors are returned and not cached.
    pub async fn get_or_compute(
        &mut self,
        item: &Item,
        persona: &Persona,
        service: &PricingService,
    ) -> Result<PricingResult, PricingError> {
        let key = CacheKey::new(item, persona);

        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            debug!(item = %item.name, persona = %persona.persona_type, "Pricing cache hit");
            return Ok(hit.clone());
        }

        let result = service.price(item, persona).await?;
        self.misses += 1;
        debug!(
            item = %item.name,
            persona = %persona.persona_type,
            discount = result.discount_percent,
            "Pricing cache miss, stored result"
        );
        self.entries.insert(key, result.clone());
        Ok(result)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use ecocart_catalog::ItemDraft;
    use crate::engine::PricingEngine;
    use crate::error::SuggestError;
    use crate::service::tests::{CountingSuggester, FailingSuggester};
    use crate::service::FallbackPolicy;

    fn counting_service() -> (PricingService, Arc<CountingSuggester>) {
        let suggester = Arc::new(CountingSuggester::default());
        let service = PricingService::new(PricingEngine::default(), suggester.clone(), FallbackPolicy::RuleTable);
        (service, suggester)
    }

    fn item(cents: i64, condition: ConditionTier) -> Item {
        Item::from_draft(1, ItemDraft::new("Greek Yogurt", "Dairy", cents, ExpiryTier::HighRisk, condition).unwrap())
    }

    #[tokio::test]
    async fn test_identical_requests_compute_once() {
        let (service, suggester) = counting_service();
        let mut cache = PricingCache::new();
        let persona = Persona::select(PersonaType::Student);
        let yogurt = item(350, ConditionTier::Perfect);

        let first = cache.get_or_compute(&yogurt, &persona, &service).await.unwrap();
        let second = cache.get_or_compute(&yogurt, &persona, &service).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(suggester.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1, entries: 1 });
    }

    #[tokio::test]
    async fn test_key_sensitivity() {
        let (service, suggester) = counting_service();
        let mut cache = PricingCache::new();
        let persona = Persona::select(PersonaType::Loyal);

        cache.get_or_compute(&item(350, ConditionTier::Perfect), &persona, &service).await.unwrap();
        cache.get_or_compute(&item(400, ConditionTier::Perfect), &persona, &service).await.unwrap();
        cache.get_or_compute(&item(350, ConditionTier::DentedBox), &persona, &service).await.unwrap();
        cache
            .get_or_compute(&item(350, ConditionTier::Perfect), &Persona::select(PersonaType::Strategic), &service)
            .await
            .unwrap();

        assert_eq!(cache.len(), 4);
        assert_eq!(suggester.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_history_and_item_id_do_not_split_entries() {
        let (service, suggester) = counting_service();
        let mut cache = PricingCache::new();

        let yogurt = item(350, ConditionTier::Perfect);
        let mut readded = yogurt.clone();
        readded.id = 42;
        let mut persona = Persona::select(PersonaType::Student);

        cache.get_or_compute(&yogurt, &persona, &service).await.unwrap();
        persona.history = "Always Waits for Discounts".to_string();
        cache.get_or_compute(&readded, &persona, &service).await.unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(suggester.calls.load(Ordering::SeqCst), 1);
        assert!(cache.get(&readded, &persona).is_some());
    }

    #[tokio::test]
    async fn test_fallback_results_are_cached() {
        let service = PricingService::new(
            PricingEngine::default(),
            Arc::new(FailingSuggester(|| SuggestError::Backend("timeout".to_string()))),
            FallbackPolicy::StandardPrice,
        );
        let mut cache = PricingCache::new();
        let persona = Persona::default();
        let yogurt = item(350, ConditionTier::Perfect);

        let first = cache.get_or_compute(&yogurt, &persona, &service).await.unwrap();
        let second = cache.get_or_compute(&yogurt, &persona, &service).await.unwrap();
        assert_eq!(first.tagline, "Standard Price");
        assert_eq!(first, second);
        assert_eq!(cache.stats().misses, 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let (service, _) = counting_service();
        let mut cache = PricingCache::new();
        let mut bad = item(350, ConditionTier::Perfect);
        bad.base_price_cents = -350;

        assert!(cache.get_or_compute(&bad, &Persona::default(), &service).await.is_err());
        assert!(cache.is_empty());

        cache.get_or_compute(&item(350, ConditionTier::Perfect), &Persona::default(), &service).await.unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}
