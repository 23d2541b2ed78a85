use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;
use ecocart_catalog::{Inventory, Item, ItemDraft, Persona, PersonaType};
use crate::cache::PricingCache;
use crate::error::PricingError;
use crate::models::PricedItem;
use crate::service::PricingService;

/// Everything one shopper's visit owns: the inventory they see, the
/// persona they picked, and the prices computed so far.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    inventory: Inventory,
    persona: Persona,
    cache: PricingCache,
    created_at: DateTime<Utc>,
    last_active_at: DateTime<Utc>,
}

impl Session {
    pub fn new(seed_demo_inventory: bool) -> Self {
        let now = Utc::now();
        let inventory = if seed_demo_inventory {
            Inventory::with_demo_items()
        } else {
            Inventory::new()
        };

        Self {
            id: Uuid::new_v4(),
            inventory,
            persona: Persona::default(),
            cache: PricingCache::new(),
            created_at: now,
            last_active_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_active_at(&self) -> DateTime<Utc> {
        self.last_active_at
    }

    pub fn touch(&mut self) {
        self.last_active_at = Utc::now();
    }

    pub fn is_idle(&self, now: DateTime<Utc>, idle_timeout: Duration) -> bool {
        now - self.last_active_at > idle_timeout
    }

    pub fn add_or_replace_item(&mut self, draft: ItemDraft) -> Item {
        self.touch();
        self.inventory.add_or_replace(draft)
    }

    /// Items, most recently added first
    pub fn inventory(&self) -> &[Item] {
        self.inventory.list()
    }

    pub fn select_persona(&mut self, persona_type: PersonaType) -> &Persona {
        self.touch();
        self.persona = Persona::select(persona_type);
        info!(session_id = %self.id, persona = %persona_type, "Persona selected");
        &self.persona
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn cache(&self) -> &PricingCache {
        &self.cache
    }

    /// Price every item on the shelf for the current persona
    pub async fn storefront(&mut self, service: &PricingService) -> Result<Vec<PricedItem>, PricingError> {
        self.touch();
        let mut priced = Vec::with_capacity(self.inventory.len());

        for item in self.inventory.list() {
            let pricing = self.cache.get_or_compute(item, &self.persona, service).await?;
            priced.push(PricedItem { item: item.clone(), pricing });
        }

        Ok(priced)
    }

    /// Price one item, optionally as a persona other than the current one
    pub async fn price_item(
        &mut self,
        item_id: u64,
        persona_type: Option<PersonaType>,
        service: &PricingService,
    ) -> Result<PricedItem, PricingError> {
        self.touch();
        let item = self.inventory.get(item_id)?;
        let persona = match persona_type {
            Some(t) if t != self.persona.persona_type => Persona::select(t),
            _ => self.persona.clone(),
        };

        let pricing = self.cache.get_or_compute(item, &persona, service).await?;
        Ok(PricedItem { item: item.clone(), pricing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecocart_catalog::{ConditionTier, ExpiryTier};
    use crate::engine::PricingEngine;

    fn service() -> PricingService {
        PricingService::local(PricingEngine::default())
    }

    #[tokio::test]
    async fn test_demo_storefront_for_each_persona() {
        let service = service();
        let mut session = Session::new(true);
        assert_eq!(session.persona().persona_type, PersonaType::Student);

        // Organic Milk is fresh and perfect, bread is medium/perfect
        let student = session.storefront(&service).await.unwrap();
        assert_eq!(student[0].item.name, "Organic Milk");
        assert_eq!(student[0].pricing.discount_percent, 0);
        assert_eq!(student[1].pricing.discount_percent, 10);
        assert_eq!(student[1].pricing.final_price_cents, 405);

        session.select_persona(PersonaType::Loyal);
        let loyal = session.storefront(&service).await.unwrap();
        assert_eq!(loyal[1].pricing.discount_percent, 15);

        session.select_persona(PersonaType::Strategic);
        let strategic = session.storefront(&service).await.unwrap();
        assert_eq!(strategic[1].pricing.discount_percent, 0);
        assert_eq!(strategic[1].pricing.tagline, "Best enjoyed fresh at full flavor!");

        assert_eq!(session.cache().len(), 6);
    }

    #[tokio::test]
    async fn test_switching_back_reuses_cache() {
        let service = service();
        let mut session = Session::new(true);

        session.storefront(&service).await.unwrap();
        session.select_persona(PersonaType::Loyal);
        session.storefront(&service).await.unwrap();
        session.select_persona(PersonaType::Student);
        session.storefront(&service).await.unwrap();

        let stats = session.cache().stats();
        assert_eq!(stats.misses, 4);
        assert_eq!(stats.hits, 2);
    }

    #[tokio::test]
    async fn test_edit_then_price() {
        let service = service();
        let mut session = Session::new(false);
        assert!(session.inventory().is_empty());

        let draft = ItemDraft::new("Organic Milk", "Dairy", 500, ExpiryTier::Critical, ConditionTier::Perfect).unwrap();
        let milk = session.add_or_replace_item(draft);

        let loyal = session.price_item(milk.id, Some(PersonaType::Loyal), &service).await.unwrap();
        assert_eq!(loyal.pricing.final_price_cents, 250);
        assert_eq!(loyal.pricing.tagline, "Incredible value - save big today!");

        // The override does not change the selected persona
        assert_eq!(session.persona().persona_type, PersonaType::Student);

        let missing = session.price_item(999, None, &service).await.unwrap_err();
        assert_eq!(missing, PricingError::ItemNotFound(999));
    }

    #[test]
    fn test_idle_detection() {
        let session = Session::new(false);
        let later = session.last_active_at() + Duration::minutes(31);
        assert!(session.is_idle(later, Duration::minutes(30)));
        assert!(!session.is_idle(session.last_active_at(), Duration::minutes(30)));
        assert!(session.created_at() <= session.last_active_at());
    }
}
