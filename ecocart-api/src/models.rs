use serde::Serialize;
use ecocart_catalog::product::cents_to_price;
use ecocart_catalog::{ConditionTier, ExpiryTier, Item, Persona, PersonaType};
use ecocart_pricing::{PriceSource, PricedItem};

// ============================================================================
// Response Types shared by the handlers
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub base_price: f64,
    pub expiry_tier: ExpiryTier,
    pub expiry_label: &'static str,
    pub condition_tier: ConditionTier,
    pub condition_label: &'static str,
    pub icon: String,
}

impl From<&Item> for ItemResponse {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            category: item.category.clone(),
            base_price: cents_to_price(item.base_price_cents),
            expiry_tier: item.expiry_tier,
            expiry_label: item.expiry_tier.label(),
            condition_tier: item.condition_tier,
            condition_label: item.condition_tier.label(),
            icon: item.icon.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PersonaResponse {
    pub persona_type: PersonaType,
    pub label: &'static str,
    pub history: String,
}

impl From<&Persona> for PersonaResponse {
    fn from(persona: &Persona) -> Self {
        Self {
            persona_type: persona.persona_type,
            label: persona.persona_type.label(),
            history: persona.history.clone(),
        }
    }
}

/// One product card: the item, its price and the badge to show
#[derive(Debug, Serialize)]
pub struct PricedItemResponse {
    pub item: ItemResponse,
    pub final_price: f64,
    pub discount_percent: u8,
    pub on_sale: bool,
    pub tagline: String,
    pub source: PriceSource,
}

impl From<&PricedItem> for PricedItemResponse {
    fn from(priced: &PricedItem) -> Self {
        Self {
            item: ItemResponse::from(&priced.item),
            final_price: priced.pricing.final_price(),
            discount_percent: priced.pricing.discount_percent,
            on_sale: priced.pricing.is_discounted(),
            tagline: priced.pricing.tagline.clone(),
            source: priced.pricing.source,
        }
    }
}
