use serde::{Deserialize, Serialize};
use ecocart_catalog::Item;

/// Where a price came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceSource {
    /// Local discount table
    RuleTable,
    /// Accepted suggestion from a remote backend
    Suggested,
    /// Undiscounted price after a backend failure
    StandardPrice,
}

/// Price shown to the shopper for one item under one persona
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PricingResult {
    pub final_price_cents: i64,
    pub discount_percent: u8,
    pub tagline: String,
    pub source: PriceSource,
}

impl PricingResult {
    pub fn final_price(&self) -> f64 {
        ecocart_catalog::product::cents_to_price(self.final_price_cents)
    }

    pub fn is_discounted(&self) -> bool {
        self.discount_percent > 0
    }
}

/// An inventory item together with its current price
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PricedItem {
    pub item: Item,
    pub pricing: PricingResult,
}
