use ecocart_catalog::{Item, Persona, MAX_BASE_PRICE_CENTS};
use crate::error::PricingError;
use crate::models::{PriceSource, PricingResult};
use crate::rules::DiscountTable;
use crate::tagline::{select_tagline, STANDARD_PRICE};

/// Deterministic table-driven pricing engine
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    table: DiscountTable,
}

impl PricingEngine {
    pub fn new(table: DiscountTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &DiscountTable {
        &self.table
    }

    /// Price an item for a persona.
    ///
    /// The persona's history is carried for display only and does not
    /// affect the result.
    pub fn price(&self, item: &Item, persona: &Persona) -> Result<PricingResult, PricingError> {
        validate(item)?;

        let discount_percent = self.table.lookup(item.expiry_tier, item.condition_tier, persona.persona_type);

        Ok(PricingResult {
            final_price_cents: apply_discount(item.base_price_cents, discount_percent)?,
            discount_percent,
            tagline: select_tagline(discount_percent, persona.persona_type).to_string(),
            source: PriceSource::RuleTable,
        })
    }

    /// Undiscounted price used when a backend fails under the
    /// standard-price fallback policy
    pub fn standard_price(&self, item: &Item) -> Result<PricingResult, PricingError> {
        validate(item)?;

        Ok(PricingResult {
            final_price_cents: item.base_price_cents,
            discount_percent: 0,
            tagline: STANDARD_PRICE.to_string(),
            source: PriceSource::StandardPrice,
        })
    }
}

fn validate(item: &Item) -> Result<(), PricingError> {
    if item.base_price_cents < 0 {
        return Err(PricingError::InvalidInput(format!(
            "item {} has negative base price {} cents",
            item.id, item.base_price_cents
        )));
    }
    if item.base_price_cents > MAX_BASE_PRICE_CENTS {
        return Err(PricingError::InvalidInput(format!(
            "item {} base price {} cents exceeds {}",
            item.id, item.base_price_cents, MAX_BASE_PRICE_CENTS
        )));
    }
    Ok(())
}

/// `round(base * (1 - discount/100), 2)` in cents, rounding half up
pub fn apply_discount(base_price_cents: i64, discount_percent: u8) -> Result<i64, PricingError> {
    let keep = 100 - i64::from(discount_percent.min(100));
    base_price_cents
        .checked_mul(keep)
        .and_then(|scaled| scaled.checked_add(50))
        .map(|scaled| scaled / 100)
        .ok_or_else(|| {
            PricingError::InvalidInput(format!(
                "base price {} cents overflows at {}% off",
                base_price_cents, discount_percent
            ))
        })
}
