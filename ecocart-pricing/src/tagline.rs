use ecocart_catalog::PersonaType;

pub const FRESH_QUALITY: &str = "Farm fresh, premium quality!";
pub const SMART_SAVINGS: &str = "Smart savings on great products!";
pub const LIMITED_DEAL: &str = "Limited time deal - grab it now!";
pub const BIG_VALUE: &str = "Incredible value - save big today!";
pub const FOOD_RESCUE: &str = "Save this food & your wallet!";
pub const ENJOY_FRESH: &str = "Best enjoyed fresh at full flavor!";
pub const STANDARD_PRICE: &str = "Standard Price";

/// Pick the marketing line for a discount.
///
/// Deal hunters with 15% or less are nudged to buy fresh instead of
/// waiting for a markdown.
pub fn select_tagline(discount_percent: u8, persona: PersonaType) -> &'static str {
    if persona == PersonaType::Strategic && discount_percent <= 15 {
        return ENJOY_FRESH;
    }

    match discount_percent {
        0 => FRESH_QUALITY,
        1..=15 => SMART_SAVINGS,
        16..=35 => LIMITED_DEAL,
        36..=50 => BIG_VALUE,
        _ => FOOD_RESCUE,
    }
}
