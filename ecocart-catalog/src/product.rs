use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Time left before the product expires, discretized
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpiryTier {
    Fresh,
    Medium,
    HighRisk,
    Critical,
}

impl ExpiryTier {
    pub const ALL: [ExpiryTier; 4] = [
        ExpiryTier::Fresh,
        ExpiryTier::Medium,
        ExpiryTier::HighRisk,
        ExpiryTier::Critical,
    ];

    /// Label shown on the seller form
    pub fn label(&self) -> &'static str {
        match self {
            ExpiryTier::Fresh => "Fresh (1 Week)",
            ExpiryTier::Medium => "Medium (3 Days)",
            ExpiryTier::HighRisk => "High Risk (1 Day)",
            ExpiryTier::Critical => "Critical (4 Hours)",
        }
    }
}

impl fmt::Display for ExpiryTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExpiryTier {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "fresh" | "fresh1week" => Ok(ExpiryTier::Fresh),
            "medium" | "medium3days" => Ok(ExpiryTier::Medium),
            "highrisk" | "highrisk1day" => Ok(ExpiryTier::HighRisk),
            "critical" | "critical4hours" => Ok(ExpiryTier::Critical),
            _ => Err(CatalogError::InvalidInput(format!("unknown expiry tier: {:?}", s))),
        }
    }
}

/// Physical state of the product or its packaging
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionTier {
    Perfect,
    SlightlyBruised,
    DentedBox,
}

impl ConditionTier {
    pub const ALL: [ConditionTier; 3] = [
        ConditionTier::Perfect,
        ConditionTier::SlightlyBruised,
        ConditionTier::DentedBox,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ConditionTier::Perfect => "Perfect",
            ConditionTier::SlightlyBruised => "Slightly Bruised",
            ConditionTier::DentedBox => "Dented Box",
        }
    }
}

impl fmt::Display for ConditionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ConditionTier {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "perfect" => Ok(ConditionTier::Perfect),
            "slightlybruised" => Ok(ConditionTier::SlightlyBruised),
            "dentedbox" => Ok(ConditionTier::DentedBox),
            _ => Err(CatalogError::InvalidInput(format!("unknown condition tier: {:?}", s))),
        }
    }
}

/// Lowercase and drop everything but letters and digits, so that
/// `HIGH_RISK`, `HighRisk` and `High Risk (1 Day)` compare equal.
pub(crate) fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A grocery item on the shelf
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub base_price_cents: i64,
    pub expiry_tier: ExpiryTier,
    pub condition_tier: ConditionTier,
    pub icon: String,
    pub added_at: DateTime<Utc>,
}

impl Item {
    /// Materialize a validated draft under the given id
    pub fn from_draft(id: u64, draft: ItemDraft) -> Self {
        let icon = icon_for(&draft.name).to_string();
        Self {
            id,
            name: draft.name,
            category: draft.category,
            base_price_cents: draft.base_price_cents,
            expiry_tier: draft.expiry_tier,
            condition_tier: draft.condition_tier,
            icon,
            added_at: Utc::now(),
        }
    }
}

fn icon_for(name: &str) -> &'static str {
    if name.contains("Avocado") {
        "🥑"
    } else if name.contains("Milk") {
        "🥛"
    } else {
        "🍞"
    }
}

/// Seller input for adding or replacing an item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub category: String,
    pub base_price_cents: i64,
    pub expiry_tier: ExpiryTier,
    pub condition_tier: ConditionTier,
}

impl ItemDraft {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        base_price_cents: i64,
        expiry_tier: ExpiryTier,
        condition_tier: ConditionTier,
    ) -> Result<Self, CatalogError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(CatalogError::InvalidInput("item name must not be empty".to_string()));
        }
        if base_price_cents < 0 {
            return Err(CatalogError::InvalidInput(format!(
                "base price must not be negative, got {} cents",
                base_price_cents
            )));
        }
        if base_price_cents > MAX_BASE_PRICE_CENTS {
            return Err(CatalogError::InvalidInput(format!(
                "base price must not exceed {} cents, got {}",
                MAX_BASE_PRICE_CENTS, base_price_cents
            )));
        }

        let category = category.into().trim().to_string();
        Ok(Self {
            name,
            category: if category.is_empty() { "Groceries".to_string() } else { category },
            base_price_cents,
            expiry_tier,
            condition_tier,
        })
    }

    /// Build a draft from the raw strings and decimal price a form submits
    pub fn parse(
        name: &str,
        category: &str,
        base_price: f64,
        expiry_tier: &str,
        condition_tier: &str,
    ) -> Result<Self, CatalogError> {
        Self::new(
            name,
            category,
            price_to_cents(base_price)?,
            expiry_tier.parse()?,
            condition_tier.parse()?,
        )
    }
}

/// Largest accepted base price (one trillion dollars). Keeps discount
/// arithmetic in `i64` and cent conversion exact in `f64`.
pub const MAX_BASE_PRICE_CENTS: i64 = 100_000_000_000_000;

/// Convert a decimal price into cents, rounding half-up
pub fn price_to_cents(price: f64) -> Result<i64, CatalogError> {
    if !price.is_finite() || price < 0.0 {
        return Err(CatalogError::InvalidInput(format!("invalid base price: {}", price)));
    }
    if price * 100.0 > MAX_BASE_PRICE_CENTS as f64 {
        return Err(CatalogError::InvalidInput(format!("base price too large: {}", price)));
    }
    // Bias by a tiny epsilon so that 4.005 (stored as 4.00499..) still rounds up.
    Ok((price * 100.0 + 0.5 + 1e-9).floor() as i64)
}

pub fn cents_to_price(cents: i64) -> f64 {
    cents as f64 / 100.0
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Item not found: {0}")]
    NotFound(u64),
}
