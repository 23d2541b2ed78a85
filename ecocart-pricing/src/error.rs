use ecocart_catalog::CatalogError;

/// Pricing-related errors
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Item not found: {0}")]
    ItemNotFound(u64),

    #[error("Invalid discount table: {0}")]
    InvalidRuleTable(String),
}

impl From<CatalogError> for PricingError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::InvalidInput(msg) => PricingError::InvalidInput(msg),
            CatalogError::NotFound(id) => PricingError::ItemNotFound(id),
        }
    }
}

/// Failures of a price suggestion backend.
///
/// These never reach the shopper; `PricingService` replaces them with
/// the fallback result.
#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    #[error("Suggestion backend rate limited the request")]
    RateLimited,

    #[error("Suggestion backend failed: {0}")]
    Backend(String),

    #[error("Malformed suggestion: {0}")]
    Malformed(String),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

impl From<reqwest::Error> for SuggestError {
    fn from(err: reqwest::Error) -> Self {
        if err.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS) {
            SuggestError::RateLimited
        } else {
            SuggestError::Backend(err.to_string())
        }
    }
}
