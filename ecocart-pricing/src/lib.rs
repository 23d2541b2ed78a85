pub mod error;
pub mod models;
pub mod rules;
pub mod tagline;
pub mod engine;
pub mod suggester;
pub mod remote;
pub mod service;
pub mod cache;
pub mod session;

pub use error::{PricingError, SuggestError};
pub use models::{PriceSource, PricedItem, PricingResult};
pub use rules::{DiscountRule, DiscountTable};
pub use engine::PricingEngine;
pub use suggester::{PriceSuggester, RuleTableSuggester};
pub use remote::{RemoteSuggester, RemoteSuggesterConfig};
pub use service::{FallbackPolicy, PricingService};
pub use cache::{CacheKey, CacheStats, PricingCache};
pub use session::Session;
