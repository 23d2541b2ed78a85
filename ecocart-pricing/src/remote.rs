use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write as _;
use std::time::Duration;
use tracing::debug;
use ecocart_catalog::{Item, Persona, PersonaType};
use crate::engine::apply_discount;
use crate::error::SuggestError;
use crate::models::{PriceSource, PricingResult};
use crate::rules::DiscountTable;
use crate::suggester::PriceSuggester;
use crate::tagline;

const MAX_TAGLINE_CHARS: usize = 120;

/// Connection settings for an OpenAI-compatible chat completions endpoint
#[derive(Clone)]
pub struct RemoteSuggesterConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl fmt::Debug for RemoteSuggesterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSuggesterConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"***")
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Asks a hosted language model for a price and tagline.
///
/// Responses are untrusted: anything that does not validate is returned
/// as `SuggestError::Malformed`. There are no retries.
pub struct RemoteSuggester {
    client: reqwest::Client,
    config: RemoteSuggesterConfig,
    table: DiscountTable,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct RawSuggestion {
    final_price: f64,
    discount_percent: i64,
    tagline: String,
}

impl RemoteSuggester {
    pub fn new(config: RemoteSuggesterConfig, table: DiscountTable) -> Result<Self, SuggestError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SuggestError::Backend(e.to_string()))?;

        Ok(Self { client, config, table })
    }

    pub fn config(&self) -> &RemoteSuggesterConfig {
        &self.config
    }

    /// Prompt sent to the model, embedding the full discount table so
    /// the model and the local fallback agree on the rules
    pub fn build_prompt(&self, item: &Item, persona: &Persona) -> String {
        let mut prompt = String::new();
        let _ = writeln!(prompt, "Act as a behavioral dynamic pricing algorithm. Return ONLY JSON.");
        let _ = writeln!(prompt);
        let _ = writeln!(prompt, "Item: {}", item.name);
        let _ = writeln!(prompt, "Condition: {}", item.condition_tier);
        let _ = writeln!(prompt, "Expiry: {}", item.expiry_tier);
        let _ = writeln!(prompt, "Base Price: ${:.2}", item.base_price_cents as f64 / 100.0);
        let _ = writeln!(prompt);
        let _ = writeln!(prompt, "User Persona: {}", persona.persona_type);
        let _ = writeln!(prompt, "User History: {}", persona.history);
        let _ = writeln!(prompt);
        let _ = writeln!(prompt, "DISCOUNT RULES (exact match on expiry, condition and persona):");

        for persona_type in PersonaType::ALL {
            let _ = writeln!(prompt, "- {}:", persona_type.label());
            for rule in self.table.rules().iter().filter(|r| r.persona == persona_type) {
                let _ = writeln!(
                    prompt,
                    "  * {} + {} = {}% off",
                    rule.expiry_tier, rule.condition_tier, rule.discount_percent
                );
            }
        }

        let _ = writeln!(prompt);
        let _ = writeln!(prompt, "TAGLINE RULES:");
        let _ = writeln!(prompt, "- 0% discount: \"{}\"", tagline::FRESH_QUALITY);
        let _ = writeln!(prompt, "- 1-15%: \"{}\"", tagline::SMART_SAVINGS);
        let _ = writeln!(prompt, "- 16-35%: \"{}\"", tagline::LIMITED_DEAL);
        let _ = writeln!(prompt, "- 36-50%: \"{}\"", tagline::BIG_VALUE);
        let _ = writeln!(prompt, "- 51-70%: \"{}\"", tagline::FOOD_RESCUE);
        let _ = writeln!(prompt, "- Deal hunters with 0-15%: \"{}\"", tagline::ENJOY_FRESH);
        let _ = writeln!(prompt);
        let _ = writeln!(prompt, "Calculate final_price by applying discount_percent to base_price. Round to 2 decimals.");
        let _ = writeln!(prompt, "discount_percent MUST be the table value for this item and persona.");
        let _ = writeln!(prompt, "JSON output format: {{\"final_price\": 0.00, \"discount_percent\": 0, \"tagline\": \"Short marketing text\"}}");
        prompt
    }
}

#[async_trait]
impl PriceSuggester for RemoteSuggester {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn suggest(&self, item: &Item, persona: &Persona) -> Result<PricingResult, SuggestError> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: self.build_prompt(item, persona),
            }],
            temperature: self.config.temperature,
            response_format: ResponseFormat { kind: "json_object" },
        };

        debug!(item = %item.name, persona = %persona.persona_type, "Requesting remote price suggestion");

        let response = self.client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SuggestError::RateLimited);
        }
        let response = response.error_for_status()?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| SuggestError::Malformed(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| SuggestError::Malformed("response has no message content".to_string()))?;

        self.parse_suggestion(item, persona, &content)
    }
}

impl RemoteSuggester {
    /// Validate a model's JSON answer against the item and persona it was
    /// asked about.
    ///
    /// The discount must equal the rule table's cell; the model only gets
    /// to choose the tagline. The returned final price is recomputed from
    /// the discount, so an accepted suggestion always satisfies the
    /// rounding invariant.
    pub fn parse_suggestion(
        &self,
        item: &Item,
        persona: &Persona,
        content: &str,
    ) -> Result<PricingResult, SuggestError> {
        let raw: RawSuggestion = serde_json::from_str(content)
            .map_err(|e| SuggestError::Malformed(format!("invalid suggestion JSON: {}", e)))?;

        let expected = self.table.lookup(item.expiry_tier, item.condition_tier, persona.persona_type);
        if raw.discount_percent != i64::from(expected) {
            return Err(SuggestError::Malformed(format!(
                "discount {}% does not match the {}% table rule",
                raw.discount_percent, expected
            )));
        }
        let discount_percent = expected;

        if !raw.final_price.is_finite() || raw.final_price < 0.0 {
            return Err(SuggestError::Malformed(format!("invalid final price {}", raw.final_price)));
        }

        let suggested_cents = raw.final_price * 100.0;
        if suggested_cents > item.base_price_cents as f64 + 0.5 {
            return Err(SuggestError::Malformed(format!(
                "final price {} exceeds base price",
                raw.final_price
            )));
        }

        let final_price_cents = apply_discount(item.base_price_cents, discount_percent)?;
        if (suggested_cents - final_price_cents as f64).abs() > 1.0 + 1e-6 {
            return Err(SuggestError::Malformed(format!(
                "final price {} does not match {}% off",
                raw.final_price, discount_percent
            )));
        }

        let tagline = raw.tagline.trim();
        if tagline.is_empty() || tagline.chars().count() > MAX_TAGLINE_CHARS {
            return Err(SuggestError::Malformed("tagline empty or too long".to_string()));
        }

        Ok(PricingResult {
            final_price_cents,
            discount_percent,
            tagline: tagline.to_string(),
            source: PriceSource::Suggested,
        })
    }
}
