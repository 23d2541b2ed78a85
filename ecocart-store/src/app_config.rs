use serde::Deserialize;
use std::env;
use std::time::Duration;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use ecocart_pricing::{FallbackPolicy, RemoteSuggesterConfig};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub pricing: PricingSettings,
    pub suggester: SuggesterConfig,
    pub sessions: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PricingSettings {
    #[serde(default)]
    pub fallback: FallbackPolicy,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SuggesterBackend {
    Local,
    Remote,
}

#[derive(Deserialize, Clone)]
pub struct SuggesterConfig {
    pub backend: SuggesterBackend,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    pub temperature: f32,
}

impl std::fmt::Debug for SuggesterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggesterConfig")
            .field("backend", &self.backend)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("timeout_ms", &self.timeout_ms)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl SuggesterConfig {
    /// Settings for the remote suggester, or `None` when the local table
    /// is selected or no API key is available
    pub fn remote(&self) -> Option<RemoteSuggesterConfig> {
        if self.backend != SuggesterBackend::Remote {
            return None;
        }
        let api_key = self.api_key.clone().filter(|k| !k.trim().is_empty())?;

        Some(RemoteSuggesterConfig {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key,
            temperature: self.temperature,
            timeout: Duration::from_millis(self.timeout_ms),
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub seed_demo_inventory: bool,
    pub max_sessions: usize,
    pub idle_timeout_seconds: u64,
    pub sweep_interval_seconds: u64,
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.idle_timeout_seconds as i64)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds.max(1))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed_demo_inventory: true,
            max_sessions: 1000,
            idle_timeout_seconds: 1800,
            sweep_interval_seconds: 60,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Self::defaults()?
            // Start off by merging in the "default" configuration file
            .add_source(File::with_name("config/default").required(false))
            // Add in the current environment file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(File::with_name("config/local").required(false))
            // Eg.. `ECOCART__SERVER__PORT=9000` would set `server.port`
            .add_source(Environment::with_prefix("ECOCART").separator("__"))
            .build()?;

        let mut config: Config = s.try_deserialize()?;
        if config.suggester.api_key.is_none() {
            config.suggester.api_key = env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty());
        }
        Ok(config)
    }

    /// Built-in values so the service starts with no config files at all
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let sessions = SessionConfig::default();

        config::Config::builder()
            .set_default("server.port", 8080)?
            .set_default("pricing.fallback", "rule_table")?
            .set_default("suggester.backend", "local")?
            .set_default("suggester.base_url", "https://api.groq.com/openai/v1")?
            .set_default("suggester.model", "llama-3.3-70b-versatile")?
            .set_default("suggester.timeout_ms", 10_000)?
            .set_default("suggester.temperature", 0.1)?
            .set_default("sessions.seed_demo_inventory", sessions.seed_demo_inventory)?
            .set_default("sessions.max_sessions", sessions.max_sessions as u64)?
            .set_default("sessions.idle_timeout_seconds", sessions.idle_timeout_seconds)?
            .set_default("sessions.sweep_interval_seconds", sessions.sweep_interval_seconds)
    }
}
