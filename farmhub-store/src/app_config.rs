use farmhub_core::CoreError;
use farmhub_shared::Masked;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub corrector: CorrectorConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

fn default_port() -> u16 { 8080 }

/// Connection settings for the hosted REST store.
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Project URL, e.g. `https://xyz.example.co`
    pub url: String,
    /// API key sent as the `apikey` header
    pub key: Masked<String>,
    /// Bearer token for the `Authorization` header; falls back to `key`.
    #[serde(default)]
    pub credentials: Option<Masked<String>>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_page_size() -> usize { 1000 }
fn default_request_timeout() -> u64 { 30 }

impl StoreConfig {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: Masked::new(key.into()),
            credentials: None,
            page_size: default_page_size(),
            request_timeout_secs: default_request_timeout(),
        }
    }

    pub fn bearer(&self) -> &Masked<String> {
        self.credentials.as_ref().unwrap_or(&self.key)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(CoreError::ValidationError("store.url is empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CoreError::ValidationError(format!(
                "store.url must be an http(s) URL, got {:?}",
                url
            )));
        }
        if self.key.expose().trim().is_empty() {
            return Err(CoreError::ValidationError("store.key is empty".into()));
        }
        if self.page_size == 0 {
            return Err(CoreError::ValidationError("store.page_size must be positive".into()));
        }
        Ok(())
    }
}

/// What to do with an order whose customer or route cannot be found.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingLookupPolicy {
    /// Price delivery at zero and correct the order accordingly
    #[default]
    FreeDelivery,
    /// Leave the order untouched
    Skip,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorrectorConfig {
    #[serde(default)]
    pub dry_run: bool,
    /// Largest stored-vs-computed fee difference still treated as equal
    #[serde(default = "default_tolerance")]
    pub tolerance: Decimal,
    #[serde(default)]
    pub on_missing_lookup: MissingLookupPolicy,
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            tolerance: default_tolerance(),
            on_missing_lookup: MissingLookupPolicy::default(),
        }
    }
}

fn default_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // FARMHUB__STORE__URL=... sets store.url
            .add_source(config::Environment::with_prefix("FARMHUB").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
