use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub suggestions: SuggestionSettings,
    #[serde(default)]
    pub payment: PaymentSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Which store implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

fn default_backend() -> StoreBackend { StoreBackend::Postgres }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_acquire_timeout() -> u64 { 5 }
fn default_idle_timeout() -> u64 { 300 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// How long the prompt catalog is served from memory
    #[serde(default = "default_prompt_ttl")]
    pub prompt_ttl_secs: u64,
    /// How long a redeemed payment signature is remembered
    #[serde(default = "default_redeemed_ttl")]
    pub redeemed_signature_ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            prompt_ttl_secs: default_prompt_ttl(),
            redeemed_signature_ttl_secs: default_redeemed_ttl(),
        }
    }
}

fn default_prompt_ttl() -> u64 { 300 }
fn default_redeemed_ttl() -> u64 { 86_400 }

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionSettings {
    #[serde(default = "default_min_age")]
    pub default_min_age: i32,
    #[serde(default = "default_max_age")]
    pub default_max_age: i32,
    #[serde(default = "default_prompt_answer_limit")]
    pub prompt_answer_limit: usize,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            default_min_age: default_min_age(),
            default_max_age: default_max_age(),
            prompt_answer_limit: default_prompt_answer_limit(),
        }
    }
}

fn default_min_age() -> i32 { crate::core::DEFAULT_MIN_AGE }
fn default_max_age() -> i32 { crate::core::DEFAULT_MAX_AGE }
fn default_prompt_answer_limit() -> usize { crate::core::selector::DEFAULT_PROMPT_ANSWER_LIMIT }

/// How a gated request gets paid for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    /// The client attaches a signature in the `X-PAYMENT` header
    Challenge,
    /// The server charges the wallet's escrow balance
    Escrow,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_payment_mode")]
    pub mode: PaymentMode,
    #[serde(default)]
    pub verifier_url: String,
    #[serde(default = "default_payment_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default = "default_network")]
    pub network: String,
    #[serde(default = "default_asset")]
    pub asset: String,
    #[serde(default)]
    pub pay_to: String,
    #[serde(default = "default_amount")]
    pub amount: String,
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: default_payment_mode(),
            verifier_url: String::new(),
            timeout_secs: default_payment_timeout(),
            scheme: default_scheme(),
            network: default_network(),
            asset: default_asset(),
            pay_to: String::new(),
            amount: default_amount(),
        }
    }
}

fn default_payment_mode() -> PaymentMode { PaymentMode::Challenge }
fn default_payment_timeout() -> u64 { 10 }
fn default_scheme() -> String { "exact".to_string() }
fn default_network() -> String { "solana-devnet".to_string() }
fn default_asset() -> String { "USDC".to_string() }
fn default_amount() -> String { "0.01".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration files (config/default.toml, config/local.toml)
    /// 3. Environment variables (prefixed with LUME__)
    /// 4. `DATABASE_URL`, when set
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Local overrides for development
            .add_source(File::with_name("config/local").required(false))
            // e.g., LUME__SERVER__PORT -> server.port
            .add_source(env_source());

        with_database_url(builder)?.build()?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source());

        with_database_url(builder)?.build()?.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("LUME")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// The conventional `DATABASE_URL` wins over file and prefixed settings
fn with_database_url(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) if !url.is_empty() => builder.set_override("database.url", url),
        _ => Ok(builder),
    }
}
