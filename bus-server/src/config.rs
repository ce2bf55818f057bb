//! Process configuration.
//!
//! Settings come from environment variables, read once at startup. Blank
//! values are treated as unset.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tracing::info;

use crate::provider::{BusProvider, MockProfile, MockProvider, RedBusProvider, TransportApiProvider};
use crate::transport::TransportError;

pub const ADDR_VAR: &str = "BUS_SERVER_ADDR";
pub const REDBUS_KEY_VAR: &str = "REDBUS_API_KEY";
pub const RAPIDAPI_KEY_VAR: &str = "RAPIDAPI_KEY";
pub const MOCK_PROVIDERS_VAR: &str = "BUS_MOCK_PROVIDERS";

const DEFAULT_PORT: u16 = 8080;

/// Error from loading configuration or building providers.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddr { var: &'static str, value: String },

    #[error("{var} must be true or false, got {value}")]
    InvalidFlag { var: &'static str, value: String },

    /// A live provider's HTTP client could not be built
    #[error("failed to create provider client: {0}")]
    Provider(#[from] TransportError),
}

/// Server and provider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub addr: SocketAddr,

    /// Enables the live RedBus provider
    pub redbus_api_key: Option<String>,

    /// Enables the live RapidAPI transport provider
    pub rapidapi_key: Option<String>,

    /// Whether the three synthetic platforms are registered
    pub mock_providers: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)))
    }
}

impl AppConfig {
    /// Mock providers only, listening on `addr`.
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            redbus_api_key: None,
            rapidapi_key: None,
            mock_providers: true,
        }
    }

    pub fn with_redbus_key(mut self, key: impl Into<String>) -> Self {
        self.redbus_api_key = Some(key.into());
        self
    }

    pub fn with_rapidapi_key(mut self, key: impl Into<String>) -> Self {
        self.rapidapi_key = Some(key.into());
        self
    }

    pub fn with_mock_providers(mut self, enabled: bool) -> Self {
        self.mock_providers = enabled;
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        if let Some(value) = get(ADDR_VAR) {
            config.addr = value.parse().map_err(|_| ConfigError::InvalidAddr {
                var: ADDR_VAR,
                value: value.clone(),
            })?;
        }
        config.redbus_api_key = get(REDBUS_KEY_VAR);
        config.rapidapi_key = get(RAPIDAPI_KEY_VAR);
        if let Some(value) = get(MOCK_PROVIDERS_VAR) {
            config.mock_providers = parse_flag(MOCK_PROVIDERS_VAR, &value)?;
        }

        Ok(config)
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: value.to_string(),
        }),
    }
}

/// Assemble the provider list in registration order: the synthetic
/// platforms first, then every live provider whose key is configured.
pub fn build_providers(config: &AppConfig) -> Result<Vec<Arc<dyn BusProvider>>, ConfigError> {
    let mut providers: Vec<Arc<dyn BusProvider>> = Vec::new();

    if config.mock_providers {
        for profile in MockProfile::builtin() {
            providers.push(Arc::new(MockProvider::new(profile)));
        }
    }
    if let Some(key) = &config.redbus_api_key {
        providers.push(Arc::new(RedBusProvider::new(key.as_str())?));
    }
    if let Some(key) = &config.rapidapi_key {
        providers.push(Arc::new(TransportApiProvider::new(key.as_str())?));
    }

    for provider in &providers {
        let identity = provider.identity();
        info!(
            provider = %identity,
            platform = %identity.platform,
            kind = ?identity.kind,
            "registered provider"
        );
    }

    Ok(providers)
}
