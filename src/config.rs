use anyhow::{Context, Result};
use std::env;

/// Endpoints and keys for the backing platform, read from the
/// environment at startup.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Base URL of the document-store / auth / storage API
    pub api_url: String,
    /// Project API key sent with every request
    pub api_key: String,
    /// Geocoding endpoint
    pub geocode_url: String,
    /// Optional geocoding API key
    pub geocode_key: Option<String>,
}

impl PlatformConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_url: env::var("MARKET_API_URL").context("MARKET_API_URL is not set")?,
            api_key: env::var("MARKET_API_KEY").context("MARKET_API_KEY is not set")?,
            geocode_url: env::var("MARKET_GEOCODE_URL")
                .context("MARKET_GEOCODE_URL is not set")?,
            geocode_key: env::var("MARKET_GEOCODE_KEY").ok(),
        })
    }
}
