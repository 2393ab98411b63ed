//! Exchange-rate gateway
//!
//! Proxies a base-currency rate request to the primary provider, falls
//! back to the backup provider on any failure, and finally serves a
//! static demo table so the endpoint never returns an empty mapping.
//! The caller learns which stage answered through [`RateSource`].

use anyhow::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use tracing::warn;

/// Which stage of the fallback chain produced the rates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    /// Live rates from the primary provider
    Primary,
    /// Live rates from the backup provider
    Backup,
    /// Hard-coded demo rates; both providers failed
    Static,
}

impl RateSource {
    /// Get the source name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            RateSource::Primary => "primary",
            RateSource::Backup => "backup",
            RateSource::Static => "static",
        }
    }
}

/// Configuration for the exchange-rate providers
#[derive(Debug, Clone)]
pub struct RateGatewayConfig {
    /// Primary provider endpoint, queried as `{url}?base={BASE}&places=6`
    pub primary_url: String,
    /// Backup provider endpoint, queried as `{url}/{base}.json`
    pub backup_url: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl RateGatewayConfig {
    /// Create a new RateGatewayConfig from environment variables
    ///
    /// # Environment Variables
    /// - `EXCHANGE_RATE_API_URL`: primary provider endpoint
    /// - `EXCHANGE_RATE_BACKUP_URL`: backup provider endpoint
    /// - `EXCHANGE_RATE_TIMEOUT_SECONDS`: per-request timeout (default: 10)
    pub fn from_env() -> Self {
        let primary_url = env::var("EXCHANGE_RATE_API_URL")
            .unwrap_or_else(|_| "https://api.exchangerate.host/latest".to_string());

        let backup_url = env::var("EXCHANGE_RATE_BACKUP_URL").unwrap_or_else(|_| {
            "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies"
                .to_string()
        });

        let timeout_seconds = env::var("EXCHANGE_RATE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        RateGatewayConfig {
            primary_url,
            backup_url,
            timeout_seconds,
        }
    }
}

/// Primary provider response shape
#[derive(Debug, Deserialize)]
struct PrimaryResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Exchange-rate gateway with a two-stage provider fallback
#[derive(Clone)]
pub struct RateGateway {
    client: reqwest::Client,
    config: RateGatewayConfig,
}

impl RateGateway {
    /// Create a new gateway from provider configuration
    pub fn new(config: RateGatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }

    /// Fetch rates for a base currency, never returning an empty mapping
    ///
    /// Returns the mapping together with the stage of the fallback chain
    /// that produced it; degradations are logged at warn level.
    pub async fn fetch_rates(&self, base: &str) -> (HashMap<String, f64>, RateSource) {
        match self.fetch_primary(base).await {
            Ok(rates) if !rates.is_empty() => return (rates, RateSource::Primary),
            Ok(_) => warn!("Primary rate provider returned no rates for {}", base),
            Err(e) => warn!("Primary rate provider failed for {}: {}", base, e),
        }

        match self.fetch_backup(base).await {
            Ok(rates) if !rates.is_empty() => return (rates, RateSource::Backup),
            Ok(_) => warn!("Backup rate provider returned no rates for {}", base),
            Err(e) => warn!("Backup rate provider failed for {}: {}", base, e),
        }

        warn!("Serving static fallback rates for {}", base);
        (static_rates(base), RateSource::Static)
    }

    async fn fetch_primary(&self, base: &str) -> Result<HashMap<String, f64>> {
        let url = format!("{}?base={}&places=6", self.config.primary_url, base);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("provider returned status {}", response.status());
        }

        let body: PrimaryResponse = response.json().await?;
        if !body.success {
            anyhow::bail!("provider reported failure");
        }

        Ok(body.rates)
    }

    async fn fetch_backup(&self, base: &str) -> Result<HashMap<String, f64>> {
        let base_lower = base.to_lowercase();
        let url = format!("{}/{}.json", self.config.backup_url, base_lower);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("provider returned status {}", response.status());
        }

        let body: serde_json::Value = response.json().await?;
        let table = body
            .get(&base_lower)
            .and_then(|value| value.as_object())
            .ok_or_else(|| anyhow::anyhow!("response is missing the {} table", base_lower))?;

        // The backup provider keys currencies in lowercase
        let rates = table
            .iter()
            .filter_map(|(code, rate)| rate.as_f64().map(|r| (code.to_uppercase(), r)))
            .collect();

        Ok(rates)
    }
}

/// Hard-coded demo rates served when both providers fail
fn static_rates(base: &str) -> HashMap<String, f64> {
    let table: &[(&str, f64)] = match base {
        "EUR" => &[("USD", 1.18), ("GBP", 0.86), ("JPY", 129.5)],
        "GBP" => &[("USD", 1.37), ("EUR", 1.16), ("JPY", 150.8)],
        // Any other base serves the USD table
        _ => &[("EUR", 0.85), ("GBP", 0.73), ("JPY", 110.0)],
    };

    table
        .iter()
        .map(|(code, rate)| (code.to_string(), *rate))
        .collect()
}
