//! Sync connector: fetches live quotes from the external rate provider.
//!
//! The connector only fetches and normalizes; persisting the fetched rate
//! (rate update + observation append) is the caller's job. That keeps the
//! provider swappable and testable without touching persistence.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::config::settings::QuoteProviderSettings;
use crate::error::AppError;
use crate::models::{split_pair, CurrencyRate};

#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("quote request failed: {0}")]
    Transport(String),

    #[error("quote provider returned status {0}")]
    Status(u16),

    #[error("rate not found for {0}")]
    RateNotFound(String),

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

impl From<QuoteError> for AppError {
    fn from(err: QuoteError) -> Self {
        AppError::UpstreamError(err.to_string())
    }
}

/// External quote capability: given base and quote codes, return the live
/// quote-per-base rate or fail.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn get_rate(&self, base: &str, quote: &str) -> Result<f64, QuoteError>;
}

#[derive(Debug, Deserialize)]
struct QuotePayload {
    rates: HashMap<String, f64>,
}

/// HTTP implementation against an exchangerate-api style endpoint:
/// `GET {base_url}/v4/latest/{BASE}` returns `{"rates": {"EUR": 0.92, ...}}`.
pub struct HttpQuoteProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpQuoteProvider {
    pub fn new(settings: &QuoteProviderSettings) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl QuoteProvider for HttpQuoteProvider {
    async fn get_rate(&self, base: &str, quote: &str) -> Result<f64, QuoteError> {
        let url = format!("{}/v4/latest/{}", self.base_url, base);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| QuoteError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(QuoteError::Status(response.status().as_u16()));
        }

        let payload: QuotePayload = response
            .json()
            .await
            .map_err(|e| QuoteError::InvalidResponse(e.to_string()))?;

        payload
            .rates
            .get(quote)
            .copied()
            .ok_or_else(|| QuoteError::RateNotFound(format!("{}/{}", base, quote)))
    }
}

/// Splits a stored pair and asks the provider for one live quote.
#[derive(Clone)]
pub struct SyncConnector {
    provider: Arc<dyn QuoteProvider>,
}

impl SyncConnector {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self { provider }
    }

    pub async fn fetch_rate(&self, currency_rate: &CurrencyRate) -> Result<f64, AppError> {
        let (base, quote) = split_pair(&currency_rate.pair)?;

        let rate = self.provider.get_rate(base, quote).await.map_err(|e| {
            warn!("Quote fetch failed for {}: {}", currency_rate.pair, e);
            AppError::from(e)
        })?;

        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    struct FixedProvider(f64);

    #[async_trait]
    impl QuoteProvider for FixedProvider {
        async fn get_rate(&self, _base: &str, _quote: &str) -> Result<f64, QuoteError> {
            Ok(self.0)
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl QuoteProvider for FailingProvider {
        async fn get_rate(&self, base: &str, quote: &str) -> Result<f64, QuoteError> {
            Err(QuoteError::RateNotFound(format!("{}/{}", base, quote)))
        }
    }

    fn rate_row(pair: &str) -> CurrencyRate {
        CurrencyRate {
            id: Uuid::new_v4(),
            pair: pair.to_string(),
            rate: 1.0,
            last_updated: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_fetch_rate_returns_provider_value() {
        let connector = SyncConnector::new(Arc::new(FixedProvider(0.92)));
        let rate = connector.fetch_rate(&rate_row("USD/EUR")).await.unwrap();
        assert_eq!(rate, 0.92);
    }

    #[tokio::test]
    async fn test_missing_quote_maps_to_upstream_error() {
        let connector = SyncConnector::new(Arc::new(FailingProvider));
        let err = connector.fetch_rate(&rate_row("USD/EUR")).await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamError(_)));
    }

    #[test]
    fn test_http_provider_builds_from_default_settings() {
        let provider = HttpQuoteProvider::new(&QuoteProviderSettings::default());
        assert!(provider.is_ok());
    }

    #[tokio::test]
    async fn test_malformed_pair_is_validation_error() {
        let connector = SyncConnector::new(Arc::new(FixedProvider(1.0)));
        let err = connector.fetch_rate(&rate_row("USDEUR")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
