//! # Rate Sources
//!
//! Where a USD→ARS rate comes from.
//!
//! ## Wire Format
//! ```text
//! GET {url}
//!
//! 200 OK
//! { "rate": 1050.5 }
//! ```
//!
//! Any other status, a body without `rate`, or a rate that is zero or
//! negative is a failed fetch. The feed decides whether to retry.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SourceSettings;
use crate::error::{RatesError, RatesResult};

// =============================================================================
// Exchange Rate
// =============================================================================

/// A fetched rate and when it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// ARS per 1 USD. Always positive.
    pub rate: Decimal,

    /// When the rate was received.
    pub fetched_at: DateTime<Utc>,

    /// Name of the source that produced it.
    pub source: String,
}

impl ExchangeRate {
    /// Returns true when the rate is older than `max_age` at `now`.
    pub fn is_stale(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.fetched_at);
        match chrono::Duration::from_std(max_age) {
            Ok(max_age) => age > max_age,
            Err(_) => false,
        }
    }
}

/// Rejects rates that would make USD conversion meaningless.
pub fn check_rate(rate: Decimal) -> RatesResult<Decimal> {
    if rate <= Decimal::ZERO {
        return Err(RatesError::InvalidRate(rate.to_string()));
    }
    Ok(rate)
}

// =============================================================================
// Source Trait
// =============================================================================

/// Something that can produce the current USD→ARS rate.
pub trait RateSource: Send + Sync + 'static {
    /// Fetches the current rate. Implementations must return a positive rate
    /// or an error.
    fn fetch(&self) -> impl Future<Output = RatesResult<Decimal>> + Send;

    /// Short name used in logs and in [`ExchangeRate::source`].
    fn name(&self) -> &str;
}

// =============================================================================
// HTTP Source
// =============================================================================

#[derive(Debug, Deserialize)]
struct RateResponse {
    #[serde(with = "rust_decimal::serde::float")]
    rate: Decimal,
}

/// Fetches the rate from a JSON endpoint.
pub struct HttpRateSource {
    client: reqwest::Client,
    url: String,
    timeout_secs: u64,
}

impl HttpRateSource {
    /// Builds a source with its own client and the configured timeout.
    pub fn new(settings: &SourceSettings) -> RatesResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| RatesError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(HttpRateSource {
            client,
            url: settings.url.clone(),
            timeout_secs: settings.timeout_secs,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn map_request_error(&self, err: reqwest::Error) -> RatesError {
        if err.is_timeout() {
            RatesError::Timeout(self.timeout_secs)
        } else {
            err.into()
        }
    }
}

impl RateSource for HttpRateSource {
    async fn fetch(&self) -> RatesResult<Decimal> {
        debug!(url = %self.url, "Fetching exchange rate");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RatesError::UnexpectedStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_request_error(e))?;
        let parsed: RateResponse = serde_json::from_str(&body)?;

        check_rate(parsed.rate)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rate_response_parsing() {
        let parsed: RateResponse = serde_json::from_str(r#"{"rate": 1050.5}"#).unwrap();
        assert_eq!(parsed.rate, dec!(1050.5));

        let missing = serde_json::from_str::<RateResponse>(r#"{"value": 1}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn test_check_rate_rejects_non_positive() {
        assert!(check_rate(dec!(1000)).is_ok());
        assert!(matches!(check_rate(Decimal::ZERO), Err(RatesError::InvalidRate(_))));
        assert!(matches!(check_rate(dec!(-5)), Err(RatesError::InvalidRate(_))));
    }

    #[test]
    fn test_staleness() {
        let now = Utc::now();
        let rate = ExchangeRate {
            rate: dec!(1000),
            fetched_at: now - chrono::Duration::seconds(120),
            source: "test".into(),
        };

        assert!(rate.is_stale(Duration::from_secs(60), now));
        assert!(!rate.is_stale(Duration::from_secs(300), now));
    }

    #[test]
    fn test_http_source_keeps_url() {
        let settings = SourceSettings {
            url: "http://127.0.0.1:9/rate".into(),
            timeout_secs: 1,
        };
        let source = HttpRateSource::new(&settings).unwrap();
        assert_eq!(source.url(), "http://127.0.0.1:9/rate");
        assert_eq!(source.name(), "http");
    }
}
