//! # Exchange Rate Commands
//!
//! Lets the UI show which rate USD costs are converted with, and ask for
//! a refresh.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::RatesState;

/// Exchange rate as shown next to the currency selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateResponse {
    /// Rate pricing uses right now; `None` while loading, failed or stale.
    pub rate: Option<Decimal>,
    /// Last rate fetched, however old.
    pub last_rate: Option<Decimal>,
    pub fetched_at: Option<DateTime<Utc>>,
    /// A rate was fetched but is too old to use.
    pub stale: bool,
    /// The feed is running.
    pub online: bool,
}

/// Gets the current exchange rate status.
pub fn get_exchange_rate(rates: &RatesState) -> ExchangeRateResponse {
    debug!("get_exchange_rate command");

    let rate = rates.current_rate();
    let latest = rates.latest();

    ExchangeRateResponse {
        rate,
        last_rate: latest.as_ref().map(|r| r.rate),
        fetched_at: latest.as_ref().map(|r| r.fetched_at),
        stale: latest.is_some() && rate.is_none(),
        online: rates.is_online(),
    }
}

/// Asks the feed to fetch the rate now.
///
/// Returns as soon as the request is queued; the new rate shows up in
/// later responses.
pub async fn refresh_exchange_rate(rates: &RatesState) -> Result<(), ApiError> {
    debug!("refresh_exchange_rate command");
    rates.refresh_now().await?;
    Ok(())
}
