//! # Rates State
//!
//! Read side of the exchange rate feed.
//!
//! When the feed could not be started (bad config, no HTTP client) the
//! state is offline and every reader sees "no rate", which prices USD
//! costs as if they were ARS.

use mostrador_rates::{ExchangeRate, RateHandle, RatesError, RatesResult};
use rust_decimal::Decimal;

/// Exchange rate state shared by the pricing commands.
#[derive(Clone)]
pub struct RatesState {
    handle: Option<RateHandle>,
}

impl RatesState {
    /// Wraps a running feed.
    pub fn new(handle: RateHandle) -> Self {
        RatesState {
            handle: Some(handle),
        }
    }

    /// No feed; no rate is ever available.
    pub fn offline() -> Self {
        RatesState { handle: None }
    }

    pub fn is_online(&self) -> bool {
        self.handle.is_some()
    }

    /// Rate to price with, `None` while loading, failed, stale or offline.
    pub fn current_rate(&self) -> Option<Decimal> {
        self.handle.as_ref().and_then(RateHandle::current_rate)
    }

    /// Last fetched rate regardless of age.
    pub fn latest(&self) -> Option<ExchangeRate> {
        self.handle.as_ref().and_then(RateHandle::latest)
    }

    /// Asks the feed for an immediate refresh.
    pub async fn refresh_now(&self) -> RatesResult<()> {
        match &self.handle {
            Some(handle) => handle.refresh_now().await,
            None => Err(RatesError::ChannelError("Rate feed is offline".into())),
        }
    }

    /// Stops the feed, if any.
    pub async fn shutdown(&self) -> RatesResult<()> {
        match &self.handle {
            Some(handle) => handle.shutdown().await,
            None => Ok(()),
        }
    }
}
