//! # mostrador-rates: Exchange Rate Feed for Mostrador
//!
//! Keeps a current USD→ARS rate available to the back-office pricing
//! dialogs.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Rate Feed Architecture                           │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │  RatesConfig   │  │ HttpRateSource │  │       RateFeed         │    │
//! │  │                │  │                │  │                        │    │
//! │  │ rates.toml +   │─►│ GET {url}      │◄─│ Tokio task, refreshes  │    │
//! │  │ MOSTRADOR_*    │  │ { "rate": n }  │  │ on interval, retries   │    │
//! │  │ env overrides  │  │                │  │ with backoff           │    │
//! │  └────────────────┘  └────────────────┘  └───────────┬────────────┘    │
//! │                                                      │ watch            │
//! │                                                      ▼                  │
//! │                                          ┌────────────────────────┐    │
//! │                                          │      RateHandle        │    │
//! │                                          │ current_rate() → None  │    │
//! │                                          │ when missing or stale  │    │
//! │                                          └────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Rates configuration (endpoint, refresh schedule)
//! - [`error`] - Rate error types
//! - [`feed`] - Background refresh task and its handle
//! - [`source`] - `RateSource` trait and the HTTP implementation
//!
//! ## Usage
//! ```rust,ignore
//! let config = RatesConfig::load_or_default(None);
//! let source = HttpRateSource::new(&config.source)?;
//! let rates = RateFeed::new(source, config.refresh.clone()).start();
//!
//! // Later, when pricing a USD product:
//! let rate = rates.current_rate();
//! ```

pub mod config;
pub mod error;
pub mod feed;
pub mod source;

pub use config::{RatesConfig, RefreshSettings, SourceSettings};
pub use error::{RatesError, RatesResult};
pub use feed::{FeedCommand, RateFeed, RateHandle};
pub use source::{ExchangeRate, HttpRateSource, RateSource};
