//! # Rate Feed
//!
//! Background task that keeps the latest USD→ARS rate published.
//!
//! ## Task Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Rate Feed                                    │
//! │                                                                         │
//! │  ┌──────────────┐   refresh_now / shutdown    ┌──────────────────────┐ │
//! │  │  RateHandle  │ ──────── mpsc ────────────► │   RateFeed::run      │ │
//! │  │  (cloneable) │                             │                      │ │
//! │  │              │ ◄─────── watch ──────────── │  interval tick       │ │
//! │  │ current_rate │    Option<ExchangeRate>     │  fetch + backoff     │ │
//! │  └──────────────┘                             └──────────┬───────────┘ │
//! │                                                          │             │
//! │                                                          ▼             │
//! │                                                   ┌─────────────┐      │
//! │                                                   │ RateSource  │      │
//! │                                                   └─────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed refresh keeps the previous rate. Readers that go through
//! [`RateHandle::current_rate`] stop seeing it once it is older than the
//! configured maximum age, at which point pricing falls back to treating
//! USD amounts as ARS.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::RefreshSettings;
use crate::error::{RatesError, RatesResult};
use crate::source::{ExchangeRate, RateSource};

// =============================================================================
// Commands
// =============================================================================

/// Commands that can be sent to the feed task.
#[derive(Debug)]
pub enum FeedCommand {
    /// Fetch now instead of waiting for the next tick.
    RefreshNow,
    /// Stop the feed.
    Shutdown,
}

// =============================================================================
// Handle
// =============================================================================

/// Handle for reading the published rate and steering the feed.
#[derive(Clone)]
pub struct RateHandle {
    rate_rx: watch::Receiver<Option<ExchangeRate>>,
    cmd_tx: mpsc::Sender<FeedCommand>,
    max_age: Duration,
}

impl RateHandle {
    /// Last rate fetched, however old.
    pub fn latest(&self) -> Option<ExchangeRate> {
        self.rate_rx.borrow().clone()
    }

    /// Rate to price with, or `None` when missing or stale.
    pub fn current_rate(&self) -> Option<Decimal> {
        let now = Utc::now();
        self.rate_rx
            .borrow()
            .as_ref()
            .filter(|rate| !rate.is_stale(self.max_age, now))
            .map(|rate| rate.rate)
    }

    /// Maximum age before a rate stops being used.
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Subscribes to rate changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<ExchangeRate>> {
        self.rate_rx.clone()
    }

    /// Waits for the next published rate.
    pub async fn wait_for_update(&mut self) -> RatesResult<Option<ExchangeRate>> {
        self.rate_rx
            .changed()
            .await
            .map_err(|_| RatesError::ChannelError("Rate feed stopped".into()))?;
        Ok(self.rate_rx.borrow_and_update().clone())
    }

    /// Asks the feed to fetch immediately.
    pub async fn refresh_now(&self) -> RatesResult<()> {
        self.cmd_tx
            .send(FeedCommand::RefreshNow)
            .await
            .map_err(|_| RatesError::ChannelError("Rate feed command channel closed".into()))
    }

    /// Stops the feed task.
    pub async fn shutdown(&self) -> RatesResult<()> {
        self.cmd_tx
            .send(FeedCommand::Shutdown)
            .await
            .map_err(|_| RatesError::ChannelError("Rate feed command channel closed".into()))
    }
}

// =============================================================================
// Feed
// =============================================================================

/// Periodically fetches the rate from a [`RateSource`].
pub struct RateFeed<S: RateSource> {
    source: Arc<S>,
    settings: RefreshSettings,
    rate_tx: watch::Sender<Option<ExchangeRate>>,
}

impl<S: RateSource> RateFeed<S> {
    pub fn new(source: S, settings: RefreshSettings) -> Self {
        let (rate_tx, _) = watch::channel(None);
        RateFeed {
            source: Arc::new(source),
            settings,
            rate_tx,
        }
    }

    /// Spawns the feed loop and returns a handle.
    ///
    /// The first fetch happens immediately.
    pub fn start(self) -> RateHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(16);

        let handle = RateHandle {
            rate_rx: self.rate_tx.subscribe(),
            cmd_tx,
            max_age: self.settings.max_age(),
        };

        tokio::spawn(async move {
            self.run(cmd_rx).await;
        });

        handle
    }

    /// Main feed loop.
    async fn run(self, mut cmd_rx: mpsc::Receiver<FeedCommand>) {
        info!(
            source = self.source.name(),
            interval_secs = self.settings.interval_secs,
            max_age_secs = self.settings.max_age_secs,
            "Rate feed started"
        );

        let mut ticker = interval(self.settings.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let flow = tokio::select! {
                cmd = cmd_rx.recv() => match cmd {
                    Some(FeedCommand::RefreshNow) => {
                        debug!("Manual rate refresh requested");
                        let flow = self.refresh(&mut cmd_rx).await;
                        ticker.reset();
                        flow
                    }
                    Some(FeedCommand::Shutdown) | None => ControlFlow::Break(()),
                },
                _ = ticker.tick() => self.refresh(&mut cmd_rx).await,
            };

            if flow.is_break() {
                break;
            }
        }

        info!("Rate feed shutting down");
    }

    /// One refresh, retrying transport failures with backoff.
    ///
    /// Breaks if a shutdown arrives while waiting between attempts.
    async fn refresh(&self, cmd_rx: &mut mpsc::Receiver<FeedCommand>) -> ControlFlow<()> {
        let mut backoff = self.create_backoff();
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            let err = match self.source.fetch().await {
                Ok(rate) => {
                    self.publish(rate);
                    return ControlFlow::Continue(());
                }
                Err(e) => e,
            };

            if !err.is_retryable() || attempt > self.settings.max_retries {
                error!(error = %err, attempt, "Rate refresh failed, keeping previous rate");
                return ControlFlow::Continue(());
            }

            let Some(wait) = backoff.next_backoff() else {
                error!(error = %err, "Backoff exhausted");
                return ControlFlow::Continue(());
            };

            warn!(error = %err, attempt, ?wait, "Rate fetch failed, retrying");

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                cmd = cmd_rx.recv() => match cmd {
                    Some(FeedCommand::RefreshNow) => {
                        debug!("Refresh requested during backoff, retrying now");
                    }
                    Some(FeedCommand::Shutdown) | None => {
                        info!("Shutdown during backoff");
                        return ControlFlow::Break(());
                    }
                },
            }
        }
    }

    fn publish(&self, rate: Decimal) {
        info!(%rate, source = self.source.name(), "Exchange rate updated");
        self.rate_tx.send_replace(Some(ExchangeRate {
            rate,
            fetched_at: Utc::now(),
            source: self.source.name().to_string(),
        }));
    }

    fn create_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.settings.initial_backoff(),
            max_interval: self.settings.max_backoff(),
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}
