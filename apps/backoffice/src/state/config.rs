//! # Configuration State
//!
//! Pricing defaults for new products, loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`MOSTRADOR_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::str::FromStr;

use mostrador_core::{Currency, DraftDefaults, IvaRate, MAX_OPEN_DRAFTS};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Back-office configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (shown in the window title)
    pub store_name: String,

    /// Currency preselected for a new product's cost
    pub default_currency: Currency,

    /// Markup preselected for a new product, as a fraction (0.30 = 30%)
    pub default_markup: Decimal,

    /// IVA bracket preselected for a new product
    pub default_iva_rate: IvaRate,

    /// Maximum product dialogs open at once
    pub max_open_drafts: usize,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Currency: ARS
    /// - Markup: 30%
    /// - IVA: general (21%)
    fn default() -> Self {
        ConfigState {
            store_name: "Mostrador".to_string(),
            default_currency: Currency::Ars,
            default_markup: Decimal::new(30, 2),
            default_iva_rate: IvaRate::General,
            max_open_drafts: MAX_OPEN_DRAFTS,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `MOSTRADOR_STORE_NAME`: Override store name
    /// - `MOSTRADOR_DEFAULT_CURRENCY`: `ARS` or `USD`
    /// - `MOSTRADOR_DEFAULT_MARKUP`: fraction, e.g. `0.35`
    /// - `MOSTRADOR_DEFAULT_IVA`: `exempt`, `reduced`, `general` or `increased`
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(store_name) = lookup("MOSTRADOR_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(value) = lookup("MOSTRADOR_DEFAULT_CURRENCY") {
            match Currency::from_str(&value) {
                Ok(currency) => config.default_currency = currency,
                Err(e) => warn!(%value, error = %e, "Ignoring MOSTRADOR_DEFAULT_CURRENCY"),
            }
        }

        if let Some(value) = lookup("MOSTRADOR_DEFAULT_MARKUP") {
            match Decimal::from_str(value.trim()) {
                Ok(markup) => config.default_markup = markup,
                Err(e) => warn!(%value, error = %e, "Ignoring MOSTRADOR_DEFAULT_MARKUP"),
            }
        }

        if let Some(value) = lookup("MOSTRADOR_DEFAULT_IVA") {
            match IvaRate::from_str(&value) {
                Ok(bracket) => config.default_iva_rate = bracket,
                Err(e) => warn!(%value, error = %e, "Ignoring MOSTRADOR_DEFAULT_IVA"),
            }
        }

        config
    }

    /// Defaults applied to a brand-new product draft.
    pub fn draft_defaults(&self) -> DraftDefaults {
        DraftDefaults {
            currency: self.default_currency,
            markup: self.default_markup,
            iva_rate: self.default_iva_rate.rate(),
        }
    }
}
