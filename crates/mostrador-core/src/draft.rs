//! # Product Drafts
//!
//! A draft is the pricing section of an open product dialog, held as an
//! explicit value owned by the caller.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Draft Lifecycle                                   │
//! │                                                                         │
//! │  "New product"  ──► ProductDraft::new(defaults)  ──┐                    │
//! │                                                    │                    │
//! │  "Edit product" ──► ProductDraft::from_product() ──┤                    │
//! │                                                    ▼                    │
//! │                                            ┌──────────────┐             │
//! │                     every keystroke ──────►│  apply(edit) │             │
//! │                     sale price blur ──────►│  blur()      │             │
//! │                                            └──────┬───────┘             │
//! │                                                   │                     │
//! │                     ┌─────────────────────────────┼──────────────┐      │
//! │                     ▼                                            ▼      │
//! │               Cancel: dropped                 Save: validate_submission │
//! │                                               → ProductPricePayload     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Drafts are plain serde values, so a caller that wants autosave can
//! serialize them wherever it likes. The engine never persists anything.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::reconcile::{on_field_change, on_sale_price_blur, reprice, FieldEdit, PricingState};
use crate::types::{Currency, PricingInputs, PricingResult};

// =============================================================================
// Stored Product Pricing
// =============================================================================

/// Pricing fields of a product as the product API stores them.
///
/// This is both the payload sent on save and the record an edit dialog is
/// seeded from. Decimals travel as JSON numbers on this boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductPricePayload {
    /// Unit cost in `currency`.
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub unit_price: Decimal,

    /// Currency of `unit_price`.
    pub currency: Currency,

    /// Markup fraction.
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub markup: Decimal,

    /// Sale price in ARS.
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub sale_price: Decimal,
}

// =============================================================================
// Draft
// =============================================================================

/// Defaults for a brand-new product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraftDefaults {
    pub currency: Currency,
    pub markup: Decimal,
    pub iva_rate: Decimal,
}

/// An open product dialog's pricing state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDraft {
    /// Draft identifier (UUID v4), distinct from the product id.
    pub id: String,

    /// Product being edited, `None` for a new product.
    pub product_id: Option<String>,

    /// Pricing section.
    pub pricing: PricingState,

    /// When the dialog was opened.
    #[ts(type = "string")]
    pub opened_at: DateTime<Utc>,
}

impl ProductDraft {
    /// Opens a draft for a new product. Unit cost starts at zero.
    pub fn new(defaults: DraftDefaults, exchange_rate: Option<Decimal>) -> Self {
        let inputs = PricingInputs {
            unit_cost: Decimal::ZERO,
            currency: defaults.currency,
            markup: defaults.markup,
            iva_rate: defaults.iva_rate,
            exchange_rate,
        };

        ProductDraft {
            id: Uuid::new_v4().to_string(),
            product_id: None,
            pricing: PricingState::new(inputs),
            opened_at: Utc::now(),
        }
    }

    /// Opens a draft seeded from an existing product record.
    ///
    /// The stored sale price is kept as is; see [`PricingState::from_stored`].
    pub fn from_product(
        product_id: impl Into<String>,
        stored: &ProductPricePayload,
        iva_rate: Decimal,
        exchange_rate: Option<Decimal>,
    ) -> Self {
        let inputs = PricingInputs {
            unit_cost: stored.unit_price,
            currency: stored.currency,
            markup: stored.markup,
            iva_rate,
            exchange_rate,
        };

        ProductDraft {
            id: Uuid::new_v4().to_string(),
            product_id: Some(product_id.into()),
            pricing: PricingState::from_stored(inputs, stored.sale_price),
            opened_at: Utc::now(),
        }
    }

    /// True for the edit dialog.
    pub fn is_edit(&self) -> bool {
        self.product_id.is_some()
    }

    /// Routes a field edit through the reconciliation dispatcher.
    pub fn apply(&mut self, edit: FieldEdit) -> PricingResult {
        on_field_change(&mut self.pricing, edit)
    }

    /// Sale-price field lost focus.
    pub fn blur_sale_price(&mut self) -> PricingResult {
        on_sale_price_blur(&mut self.pricing)
    }

    /// Feeds a refreshed exchange rate in, if it differs from the current one.
    ///
    /// Returns `None` when nothing changed.
    pub fn refresh_rate(&mut self, exchange_rate: Option<Decimal>) -> Option<PricingResult> {
        if self.pricing.inputs.exchange_rate == exchange_rate {
            return None;
        }
        self.pricing.inputs.exchange_rate = exchange_rate;
        Some(reprice(&mut self.pricing))
    }

    /// Current pricing snapshot.
    pub fn result(&self) -> PricingResult {
        self.pricing.result()
    }

    /// Flat payload, without validation. See
    /// [`crate::validation::validate_submission`].
    pub fn payload(&self) -> ProductPricePayload {
        ProductPricePayload {
            unit_price: self.pricing.inputs.unit_cost,
            currency: self.pricing.inputs.currency,
            markup: self.pricing.inputs.markup,
            sale_price: self.pricing.sale_price,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
