//! # mostrador-core: Pure Pricing Logic for Mostrador
//!
//! This crate is the pricing engine behind the product dialogs of the
//! Mostrador back office. Everything here is a pure function over decimals.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Mostrador Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Back-office UI                               │   │
//! │  │    New product dialog        Edit product dialog                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON-lines IPC                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/backoffice commands                     │   │
//! │  │    open_new_product_draft, edit_draft_field, submit_draft ...   │   │
//! │  └───────────────┬─────────────────────────────────┬───────────────┘   │
//! │                  │                                 │                    │
//! │  ┌───────────────▼─────────────────┐  ┌────────────▼───────────────┐   │
//! │  │   ★ mostrador-core (HERE) ★     │  │   mostrador-rates          │   │
//! │  │                                 │  │   USD→ARS rate feed        │   │
//! │  │  pricing   reconcile   draft    │  │   (HTTP, refresh, backoff) │   │
//! │  │  validation   types             │  └────────────────────────────┘   │
//! │  │                                 │                                   │
//! │  │  NO I/O • NO LOGGING • TOTAL    │                                   │
//! │  └─────────────────────────────────┘                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Currency, IVA brackets, pricing inputs/results
//! - [`pricing`] - Currency normalizer, sale price and markup calculators
//! - [`reconcile`] - The AUTO/MANUAL reconciliation controller
//! - [`draft`] - Caller-owned product drafts and the product payload
//! - [`validation`] - Submission checks and form input parsing
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output
//! 2. **Exact Decimals**: `rust_decimal::Decimal`, never `f64`
//! 3. **Total Engine**: pricing never fails; only submission can be rejected
//! 4. **Explicit State**: the markup/price authority is an enum, not a focus flag
//!
//! ## Example Usage
//!
//! ```rust
//! use mostrador_core::draft::{DraftDefaults, ProductDraft};
//! use mostrador_core::reconcile::FieldEdit;
//! use mostrador_core::validation::validate_submission;
//! use mostrador_core::{Currency, IvaRate};
//! use rust_decimal::Decimal;
//!
//! let mut draft = ProductDraft::new(
//!     DraftDefaults {
//!         currency: Currency::Ars,
//!         markup: Decimal::new(30, 2),
//!         iva_rate: IvaRate::General.rate(),
//!     },
//!     None,
//! );
//!
//! draft.apply(FieldEdit::UnitCost(Decimal::from(1000)));
//! assert_eq!(draft.result().sale_price, Decimal::from(1600));
//!
//! let payload = validate_submission(&draft).unwrap();
//! assert_eq!(payload.sale_price, Decimal::from(1600));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod pricing;
pub mod reconcile;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use draft::{DraftDefaults, ProductDraft, ProductPricePayload};
pub use error::{CoreError, CoreResult, ValidationError};
pub use reconcile::{FieldEdit, PricingState};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of product dialogs open at once per back-office session.
///
/// Guards the draft map against a UI that opens drafts and never closes them.
pub const MAX_OPEN_DRAFTS: usize = 32;
