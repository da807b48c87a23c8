//! # Reconciliation Controller
//!
//! Keeps unit cost, currency, IVA, markup and sale price consistent while the
//! user edits any one of them.
//!
//! ## One Dispatcher
//! Every field edit, from the new-product form and the edit-product form
//! alike, goes through [`on_field_change`]. The authority toggle lives in
//! [`PricingState::authority`] instead of being inferred from focus events.
//!
//! ## Edit Routing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Edit                      AUTO                      MANUAL            │
//! │  ────────────────────      ────────────────────      ─────────────────  │
//! │  unit_cost / currency /    recompute sale_price      recompute markup   │
//! │  iva_rate / exch. rate     (markup fixed)            (sale_price fixed) │
//! │                                                                         │
//! │  markup                    store markup,             → AUTO, recompute  │
//! │                            recompute sale_price      sale_price         │
//! │                                                                         │
//! │  sale_price (> 0)          → MANUAL, recompute       recompute markup   │
//! │                            markup                                       │
//! │                                                                         │
//! │  sale_price ("" or 0)      → MANUAL, pending: nothing is recomputed     │
//! │                            until a real value arrives or the field blurs│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mostrador_core::reconcile::{on_field_change, FieldEdit, PricingState};
//! use mostrador_core::{Currency, PricingInputs};
//! use rust_decimal::Decimal;
//!
//! let mut state = PricingState::new(PricingInputs {
//!     unit_cost: Decimal::from(1000),
//!     currency: Currency::Ars,
//!     markup: Decimal::new(30, 2),
//!     iva_rate: Decimal::new(21, 2),
//!     exchange_rate: None,
//! });
//! assert_eq!(state.sale_price, Decimal::from(1600));
//!
//! // The user types a price: the markup follows.
//! let result = on_field_change(&mut state, FieldEdit::SalePrice(Some(Decimal::from(2000))));
//! assert!(result.manual_override);
//! assert_eq!(result.markup, Decimal::new(6529, 4));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::pricing::{clamp_markup, markup_for, sale_price_for};
use crate::types::{Currency, PriceAuthority, PricingInputs, PricingResult};

// =============================================================================
// Field Edits
// =============================================================================

/// A single edit coming from the pricing section of the product form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldEdit {
    /// New unit cost (in the draft's currency).
    UnitCost(#[ts(type = "string")] Decimal),

    /// New markup fraction.
    Markup(#[ts(type = "string")] Decimal),

    /// New sale price. `None` means the field was cleared.
    SalePrice(#[ts(type = "string | null")] Option<Decimal>),

    /// New cost currency.
    Currency(Currency),

    /// New IVA fraction.
    IvaRate(#[ts(type = "string")] Decimal),

    /// Exchange rate refreshed (or lost) while the form is open.
    ExchangeRate(#[ts(type = "string | null")] Option<Decimal>),
}

impl FieldEdit {
    /// Name of the edited field, as used in logs and the payload.
    pub const fn field_name(&self) -> &'static str {
        match self {
            FieldEdit::UnitCost(_) => "unit_cost",
            FieldEdit::Markup(_) => "markup",
            FieldEdit::SalePrice(_) => "sale_price",
            FieldEdit::Currency(_) => "currency",
            FieldEdit::IvaRate(_) => "iva_rate",
            FieldEdit::ExchangeRate(_) => "exchange_rate",
        }
    }
}

// =============================================================================
// Pricing State
// =============================================================================

/// Pricing section of a product form.
///
/// ## Invariants
/// - `authority == Auto`   ⇒ `sale_price` was derived from `inputs.markup`
/// - `authority == Manual` ⇒ `inputs.markup` was derived from `sale_price`
/// - `sale_price` only ever holds a committed value; a cleared or zero
///   sale-price field sets `sale_price_pending` instead of overwriting it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricingState {
    /// Cost, currency, markup, IVA and rate.
    pub inputs: PricingInputs,

    /// Last committed sale price (ARS).
    #[ts(type = "string")]
    pub sale_price: Decimal,

    /// Which value is driving.
    pub authority: PriceAuthority,

    /// The sale-price field is empty or zero and reconciliation is suspended.
    pub sale_price_pending: bool,
}

impl PricingState {
    /// Creates a state in AUTO with the sale price derived from `inputs`.
    pub fn new(inputs: PricingInputs) -> Self {
        let mut state = PricingState {
            inputs: PricingInputs {
                markup: clamp_markup(inputs.markup),
                ..inputs
            },
            sale_price: Decimal::ZERO,
            authority: PriceAuthority::Auto,
            sale_price_pending: false,
        };
        state.sale_price = sale_price_for(&state.inputs);
        state
    }

    /// Creates a state from a stored product, keeping its sale price as is.
    ///
    /// Opening an existing product must not silently reprice it, so nothing
    /// is recomputed until the user edits a field.
    pub fn from_stored(inputs: PricingInputs, sale_price: Decimal) -> Self {
        PricingState {
            inputs,
            sale_price: sale_price.max(Decimal::ZERO),
            authority: PriceAuthority::Auto,
            sale_price_pending: false,
        }
    }

    /// Snapshot handed back to the caller.
    pub fn result(&self) -> PricingResult {
        PricingResult {
            sale_price: self.sale_price,
            markup: self.inputs.markup,
            manual_override: self.authority.is_manual(),
        }
    }

    /// True when the sale price is the driving value.
    pub fn is_manual(&self) -> bool {
        self.authority.is_manual()
    }
}

impl Default for PricingState {
    fn default() -> Self {
        PricingState::new(PricingInputs::default())
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Applies one field edit and re-derives whichever value is not driving.
///
/// Total: never panics, never fails.
pub fn on_field_change(state: &mut PricingState, edit: FieldEdit) -> PricingResult {
    match edit {
        FieldEdit::UnitCost(cost) => {
            state.inputs.unit_cost = cost;
            reprice(state);
        }
        FieldEdit::Currency(currency) => {
            state.inputs.currency = currency;
            reprice(state);
        }
        FieldEdit::IvaRate(rate) => {
            state.inputs.iva_rate = rate;
            reprice(state);
        }
        FieldEdit::ExchangeRate(rate) => {
            state.inputs.exchange_rate = rate;
            reprice(state);
        }
        FieldEdit::Markup(markup) => {
            // Markup wins from here on, whatever the previous authority.
            state.inputs.markup = clamp_markup(markup);
            state.authority = PriceAuthority::Auto;
            state.sale_price_pending = false;
            state.sale_price = sale_price_for(&state.inputs);
        }
        FieldEdit::SalePrice(price) => {
            state.authority = PriceAuthority::Manual;
            match price {
                Some(price) if price > Decimal::ZERO => {
                    state.sale_price = price;
                    state.sale_price_pending = false;
                    state.inputs.markup = markup_for(&state.inputs, price);
                }
                // Mid-typing: keep the committed price, touch nothing else.
                _ => state.sale_price_pending = true,
            }
        }
    }

    state.result()
}

/// Sale-price field lost focus.
///
/// If the field was left empty or at zero, the last committed sale price is
/// restored and the markup is derived from it once more (cost may have
/// changed while the field was pending).
pub fn on_sale_price_blur(state: &mut PricingState) -> PricingResult {
    if state.sale_price_pending {
        state.sale_price_pending = false;
        reprice(state);
    }

    state.result()
}

/// Re-derives the non-driving value from the current inputs.
///
/// No-op while a sale-price edit is pending.
pub fn reprice(state: &mut PricingState) -> PricingResult {
    if state.sale_price_pending {
        return state.result();
    }

    match state.authority {
        PriceAuthority::Auto => {
            state.sale_price = sale_price_for(&state.inputs);
        }
        PriceAuthority::Manual => {
            state.inputs.markup = markup_for(&state.inputs, state.sale_price);
        }
    }

    state.result()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn state_1000_ars() -> PricingState {
        PricingState::new(PricingInputs {
            unit_cost: dec!(1000),
            currency: Currency::Ars,
            markup: dec!(0.30),
            iva_rate: dec!(0.21),
            exchange_rate: None,
        })
    }

    #[test]
    fn test_new_state_derives_price() {
        let state = state_1000_ars();
        assert_eq!(state.sale_price, dec!(1600));
        assert_eq!(state.authority, PriceAuthority::Auto);
        assert!(!state.result().manual_override);
    }

    #[test]
    fn test_auto_cost_edit_recomputes_price() {
        let mut state = state_1000_ars();
        // 2000 × 1.21 × 1.30 = 3146 → 3100
        let result = on_field_change(&mut state, FieldEdit::UnitCost(dec!(2000)));
        assert_eq!(result.sale_price, dec!(3100));
        assert_eq!(result.markup, dec!(0.30));
        assert!(!result.manual_override);
    }

    #[test]
    fn test_auto_markup_edit_recomputes_price() {
        let mut state = state_1000_ars();
        // 1000 × 1.21 × 1.5 = 1815 → 1800
        let result = on_field_change(&mut state, FieldEdit::Markup(dec!(0.5)));
        assert_eq!(result.sale_price, dec!(1800));
        assert_eq!(result.markup, dec!(0.5));
    }

    #[test]
    fn test_auto_iva_edit_recomputes_price() {
        let mut state = state_1000_ars();
        // 1000 × 1.00 × 1.30 = 1300
        let result = on_field_change(&mut state, FieldEdit::IvaRate(dec!(0)));
        assert_eq!(result.sale_price, dec!(1300));
    }

    #[test]
    fn test_auto_currency_edit_uses_rate() {
        let mut state = state_1000_ars();
        on_field_change(&mut state, FieldEdit::ExchangeRate(Some(dec!(2))));
        // ARS: the rate is ignored
        assert_eq!(state.sale_price, dec!(1600));

        // 1000 USD × 2 × 1.21 × 1.30 = 3146 → 3100
        let result = on_field_change(&mut state, FieldEdit::Currency(Currency::Usd));
        assert_eq!(result.sale_price, dec!(3100));
    }

    #[test]
    fn test_sale_price_edit_enters_manual() {
        let mut state = state_1000_ars();
        let result = on_field_change(&mut state, FieldEdit::SalePrice(Some(dec!(2000))));
        assert!(result.manual_override);
        assert_eq!(result.sale_price, dec!(2000));
        // 2000 / 1.21 / 1000 - 1 = 0.65289...
        assert_eq!(result.markup, dec!(0.6529));
    }

    #[test]
    fn test_manual_cost_edit_keeps_price() {
        let mut state = state_1000_ars();
        on_field_change(&mut state, FieldEdit::SalePrice(Some(dec!(2000))));

        let result = on_field_change(&mut state, FieldEdit::UnitCost(dec!(1200)));
        assert!(result.manual_override);
        assert_eq!(result.sale_price, dec!(2000));
        // 2000 / 1.21 / 1200 - 1 = 0.37741...
        assert_eq!(result.markup, dec!(0.3774));
    }

    #[test]
    fn test_manual_then_markup_switches_back() {
        let mut state = state_1000_ars();
        on_field_change(&mut state, FieldEdit::SalePrice(Some(dec!(2000))));
        on_field_change(&mut state, FieldEdit::UnitCost(dec!(1200)));

        let result = on_field_change(&mut state, FieldEdit::Markup(dec!(0.30)));
        assert!(!result.manual_override);
        // 1200 × 1.21 × 1.30 = 1887.6 → 1900
        assert_eq!(result.sale_price, dec!(1900));

        // Back in AUTO: cost edits move the price again.
        let result = on_field_change(&mut state, FieldEdit::UnitCost(dec!(1000)));
        assert_eq!(result.sale_price, dec!(1600));
    }

    #[test]
    fn test_manual_iva_edit_keeps_price() {
        let mut state = state_1000_ars();
        on_field_change(&mut state, FieldEdit::SalePrice(Some(dec!(1600))));
        let result = on_field_change(&mut state, FieldEdit::IvaRate(dec!(0)));
        assert_eq!(result.sale_price, dec!(1600));
        assert_eq!(result.markup, dec!(0.6));
    }

    #[test]
    fn test_cleared_sale_price_suspends() {
        let mut state = state_1000_ars();
        let result = on_field_change(&mut state, FieldEdit::SalePrice(None));
        assert!(state.sale_price_pending);
        assert!(result.manual_override);
        assert_eq!(result.sale_price, dec!(1600));
        assert_eq!(result.markup, dec!(0.30));

        // Zero behaves the same as empty.
        let mut state = state_1000_ars();
        on_field_change(&mut state, FieldEdit::SalePrice(Some(dec!(0))));
        assert!(state.sale_price_pending);
        assert_eq!(state.inputs.markup, dec!(0.30));
    }

    #[test]
    fn test_pending_ignores_cost_edits() {
        let mut state = state_1000_ars();
        on_field_change(&mut state, FieldEdit::SalePrice(None));
        let result = on_field_change(&mut state, FieldEdit::UnitCost(dec!(500)));
        assert_eq!(state.inputs.unit_cost, dec!(500));
        assert_eq!(result.sale_price, dec!(1600));
        assert_eq!(result.markup, dec!(0.30));
    }

    #[test]
    fn test_pending_then_value_resumes() {
        let mut state = state_1000_ars();
        on_field_change(&mut state, FieldEdit::SalePrice(None));
        let result = on_field_change(&mut state, FieldEdit::SalePrice(Some(dec!(2000))));
        assert!(!state.sale_price_pending);
        assert_eq!(result.markup, dec!(0.6529));
    }

    #[test]
    fn test_blur_restores_committed_price() {
        let mut state = state_1000_ars();
        on_field_change(&mut state, FieldEdit::SalePrice(Some(dec!(2000))));
        on_field_change(&mut state, FieldEdit::SalePrice(None));
        on_field_change(&mut state, FieldEdit::UnitCost(dec!(1200)));

        let result = on_sale_price_blur(&mut state);
        assert!(!state.sale_price_pending);
        assert_eq!(result.sale_price, dec!(2000));
        assert_eq!(result.markup, dec!(0.3774));
        assert!(result.manual_override);
    }

    #[test]
    fn test_blur_without_pending_is_noop() {
        let mut state = state_1000_ars();
        let before = state.clone();
        on_sale_price_blur(&mut state);
        assert_eq!(state, before);
    }

    #[test]
    fn test_markup_edit_clears_pending() {
        let mut state = state_1000_ars();
        on_field_change(&mut state, FieldEdit::SalePrice(None));
        let result = on_field_change(&mut state, FieldEdit::Markup(dec!(0.5)));
        assert!(!state.sale_price_pending);
        assert!(!result.manual_override);
        assert_eq!(result.sale_price, dec!(1800));
    }

    #[test]
    fn test_markup_is_clamped() {
        let mut state = state_1000_ars();
        let result = on_field_change(&mut state, FieldEdit::Markup(dec!(-2)));
        assert_eq!(result.markup, dec!(-0.99));
        assert!(result.sale_price >= dec!(0));
    }

    #[test]
    fn test_zero_cost_degrades() {
        let mut state = state_1000_ars();
        let result = on_field_change(&mut state, FieldEdit::UnitCost(dec!(0)));
        assert_eq!(result.sale_price, dec!(0));

        on_field_change(&mut state, FieldEdit::SalePrice(Some(dec!(500))));
        assert_eq!(state.inputs.markup, dec!(0));
    }

    #[test]
    fn test_from_stored_keeps_price() {
        let inputs = PricingInputs {
            unit_cost: dec!(1000),
            currency: Currency::Ars,
            markup: dec!(0.30),
            iva_rate: dec!(0.21),
            exchange_rate: None,
        };
        let state = PricingState::from_stored(inputs, dec!(1650));
        assert_eq!(state.sale_price, dec!(1650));
        assert_eq!(state.authority, PriceAuthority::Auto);
    }

    #[test]
    fn test_field_edit_serde() {
        let edit: FieldEdit =
            serde_json::from_str(r#"{"field":"sale_price","value":null}"#).unwrap();
        assert_eq!(edit, FieldEdit::SalePrice(None));

        let edit: FieldEdit =
            serde_json::from_str(r#"{"field":"currency","value":"USD"}"#).unwrap();
        assert_eq!(edit, FieldEdit::Currency(Currency::Usd));

        let edit: FieldEdit = serde_json::from_str(r#"{"field":"markup","value":"0.25"}"#).unwrap();
        assert_eq!(edit, FieldEdit::Markup(dec!(0.25)));
        assert_eq!(edit.field_name(), "markup");
    }
}
