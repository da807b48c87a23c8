//! # Pricing Module
//!
//! The three calculators the reconciliation engine is built from.
//!
//! ## Derivation Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  unit_cost ──► normalize(currency, rate) ──► cost_ars                   │
//! │                                                │                        │
//! │                                   × (1 + iva_rate)                      │
//! │                                                │                        │
//! │                                                ▼                        │
//! │                                          cost_with_iva                  │
//! │                                                │                        │
//! │                                     × (1 + markup)                      │
//! │                                                │                        │
//! │                                                ▼                        │
//! │                                        price_with_markup                │
//! │                                                │                        │
//! │                                     tiered rounding                     │
//! │                                                │                        │
//! │                                                ▼                        │
//! │                                           sale_price                    │
//! │                                                                         │
//! │  calculate_markup walks the same chain backwards (without the rounding) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Totality
//! Every function here returns a value for every input. Missing rates,
//! zero costs and half-typed prices degrade to `0` or to the unconverted
//! amount, so a form being typed into never shows garbage.
//!
//! All arithmetic is checked. A result that would overflow `Decimal`
//! (a 28-digit cost, a cost of 1e-28 against a real price) degrades the
//! same way instead of panicking.
//!
//! ## Usage
//! ```rust
//! use mostrador_core::pricing::{calculate_markup, calculate_sale_price};
//! use mostrador_core::Currency;
//! use rust_decimal::Decimal;
//!
//! let cost = Decimal::from(1000);
//! let markup = Decimal::new(30, 2); // 30%
//! let iva = Decimal::new(21, 2);    // 21%
//!
//! // 1000 × 1.21 × 1.30 = 1573 → nearest hundred
//! let price = calculate_sale_price(cost, Currency::Ars, markup, iva, None);
//! assert_eq!(price, Decimal::from(1600));
//!
//! // Going back does not land on 30% exactly: the rounding is lossy.
//! let back = calculate_markup(cost, Currency::Ars, price, iva, None);
//! assert_eq!(back, Decimal::new(3223, 4));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{Currency, PricingInputs};

// =============================================================================
// Pricing Constants
// =============================================================================

/// Prices below this are rounded to [`SMALL_PRICE_STEP`], the rest to
/// [`LARGE_PRICE_STEP`].
pub const PRICE_TIER_THRESHOLD: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Rounding step for prices under the threshold.
pub const SMALL_PRICE_STEP: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Rounding step for prices at or above the threshold.
pub const LARGE_PRICE_STEP: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Lowest markup the engine will price with (-99%).
///
/// A markup of -100% would give the product away and anything lower would
/// produce a negative price.
pub const MIN_MARKUP: Decimal = Decimal::from_parts(99, 0, 0, true, 2);

/// Decimal places kept on a derived markup (0.3223 = 32.23%).
pub const MARKUP_DECIMAL_PLACES: u32 = 4;

// =============================================================================
// Currency Normalizer
// =============================================================================

/// Converts an amount to ARS.
///
/// ## Rules
/// - ARS: returned unchanged
/// - USD: multiplied by `exchange_rate`
/// - USD with a missing, zero or negative rate: returned unchanged
/// - USD whose converted amount would overflow: returned unchanged
///
/// The last two rules are the degraded mode used while the rate is loading.
///
/// ## Example
/// ```rust
/// use mostrador_core::pricing::normalize;
/// use mostrador_core::Currency;
/// use rust_decimal::Decimal;
///
/// let ten = Decimal::from(10);
/// assert_eq!(normalize(ten, Currency::Usd, Some(Decimal::from(1200))), Decimal::from(12000));
/// assert_eq!(normalize(ten, Currency::Usd, None), ten);
/// ```
pub fn normalize(amount: Decimal, currency: Currency, exchange_rate: Option<Decimal>) -> Decimal {
    match (currency, exchange_rate) {
        (Currency::Usd, Some(rate)) if rate > Decimal::ZERO => {
            amount.checked_mul(rate).unwrap_or(amount)
        }
        _ => amount,
    }
}

// =============================================================================
// Sale Price Calculator
// =============================================================================

/// Derives the sale price from cost, markup and IVA.
///
/// ## Rules
/// - Non-positive cost → `0`
/// - Markup below [`MIN_MARKUP`] is priced as [`MIN_MARKUP`]
/// - Overflow anywhere in the chain → `0`
/// - Result goes through [`round_to_price_tier`]
///
/// ## Example
/// ```rust
/// use mostrador_core::pricing::calculate_sale_price;
/// use mostrador_core::Currency;
/// use rust_decimal::Decimal;
///
/// // 10 × 1.00 × 1.20 = 12 → nearest ten
/// let price = calculate_sale_price(
///     Decimal::from(10),
///     Currency::Ars,
///     Decimal::new(20, 2),
///     Decimal::ZERO,
///     None,
/// );
/// assert_eq!(price, Decimal::from(10));
/// ```
pub fn calculate_sale_price(
    unit_cost: Decimal,
    currency: Currency,
    markup: Decimal,
    iva_rate: Decimal,
    exchange_rate: Option<Decimal>,
) -> Decimal {
    if unit_cost <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let cost_ars = normalize(unit_cost, currency, exchange_rate);
    let price_with_markup = Decimal::ONE
        .checked_add(iva_rate)
        .and_then(|factor| cost_ars.checked_mul(factor))
        .and_then(|cost_with_iva| {
            Decimal::ONE
                .checked_add(clamp_markup(markup))
                .and_then(|factor| cost_with_iva.checked_mul(factor))
        });

    match price_with_markup {
        Some(price) => round_to_price_tier(price).max(Decimal::ZERO),
        None => Decimal::ZERO,
    }
}

/// Rounds a price to its tier step, midpoints up.
///
/// ## Tiers
/// ```text
/// price <  1000  →  nearest 10    (12    → 10,   995  → 1000)
/// price >= 1000  →  nearest 100   (1573  → 1600, 1549 → 1500)
/// ```
///
/// A price so close to `Decimal::MAX` that its tier step would overflow
/// rounds to `0`.
pub fn round_to_price_tier(price: Decimal) -> Decimal {
    let step = if price < PRICE_TIER_THRESHOLD {
        SMALL_PRICE_STEP
    } else {
        LARGE_PRICE_STEP
    };

    price
        .checked_div(step)
        .and_then(|steps| round_half_up(steps, 0).checked_mul(step))
        .unwrap_or(Decimal::ZERO)
}

// =============================================================================
// Markup Calculator
// =============================================================================

/// Derives the markup implied by a sale price.
///
/// ## Rules
/// - Non-positive cost or sale price → `0`
/// - Overflow (e.g. a cost of 1e-28 against a real price) → `0`
/// - Result is rounded to [`MARKUP_DECIMAL_PLACES`] places
///
/// This is the inverse of [`calculate_sale_price`] *before* tier rounding,
/// so `markup → price → markup` is not exact once the price has been
/// snapped to a multiple of 10/100.
pub fn calculate_markup(
    unit_cost: Decimal,
    currency: Currency,
    sale_price: Decimal,
    iva_rate: Decimal,
    exchange_rate: Option<Decimal>,
) -> Decimal {
    if unit_cost <= Decimal::ZERO || sale_price <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let divisor = match Decimal::ONE.checked_add(iva_rate) {
        Some(divisor) if divisor > Decimal::ZERO => divisor,
        _ => return Decimal::ZERO,
    };

    let cost_ars = normalize(unit_cost, currency, exchange_rate);
    sale_price
        .checked_div(divisor)
        .and_then(|price_without_iva| price_without_iva.checked_div(cost_ars))
        .and_then(|ratio| ratio.checked_sub(Decimal::ONE))
        .map(round_markup)
        .unwrap_or(Decimal::ZERO)
}

/// Rounds a markup fraction to [`MARKUP_DECIMAL_PLACES`], midpoints up.
pub fn round_markup(markup: Decimal) -> Decimal {
    round_half_up(markup, MARKUP_DECIMAL_PLACES).normalize()
}

/// Clamps a markup to [`MIN_MARKUP`].
#[inline]
pub fn clamp_markup(markup: Decimal) -> Decimal {
    markup.max(MIN_MARKUP)
}

// =============================================================================
// Input Struct Helpers
// =============================================================================

/// [`calculate_sale_price`] over a [`PricingInputs`].
pub fn sale_price_for(inputs: &PricingInputs) -> Decimal {
    calculate_sale_price(
        inputs.unit_cost,
        inputs.currency,
        inputs.markup,
        inputs.iva_rate,
        inputs.exchange_rate,
    )
}

/// [`calculate_markup`] over a [`PricingInputs`] and a sale price.
pub fn markup_for(inputs: &PricingInputs, sale_price: Decimal) -> Decimal {
    calculate_markup(
        inputs.unit_cost,
        inputs.currency,
        sale_price,
        inputs.iva_rate,
        inputs.exchange_rate,
    )
}

// =============================================================================
// Display Helpers
// =============================================================================

/// Markup fraction as a percentage with two decimals (0.3223 → 32.23).
///
/// Saturates at `Decimal::MAX` for absurd markups.
pub fn markup_to_percent(markup: Decimal) -> Decimal {
    round_half_up(markup.saturating_mul(Decimal::ONE_HUNDRED), 2).normalize()
}

/// Percentage typed in the form back to a fraction (32.23 → 0.3223).
pub fn markup_from_percent(percent: Decimal) -> Decimal {
    percent
        .checked_div(Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::ZERO)
        .normalize()
}

/// Rounds to `dp` places with midpoints toward positive infinity, so
/// `-0.12345` goes to `-0.1234` and `0.12345` to `0.1235`.
#[inline]
fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    let strategy = if value.is_sign_negative() {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };
    value.round_dp_with_strategy(dp, strategy)
}

// =============================================================================
// Unit Tests
// =============================================================================
