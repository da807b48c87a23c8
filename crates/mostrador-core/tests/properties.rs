//! Property-based tests for the pricing engine.
//!
//! These check the invariants that must hold for any cost, markup, IVA
//! bracket and currency, plus the AUTO/MANUAL routing over random edit
//! sequences.

use mostrador_core::pricing::{
    calculate_markup, calculate_sale_price, markup_to_percent, normalize, LARGE_PRICE_STEP,
    PRICE_TIER_THRESHOLD, SMALL_PRICE_STEP,
};
use mostrador_core::reconcile::{on_field_change, FieldEdit, PricingState};
use mostrador_core::{Currency, IvaRate, PricingInputs};
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Arbitrary Strategies
// =============================================================================

/// Positive cost, 0.01 to 1_000_000.00.
fn arb_cost() -> impl Strategy<Value = Decimal> {
    (1i64..=100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Non-positive cost, -1000.00 to 0.
fn arb_non_positive() -> impl Strategy<Value = Decimal> {
    (-100_000i64..=0i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Markup in [-0.99, 5] with four decimals.
fn arb_markup() -> impl Strategy<Value = Decimal> {
    (-9_900i64..=50_000i64).prop_map(|bps| Decimal::new(bps, 4))
}

fn arb_iva() -> impl Strategy<Value = Decimal> {
    prop::sample::select(IvaRate::ALL.to_vec()).prop_map(|bracket| bracket.rate())
}

fn arb_currency() -> impl Strategy<Value = Currency> {
    prop_oneof![Just(Currency::Ars), Just(Currency::Usd)]
}

/// Exchange rate, possibly missing or zero.
fn arb_rate() -> impl Strategy<Value = Option<Decimal>> {
    prop_oneof![
        Just(None),
        Just(Some(Decimal::ZERO)),
        (1i64..=300_000i64).prop_map(|cents| Some(Decimal::new(cents, 2))),
    ]
}

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..=100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Any `Decimal` at all, weighted toward the edges of the type.
fn arb_any_decimal() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::MAX),
        Just(Decimal::MIN),
        Just(Decimal::new(1, 28)),
        Just(Decimal::new(-1, 28)),
        (any::<u32>(), any::<u32>(), any::<u32>(), any::<bool>(), 0u32..=28)
            .prop_map(|(lo, mid, hi, negative, scale)| Decimal::from_parts(lo, mid, hi, negative, scale)),
    ]
}

fn arb_any_rate() -> impl Strategy<Value = Option<Decimal>> {
    prop_oneof![Just(None), arb_any_decimal().prop_map(Some)]
}

fn arb_any_edit() -> impl Strategy<Value = FieldEdit> {
    prop_oneof![
        arb_any_decimal().prop_map(FieldEdit::UnitCost),
        arb_any_decimal().prop_map(FieldEdit::Markup),
        prop_oneof![Just(None), arb_any_decimal().prop_map(Some)].prop_map(FieldEdit::SalePrice),
        arb_currency().prop_map(FieldEdit::Currency),
        arb_any_decimal().prop_map(FieldEdit::IvaRate),
        arb_any_rate().prop_map(FieldEdit::ExchangeRate),
    ]
}

fn arb_edit() -> impl Strategy<Value = FieldEdit> {
    prop_oneof![
        arb_cost().prop_map(FieldEdit::UnitCost),
        arb_markup().prop_map(FieldEdit::Markup),
        prop_oneof![Just(None), arb_cost().prop_map(Some)].prop_map(FieldEdit::SalePrice),
        arb_currency().prop_map(FieldEdit::Currency),
        arb_iva().prop_map(FieldEdit::IvaRate),
        arb_rate().prop_map(FieldEdit::ExchangeRate),
    ]
}

// =============================================================================
// Calculator Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Sale price is non-negative and sits on its tier's grid.
    #[test]
    fn sale_price_is_tier_aligned(
        cost in arb_cost(),
        currency in arb_currency(),
        markup in arb_markup(),
        iva in arb_iva(),
        rate in arb_rate(),
    ) {
        let price = calculate_sale_price(cost, currency, markup, iva, rate);
        prop_assert!(price >= Decimal::ZERO);

        let step = if price < PRICE_TIER_THRESHOLD { SMALL_PRICE_STEP } else { LARGE_PRICE_STEP };
        prop_assert_eq!(price % step, Decimal::ZERO);
    }

    /// Non-positive cost always prices at zero.
    #[test]
    fn non_positive_cost_prices_at_zero(
        cost in arb_non_positive(),
        currency in arb_currency(),
        markup in arb_markup(),
        iva in arb_iva(),
        rate in arb_rate(),
    ) {
        prop_assert_eq!(calculate_sale_price(cost, currency, markup, iva, rate), Decimal::ZERO);
    }

    /// Non-positive cost or sale price gives a zero markup.
    #[test]
    fn non_positive_inputs_give_zero_markup(
        bad in arb_non_positive(),
        good in arb_cost(),
        currency in arb_currency(),
        iva in arb_iva(),
        rate in arb_rate(),
    ) {
        prop_assert_eq!(calculate_markup(bad, currency, good, iva, rate), Decimal::ZERO);
        prop_assert_eq!(calculate_markup(good, currency, bad, iva, rate), Decimal::ZERO);
    }

    /// ARS is never converted.
    #[test]
    fn ars_is_identity(amount in arb_amount(), rate in arb_rate()) {
        prop_assert_eq!(normalize(amount, Currency::Ars, rate), amount);
    }

    /// USD without a usable rate falls back to the raw amount.
    #[test]
    fn usd_without_rate_is_identity(amount in arb_amount()) {
        prop_assert_eq!(normalize(amount, Currency::Usd, None), amount);
        prop_assert_eq!(normalize(amount, Currency::Usd, Some(Decimal::ZERO)), amount);
    }

    /// Derived markup never reaches -100% for a positive price.
    #[test]
    fn derived_markup_above_minus_one(
        cost in arb_cost(),
        price in arb_cost(),
        iva in arb_iva(),
    ) {
        let markup = calculate_markup(cost, Currency::Ars, price, iva, None);
        prop_assert!(markup >= Decimal::NEGATIVE_ONE);
    }
}

// =============================================================================
// Full-Range Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// The calculators return for every representable input, still
    /// non-negative and on the tier grid.
    #[test]
    fn calculators_are_total_over_full_range(
        cost in arb_any_decimal(),
        price in arb_any_decimal(),
        markup in arb_any_decimal(),
        iva in arb_any_decimal(),
        currency in arb_currency(),
        rate in arb_any_rate(),
    ) {
        let _ = normalize(cost, currency, rate);
        let _ = calculate_markup(cost, currency, price, iva, rate);
        let _ = markup_to_percent(markup);

        let sale_price = calculate_sale_price(cost, currency, markup, iva, rate);
        prop_assert!(sale_price >= Decimal::ZERO);

        let step = if sale_price < PRICE_TIER_THRESHOLD { SMALL_PRICE_STEP } else { LARGE_PRICE_STEP };
        prop_assert_eq!(sale_price % step, Decimal::ZERO);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Any edit sequence, with any amounts, leaves a usable state.
    #[test]
    fn controller_is_total_over_full_range(edits in prop::collection::vec(arb_any_edit(), 1..20)) {
        let mut state = PricingState::new(PricingInputs::default());

        for edit in edits {
            let result = on_field_change(&mut state, edit);
            prop_assert!(result.sale_price >= Decimal::ZERO);
            prop_assert_eq!(result.manual_override, state.is_manual());
        }
    }
}

// =============================================================================
// Controller Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// After any edit sequence the non-driving value matches the driving one.
    #[test]
    fn controller_stays_consistent(edits in prop::collection::vec(arb_edit(), 1..20)) {
        let mut state = PricingState::new(PricingInputs::default());

        for edit in edits {
            let result = on_field_change(&mut state, edit);
            prop_assert!(result.sale_price >= Decimal::ZERO);
            prop_assert_eq!(result.manual_override, state.is_manual());

            if state.sale_price_pending {
                continue;
            }

            let inputs = &state.inputs;
            if state.is_manual() {
                let expected = calculate_markup(
                    inputs.unit_cost,
                    inputs.currency,
                    state.sale_price,
                    inputs.iva_rate,
                    inputs.exchange_rate,
                );
                prop_assert_eq!(inputs.markup, expected);
            } else {
                let expected = calculate_sale_price(
                    inputs.unit_cost,
                    inputs.currency,
                    inputs.markup,
                    inputs.iva_rate,
                    inputs.exchange_rate,
                );
                prop_assert_eq!(state.sale_price, expected);
            }
        }
    }

    /// In MANUAL, cost edits never move the sale price.
    #[test]
    fn manual_price_survives_cost_edits(
        price in arb_cost(),
        costs in prop::collection::vec(arb_cost(), 1..10),
    ) {
        let mut state = PricingState::new(PricingInputs::default());
        on_field_change(&mut state, FieldEdit::SalePrice(Some(price)));

        for cost in costs {
            let result = on_field_change(&mut state, FieldEdit::UnitCost(cost));
            prop_assert!(result.manual_override);
            prop_assert_eq!(result.sale_price, price);
        }
    }
}

// =============================================================================
// Worked Examples
// =============================================================================

#[test]
fn worked_example_large_tier_round_trip() {
    let price = calculate_sale_price(
        Decimal::from(1000),
        Currency::Ars,
        Decimal::new(30, 2),
        Decimal::new(21, 2),
        None,
    );
    assert_eq!(price, Decimal::from(1600));

    let markup = calculate_markup(
        Decimal::from(1000),
        Currency::Ars,
        price,
        Decimal::new(21, 2),
        None,
    );
    assert_eq!(markup, Decimal::new(3223, 4));
}

#[test]
fn worked_example_small_tier() {
    let price = calculate_sale_price(
        Decimal::from(10),
        Currency::Ars,
        Decimal::new(20, 2),
        Decimal::ZERO,
        None,
    );
    assert_eq!(price, Decimal::from(10));
}

#[test]
fn worked_example_manual_override_persistence() {
    let mut state = PricingState::new(PricingInputs {
        unit_cost: Decimal::from(1000),
        currency: Currency::Ars,
        markup: Decimal::new(30, 2),
        iva_rate: Decimal::new(21, 2),
        exchange_rate: None,
    });

    on_field_change(&mut state, FieldEdit::SalePrice(Some(Decimal::from(2500))));
    let markup_before = state.inputs.markup;

    let result = on_field_change(&mut state, FieldEdit::UnitCost(Decimal::from(1500)));
    assert_eq!(result.sale_price, Decimal::from(2500));
    assert_ne!(result.markup, markup_before);

    let result = on_field_change(&mut state, FieldEdit::Markup(Decimal::new(10, 2)));
    assert!(!result.manual_override);
    // 1500 × 1.21 × 1.10 = 1996.5 → 2000
    assert_eq!(result.sale_price, Decimal::from(2000));
}
