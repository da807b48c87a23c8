//! # Pricing Commands
//!
//! Commands behind the new-product and edit-product dialogs.
//!
//! ## Dialog Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Dialog Lifecycle                             │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Open    │────►│ Editing  │────►│ Submit   │────►│ Payload  │       │
//! │  │ (new or  │     │          │     │ (valid?) │     │ to API   │       │
//! │  │  edit)   │     │          │     │          │     │          │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │  ▲             │                               │
//! │               edit_draft_field     invalid: draft stays open           │
//! │               blur_sale_price                                           │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   discard_draft ──────────────────► (closed)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both dialogs go through the same reconciliation dispatcher; they differ
//! only in how the draft is seeded.
//!
//! While the rate feed is online, every command first feeds the current
//! rate into the draft, so a rate that arrives (or goes stale) while the
//! dialog is open is reflected in the next response.

use std::str::FromStr;

use mostrador_core::pricing::{markup_from_percent, markup_to_percent};
use mostrador_core::validation::{parse_amount, parse_required_amount, validate_submission};
use mostrador_core::{
    Currency, FieldEdit, IvaRate, PricingResult, ProductDraft, ProductPricePayload,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{ConfigState, DraftState, RatesState};

// =============================================================================
// Request / Response Types
// =============================================================================

/// What every draft command returns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
    pub draft: ProductDraft,
    pub result: PricingResult,
    /// The markup as the form shows it (0.3223 → 32.23).
    pub markup_percent: Decimal,
    /// False when USD costs are being priced without a rate.
    pub exchange_rate_available: bool,
}

impl DraftResponse {
    fn from_draft(draft: &ProductDraft) -> Self {
        DraftResponse {
            draft: draft.clone(),
            result: draft.result(),
            markup_percent: markup_to_percent(draft.pricing.inputs.markup),
            exchange_rate_available: draft
                .pricing
                .inputs
                .exchange_rate
                .is_some_and(|rate| rate > Decimal::ZERO),
        }
    }
}

/// Arguments for `open_edit_product_draft`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenEditArgs {
    pub product_id: String,
    /// Pricing fields as stored by the product API.
    pub product: ProductPricePayload,
    /// Product's IVA bracket; the configured default when absent.
    #[serde(default)]
    pub iva_rate: Option<IvaRate>,
}

/// Arguments for commands addressing one draft.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftArgs {
    pub draft_id: String,
}

/// Arguments for `edit_draft_field`.
///
/// `value` is what the user typed: a string (`"1.250,50"`), a number, or
/// `null` for a cleared field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditFieldArgs {
    pub draft_id: String,
    pub field: String,
    #[serde(default)]
    pub value: Value,
}

/// Result of a successful submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    /// `None` when the payload creates a new product.
    pub product_id: Option<String>,
    pub payload: ProductPricePayload,
}

// =============================================================================
// Field Parsing
// =============================================================================

fn value_text(field: &str, value: &Value) -> Result<String, ApiError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(ApiError::invalid_request(format!(
            "{} must be a string, number or null, got {}",
            field, other
        ))),
    }
}

/// Turns a raw form input into a [`FieldEdit`].
///
/// `markup` is a fraction (`0.30`); `markup_percent` is the same edit typed
/// as a percentage (`30`).
///
/// ## Blank Inputs
/// - `unit_cost`, `markup`, `markup_percent`: treated as zero
/// - `sale_price`: cleared (pending edit)
/// - `exchange_rate`: no rate
/// - `currency`, `iva_rate`: required
pub fn parse_field_edit(field: &str, value: &Value) -> Result<FieldEdit, ApiError> {
    let text = value_text(field, value)?;

    let edit = match field {
        "unit_cost" | "unit_price" => {
            FieldEdit::UnitCost(parse_amount("unit_cost", &text)?.unwrap_or(Decimal::ZERO))
        }
        "markup" => FieldEdit::Markup(parse_amount("markup", &text)?.unwrap_or(Decimal::ZERO)),
        "markup_percent" => FieldEdit::Markup(markup_from_percent(
            parse_amount("markup_percent", &text)?.unwrap_or(Decimal::ZERO),
        )),
        "sale_price" => FieldEdit::SalePrice(parse_amount("sale_price", &text)?),
        "currency" => FieldEdit::Currency(Currency::from_str(&text)?),
        "iva_rate" => match IvaRate::from_str(&text) {
            Ok(bracket) => FieldEdit::IvaRate(bracket.rate()),
            Err(_) => FieldEdit::IvaRate(parse_required_amount("iva_rate", &text)?),
        },
        "exchange_rate" => FieldEdit::ExchangeRate(parse_amount("exchange_rate", &text)?),
        other => {
            return Err(ApiError::invalid_request(format!("Unknown field: {}", other)));
        }
    };

    Ok(edit)
}

/// The feed's rate when online, `None` (leave the draft alone) otherwise.
fn feed_rate(rates: &RatesState) -> Option<Option<Decimal>> {
    rates.is_online().then(|| rates.current_rate())
}

fn sync_rate(draft: &mut ProductDraft, rate: Option<Option<Decimal>>) {
    if let Some(rate) = rate {
        if draft.refresh_rate(rate).is_some() {
            debug!(draft_id = %draft.id, ?rate, "Exchange rate changed, draft repriced");
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Opens the new-product dialog.
///
/// Unit cost starts at zero, so the first sale price shown is zero.
pub fn open_new_product_draft(
    config: &ConfigState,
    drafts: &DraftState,
    rates: &RatesState,
) -> Result<DraftResponse, ApiError> {
    debug!("open_new_product_draft command");

    let draft = ProductDraft::new(config.draft_defaults(), rates.current_rate());
    let draft = drafts.insert(draft)?;

    info!(draft_id = %draft.id, "New product draft opened");
    Ok(DraftResponse::from_draft(&draft))
}

/// Opens the edit-product dialog, seeded from the stored record.
///
/// The stored sale price is shown unchanged until the first edit.
pub fn open_edit_product_draft(
    config: &ConfigState,
    drafts: &DraftState,
    rates: &RatesState,
    args: OpenEditArgs,
) -> Result<DraftResponse, ApiError> {
    debug!(product_id = %args.product_id, "open_edit_product_draft command");

    let iva_rate = args.iva_rate.unwrap_or(config.default_iva_rate).rate();
    let draft = ProductDraft::from_product(
        args.product_id,
        &args.product,
        iva_rate,
        rates.current_rate(),
    );
    let draft = drafts.insert(draft)?;

    info!(
        draft_id = %draft.id,
        product_id = ?draft.product_id,
        "Edit product draft opened"
    );
    Ok(DraftResponse::from_draft(&draft))
}

/// Applies one field edit.
pub fn edit_draft_field(
    drafts: &DraftState,
    rates: &RatesState,
    args: EditFieldArgs,
) -> Result<DraftResponse, ApiError> {
    let edit = parse_field_edit(&args.field, &args.value)?;
    debug!(draft_id = %args.draft_id, field = edit.field_name(), "edit_draft_field command");

    let rate = feed_rate(rates);
    let response = drafts.with_draft_mut(&args.draft_id, |draft| {
        sync_rate(draft, rate);
        draft.apply(edit);
        DraftResponse::from_draft(draft)
    })?;

    Ok(response)
}

/// The sale-price field lost focus.
pub fn blur_sale_price(
    drafts: &DraftState,
    rates: &RatesState,
    args: DraftArgs,
) -> Result<DraftResponse, ApiError> {
    debug!(draft_id = %args.draft_id, "blur_sale_price command");

    let rate = feed_rate(rates);
    let response = drafts.with_draft_mut(&args.draft_id, |draft| {
        sync_rate(draft, rate);
        draft.blur_sale_price();
        DraftResponse::from_draft(draft)
    })?;

    Ok(response)
}

/// Current state of a draft.
pub fn get_draft(
    drafts: &DraftState,
    rates: &RatesState,
    args: DraftArgs,
) -> Result<DraftResponse, ApiError> {
    debug!(draft_id = %args.draft_id, "get_draft command");

    let rate = feed_rate(rates);
    let response = drafts.with_draft_mut(&args.draft_id, |draft| {
        sync_rate(draft, rate);
        DraftResponse::from_draft(draft)
    })?;

    Ok(response)
}

/// Validates the draft and, if it passes, closes it and returns the
/// payload for the product API.
///
/// A draft that fails validation stays open.
pub fn submit_draft(
    drafts: &DraftState,
    rates: &RatesState,
    args: DraftArgs,
) -> Result<SubmitResponse, ApiError> {
    debug!(draft_id = %args.draft_id, "submit_draft command");

    let rate = feed_rate(rates);
    let (product_id, payload) = drafts.with_draft_mut(&args.draft_id, |draft| {
        sync_rate(draft, rate);
        validate_submission(draft).map(|payload| (draft.product_id.clone(), payload))
    })??;

    drafts.remove(&args.draft_id)?;

    info!(
        draft_id = %args.draft_id,
        product_id = ?product_id,
        sale_price = %payload.sale_price,
        markup = %payload.markup,
        "Draft submitted"
    );

    Ok(SubmitResponse {
        product_id,
        payload,
    })
}

/// Closes a draft without saving.
pub fn discard_draft(drafts: &DraftState, args: DraftArgs) -> Result<(), ApiError> {
    debug!(draft_id = %args.draft_id, "discard_draft command");

    drafts.remove(&args.draft_id)?;
    info!(draft_id = %args.draft_id, "Draft discarded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use mostrador_core::MAX_OPEN_DRAFTS;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn setup() -> (ConfigState, DraftState, RatesState) {
        (
            ConfigState::default(),
            DraftState::new(MAX_OPEN_DRAFTS),
            RatesState::offline(),
        )
    }

    fn edit(drafts: &DraftState, rates: &RatesState, id: &str, field: &str, value: Value) -> DraftResponse {
        edit_draft_field(
            drafts,
            rates,
            EditFieldArgs {
                draft_id: id.to_string(),
                field: field.to_string(),
                value,
            },
        )
        .unwrap()
    }

    fn args(id: &str) -> DraftArgs {
        DraftArgs {
            draft_id: id.to_string(),
        }
    }

    #[test]
    fn test_parse_field_edit() {
        assert_eq!(
            parse_field_edit("unit_cost", &json!("1.250,50")).unwrap(),
            FieldEdit::UnitCost(dec!(1250.50))
        );
        assert_eq!(
            parse_field_edit("unit_cost", &json!(1000)).unwrap(),
            FieldEdit::UnitCost(dec!(1000))
        );
        assert_eq!(
            parse_field_edit("sale_price", &Value::Null).unwrap(),
            FieldEdit::SalePrice(None)
        );
        assert_eq!(
            parse_field_edit("currency", &json!("usd")).unwrap(),
            FieldEdit::Currency(Currency::Usd)
        );
        assert_eq!(
            parse_field_edit("iva_rate", &json!("reduced")).unwrap(),
            FieldEdit::IvaRate(dec!(0.105))
        );
        assert_eq!(
            parse_field_edit("iva_rate", &json!("0,21")).unwrap(),
            FieldEdit::IvaRate(dec!(0.21))
        );
        assert_eq!(
            parse_field_edit("markup_percent", &json!("32,5")).unwrap(),
            FieldEdit::Markup(dec!(0.325))
        );
    }

    #[test]
    fn test_markup_percent_round_trip() {
        let (config, drafts, rates) = setup();
        let id = open_new_product_draft(&config, &drafts, &rates).unwrap().draft.id;

        edit(&drafts, &rates, &id, "unit_cost", json!("1000"));
        let response = edit(&drafts, &rates, &id, "markup_percent", json!("50"));
        // 1000 × 1.21 × 1.5 = 1815 → 1800
        assert_eq!(response.result.markup, dec!(0.5));
        assert_eq!(response.result.sale_price, dec!(1800));
        assert_eq!(response.markup_percent, dec!(50));

        let response = edit(&drafts, &rates, &id, "sale_price", json!("1600"));
        assert_eq!(response.result.markup, dec!(0.3223));
        assert_eq!(response.markup_percent, dec!(32.23));
    }

    #[test]
    fn test_parse_field_edit_errors() {
        let err = parse_field_edit("unit_cost", &json!("12a")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = parse_field_edit("color", &json!("red")).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);

        let err = parse_field_edit("markup", &json!([1])).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[test]
    fn test_new_product_flow() {
        let (config, drafts, rates) = setup();

        let opened = open_new_product_draft(&config, &drafts, &rates).unwrap();
        assert_eq!(opened.result.sale_price, Decimal::ZERO);
        let id = opened.draft.id.clone();

        let response = edit(&drafts, &rates, &id, "unit_cost", json!("1000"));
        assert_eq!(response.result.sale_price, dec!(1600));
        assert!(!response.result.manual_override);

        let submitted = submit_draft(&drafts, &rates, args(&id)).unwrap();
        assert_eq!(submitted.product_id, None);
        assert_eq!(submitted.payload.sale_price, dec!(1600));
        assert!(drafts.is_empty());
    }

    #[test]
    fn test_edit_product_keeps_stored_price() {
        let (config, drafts, rates) = setup();

        let opened = open_edit_product_draft(
            &config,
            &drafts,
            &rates,
            OpenEditArgs {
                product_id: "p-1".into(),
                product: ProductPricePayload {
                    unit_price: dec!(1000),
                    currency: Currency::Ars,
                    markup: dec!(0.30),
                    sale_price: dec!(1750),
                },
                iva_rate: None,
            },
        )
        .unwrap();

        assert_eq!(opened.result.sale_price, dec!(1750));
        assert_eq!(opened.draft.product_id.as_deref(), Some("p-1"));
    }

    #[test]
    fn test_pending_sale_price_blocks_submit_until_blur() {
        let (config, drafts, rates) = setup();
        let id = open_new_product_draft(&config, &drafts, &rates).unwrap().draft.id;

        edit(&drafts, &rates, &id, "unit_cost", json!("1000"));
        let response = edit(&drafts, &rates, &id, "sale_price", json!(""));
        assert!(response.draft.pricing.sale_price_pending);
        assert_eq!(response.result.sale_price, dec!(1600));

        let err = submit_draft(&drafts, &rates, args(&id)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(drafts.len(), 1);

        let response = blur_sale_price(&drafts, &rates, args(&id)).unwrap();
        assert!(!response.draft.pricing.sale_price_pending);
        assert_eq!(response.result.sale_price, dec!(1600));

        assert!(submit_draft(&drafts, &rates, args(&id)).is_ok());
    }

    #[test]
    fn test_zero_cost_cannot_be_submitted() {
        let (config, drafts, rates) = setup();
        let id = open_new_product_draft(&config, &drafts, &rates).unwrap().draft.id;

        let err = submit_draft(&drafts, &rates, args(&id)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("unit_price"));
    }

    #[test]
    fn test_discard_and_unknown_draft() {
        let (config, drafts, rates) = setup();
        let id = open_new_product_draft(&config, &drafts, &rates).unwrap().draft.id;

        discard_draft(&drafts, args(&id)).unwrap();

        let err = get_draft(&drafts, &rates, args(&id)).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_usd_without_rate_is_flagged() {
        let (config, drafts, rates) = setup();
        let id = open_new_product_draft(&config, &drafts, &rates).unwrap().draft.id;

        edit(&drafts, &rates, &id, "currency", json!("USD"));
        let response = edit(&drafts, &rates, &id, "unit_cost", json!(10));

        assert!(!response.exchange_rate_available);
        // 10 × 1.21 × 1.30 = 15.73 → 20, priced as if ARS
        assert_eq!(response.result.sale_price, dec!(20));
    }
}
