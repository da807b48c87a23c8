//! # Validation Module
//!
//! Caller-level checks layered on top of the reconciliation engine.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Keystroke ──► parse_amount()        "12,5" → 12.5, "" → None          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Reconciliation engine               never rejects, degrades instead    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Save button ──► validate_submission()                                  │
//! │                  ├── unit price > 0                                     │
//! │                  ├── sale price > 0                                     │
//! │                  ├── markup ≥ -100%                                     │
//! │                  └── no pending sale-price edit                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mostrador_core::validation::parse_amount;
//! use rust_decimal::Decimal;
//!
//! assert_eq!(parse_amount("unit_price", "1.250,50").unwrap(), Some(Decimal::new(125050, 2)));
//! assert_eq!(parse_amount("unit_price", "  ").unwrap(), None);
//! assert!(parse_amount("unit_price", "12a").is_err());
//! ```

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::draft::{ProductDraft, ProductPricePayload};
use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Lowest markup a product may be saved with (-100%).
pub const MIN_SUBMITTED_MARKUP: Decimal = Decimal::NEGATIVE_ONE;

// =============================================================================
// Submission
// =============================================================================

/// Checks a draft before it is sent to the product API.
///
/// ## Returns
/// The flat payload on success, the first failing rule otherwise.
pub fn validate_submission(draft: &ProductDraft) -> ValidationResult<ProductPricePayload> {
    if draft.pricing.sale_price_pending {
        return Err(ValidationError::SalePricePending);
    }

    let payload = draft.payload();

    if payload.unit_price <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "unit_price".to_string(),
        });
    }

    if payload.sale_price <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "sale_price".to_string(),
        });
    }

    if payload.markup < MIN_SUBMITTED_MARKUP {
        return Err(ValidationError::BelowMinimum {
            field: "markup".to_string(),
            min: MIN_SUBMITTED_MARKUP,
        });
    }

    Ok(payload)
}

// =============================================================================
// Text Input
// =============================================================================

/// Parses a number typed into a form field.
///
/// ## Rules
/// - Blank → `Ok(None)` (the user cleared the field)
/// - `,` is the decimal separator when present; `.` is then a thousands
///   separator (`1.250,50`)
/// - Without a `,`, `.` is the decimal separator (`1250.50`)
/// - Anything else → `InvalidFormat`
pub fn parse_amount(field: &str, text: &str) -> ValidationResult<Option<Decimal>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let normalized = if text.contains(',') {
        text.replace('.', "").replace(',', ".")
    } else {
        text.to_string()
    };

    Decimal::from_str(&normalized)
        .map(Some)
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("'{}' is not a number", text),
        })
}

/// Like [`parse_amount`], but a blank field is an error.
pub fn parse_required_amount(field: &str, text: &str) -> ValidationResult<Decimal> {
    parse_amount(field, text)?.ok_or_else(|| ValidationError::Required {
        field: field.to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
