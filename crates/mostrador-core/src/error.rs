//! # Error Types
//!
//! Domain-specific error types for mostrador-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mostrador-core errors (this file)                                     │
//! │  ├── CoreError        - Draft lifecycle errors                         │
//! │  └── ValidationError  - Input parsing and submission checks            │
//! │                                                                         │
//! │  mostrador-rates errors (separate crate)                               │
//! │  └── RatesError       - Exchange rate lookup failures                  │
//! │                                                                         │
//! │  Back-office errors (in app)                                           │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → UI                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pricing functions themselves never return errors. An in-progress form
//! always gets a displayable value; errors only appear when the caller asks
//! "can I submit this?" or references a draft that does not exist.

use rust_decimal::Decimal;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Draft cannot be found.
    ///
    /// ## When This Occurs
    /// - The dialog was already closed (draft discarded or submitted)
    /// - The UI sent a stale draft id after an app restart
    #[error("Draft not found: {0}")]
    DraftNotFound(String),

    /// Too many product dialogs are open.
    #[error("Cannot have more than {max} open drafts")]
    TooManyDrafts { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the submission check and by text parsing, never by the
/// reconciliation engine.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value is below its allowed minimum.
    ///
    /// ## When This Occurs
    /// - Markup below -100% (the product would be sold for nothing)
    #[error("{field} must be at least {min}")]
    BelowMinimum { field: String, min: Decimal },

    /// Invalid format (e.g., "12a" typed into a price field).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// The sale price field is still being edited (empty or zero).
    #[error("sale_price is still being edited")]
    SalePricePending,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
