//! # Domain Types
//!
//! Core pricing types used throughout Mostrador.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Pricing Types                                   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  PricingInputs  │   │  PricingResult  │   │ PriceAuthority  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  unit_cost      │   │  sale_price     │   │  Auto           │       │
//! │  │  currency       │   │  markup         │   │  (markup wins)  │       │
//! │  │  markup         │   │  manual_override│   │  Manual         │       │
//! │  │  iva_rate       │   └─────────────────┘   │  (price wins)   │       │
//! │  │  exchange_rate  │                         └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    Currency     │   │     IvaRate     │                             │
//! │  │  ARS | USD      │   │  0 / 10.5 /     │                             │
//! │  └─────────────────┘   │  21 / 27 %      │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fractions, Not Percentages
//! Markup and IVA are stored as decimal fractions: `0.20` means 20%.
//! Percent conversion only happens at the display edge.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Currency
// =============================================================================

/// Currency a unit cost is expressed in.
///
/// Sale prices are always in ARS. A USD cost is converted with the current
/// exchange rate before any markup math happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Argentine peso (store currency).
    #[default]
    Ars,
    /// US dollar.
    Usd,
}

impl Currency {
    /// ISO 4217 code.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Ars => "ARS",
            Currency::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ARS" => Ok(Currency::Ars),
            "USD" => Ok(Currency::Usd),
            other => Err(ValidationError::InvalidFormat {
                field: "currency".to_string(),
                reason: format!("unknown currency '{}', expected ARS or USD", other),
            }),
        }
    }
}

// =============================================================================
// IVA Rate
// =============================================================================

/// The IVA brackets offered by the product form.
///
/// The engine accepts any fraction; this enum exists so the UI and config
/// name the brackets instead of passing magic numbers around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum IvaRate {
    /// 0% (exempt goods).
    Exempt,
    /// 10.5%.
    Reduced,
    /// 21% (most goods).
    #[default]
    General,
    /// 27% (utilities and some services).
    Increased,
}

impl IvaRate {
    /// All brackets, in display order.
    pub const ALL: [IvaRate; 4] = [
        IvaRate::Exempt,
        IvaRate::Reduced,
        IvaRate::General,
        IvaRate::Increased,
    ];

    /// The bracket as a decimal fraction (0.21 for 21%).
    pub fn rate(&self) -> Decimal {
        match self {
            IvaRate::Exempt => Decimal::ZERO,
            IvaRate::Reduced => Decimal::new(105, 3),
            IvaRate::General => Decimal::new(21, 2),
            IvaRate::Increased => Decimal::new(27, 2),
        }
    }

    /// Finds the bracket matching a fraction, if any.
    pub fn from_rate(rate: Decimal) -> Option<Self> {
        Self::ALL.into_iter().find(|bracket| bracket.rate() == rate)
    }
}

impl FromStr for IvaRate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exempt" | "0" => Ok(IvaRate::Exempt),
            "reduced" | "10.5" => Ok(IvaRate::Reduced),
            "general" | "21" => Ok(IvaRate::General),
            "increased" | "27" => Ok(IvaRate::Increased),
            other => Err(ValidationError::InvalidFormat {
                field: "iva_rate".to_string(),
                reason: format!(
                    "unknown IVA bracket '{}', expected exempt, reduced, general or increased",
                    other
                ),
            }),
        }
    }
}

// =============================================================================
// Price Authority
// =============================================================================

/// Which of {markup, sale price} is currently driving the other.
///
/// ## State Machine
/// ```text
///                 edit sale_price
///   ┌──────────┐ ───────────────────► ┌──────────┐
///   │   AUTO   │                      │  MANUAL  │
///   │ markup → │ ◄─────────────────── │ price →  │
///   │  price   │     edit markup      │  markup  │
///   └──────────┘                      └──────────┘
///     cost / currency / IVA / rate edits keep the current state
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PriceAuthority {
    /// Markup is authoritative; sale price is derived.
    #[default]
    Auto,
    /// The typed sale price is authoritative; markup is derived.
    Manual,
}

impl PriceAuthority {
    /// True when the user's sale price overrides the markup.
    pub const fn is_manual(&self) -> bool {
        matches!(self, PriceAuthority::Manual)
    }
}

// =============================================================================
// Pricing Inputs / Result
// =============================================================================

/// The quantities the sale price is derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricingInputs {
    /// Cost of one unit, in `currency`.
    #[ts(type = "string")]
    pub unit_cost: Decimal,

    /// Currency of `unit_cost`.
    pub currency: Currency,

    /// Markup over IVA-inclusive cost, as a fraction.
    #[ts(type = "string")]
    pub markup: Decimal,

    /// IVA applied to the cost, as a fraction.
    #[ts(type = "string")]
    pub iva_rate: Decimal,

    /// USD→ARS rate. `None` while the rate is still loading.
    #[ts(type = "string | null")]
    pub exchange_rate: Option<Decimal>,
}

impl Default for PricingInputs {
    fn default() -> Self {
        PricingInputs {
            unit_cost: Decimal::ZERO,
            currency: Currency::Ars,
            markup: Decimal::ZERO,
            iva_rate: IvaRate::default().rate(),
            exchange_rate: None,
        }
    }
}

/// What the reconciliation engine hands back after every edit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricingResult {
    /// Tier-rounded sale price in ARS.
    #[ts(type = "string")]
    pub sale_price: Decimal,

    /// Markup as a fraction.
    #[ts(type = "string")]
    pub markup: Decimal,

    /// True when the sale price is the driving value.
    pub manual_override: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================
