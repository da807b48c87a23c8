//! # Rates Error Types
//!
//! Error types for exchange rate lookups.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Rates Error Categories                              │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Payload             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Http           │  │  InvalidRate            │ │
//! │  │  ConfigLoad     │  │  Timeout        │  │  DeserializationFailed  │ │
//! │  │  ConfigSave     │  │  UnexpectedStat │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Transport errors are retried with backoff; the rest are not.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for rate operations.
pub type RatesResult<T> = Result<T, RatesError>;

/// Everything that can go wrong getting a rate.
#[derive(Debug, Error)]
pub enum RatesError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid rates configuration.
    #[error("Invalid rates configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Request could not be sent or the connection broke.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Request timed out.
    #[error("Rate request timed out after {0} seconds")]
    Timeout(u64),

    /// Endpoint answered with a non-success status.
    #[error("Rate endpoint returned status {0}")]
    UnexpectedStatus(u16),

    // =========================================================================
    // Payload Errors
    // =========================================================================
    /// Response body was not `{ "rate": number }`.
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// The rate was zero or negative.
    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Feed command channel closed.
    #[error("Channel error: {0}")]
    ChannelError(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

/// Timeouts are mapped by the caller, which knows the configured limit.
impl From<reqwest::Error> for RatesError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RatesError::DeserializationFailed(err.to_string())
        } else if let Some(status) = err.status() {
            RatesError::UnexpectedStatus(status.as_u16())
        } else {
            RatesError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RatesError {
    fn from(err: serde_json::Error) -> Self {
        RatesError::DeserializationFailed(err.to_string())
    }
}

impl From<std::io::Error> for RatesError {
    fn from(err: std::io::Error) -> Self {
        RatesError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for RatesError {
    fn from(err: toml::de::Error) -> Self {
        RatesError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for RatesError {
    fn from(err: toml::ser::Error) -> Self {
        RatesError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization (for retry logic)
// =============================================================================

impl RatesError {
    /// Returns true if the fetch may succeed when tried again.
    ///
    /// ## Retryable Errors
    /// - Connection failures and timeouts
    /// - 5xx and 429 responses
    ///
    /// ## Non-Retryable Errors
    /// - Configuration errors
    /// - 4xx responses other than 429
    /// - Malformed or non-positive rates
    pub fn is_retryable(&self) -> bool {
        match self {
            RatesError::Http(_) | RatesError::Timeout(_) => true,
            RatesError::UnexpectedStatus(status) => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            RatesError::InvalidConfig(_)
                | RatesError::ConfigLoadFailed(_)
                | RatesError::ConfigSaveFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(RatesError::Http("connection refused".into()).is_retryable());
        assert!(RatesError::Timeout(10).is_retryable());
        assert!(RatesError::UnexpectedStatus(503).is_retryable());
        assert!(RatesError::UnexpectedStatus(429).is_retryable());
        assert!(!RatesError::UnexpectedStatus(404).is_retryable());
        assert!(!RatesError::InvalidRate("0".into()).is_retryable());
        assert!(!RatesError::InvalidConfig("bad".into()).is_retryable());
    }

    #[test]
    fn test_config_error_classification() {
        assert!(RatesError::InvalidConfig("x".into()).is_config_error());
        assert!(!RatesError::Timeout(1).is_config_error());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RatesError::UnexpectedStatus(502).to_string(),
            "Rate endpoint returned status 502"
        );
    }
}
