//! Error types surfaced by the rate table and the calculator.

use thiserror::Error;

/// Reasons a refresh of the rate table can fail.
///
/// None of these leave the table partially updated: the manager keeps the
/// last good table and records the error in its status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    #[error("API key not found. Set EXCHANGE_RATE_API_KEY or provider.api_key in the config")]
    MissingCredential,

    #[error("Failed to reach the rate provider: {0}")]
    TransportFailure(String),

    #[error("Rate provider error: {0}")]
    ProviderError(String),

    #[error("Unexpected response from the rate provider: {0}")]
    MalformedResponse(String),
}

/// Calculation-time failures. These are carried inside a
/// [`ConversionResult`](crate::core::convert::ConversionResult) rather than
/// returned as errors from `convert`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("No rate available for {0}, cannot divide by it")]
    DivisionByUnavailableRate(String),

    #[error("No rate available for {0}")]
    UnavailableRate(String),
}
