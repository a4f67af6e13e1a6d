//! Market errors for the pricing core.
//!
//! Every operation on a [`Market`](super::Market) either commits completely or
//! returns one of these errors with the market left untouched.
//!
//! # Examples
//!
//! ```
//! use rikiddo::domain::{MarketError, OutcomeSet};
//!
//! let result = OutcomeSet::try_new(vec!["Yes".into()]);
//! assert!(matches!(
//!     result,
//!     Err(MarketError::Configuration { field: "outcomes", .. })
//! ));
//! ```

use thiserror::Error;

use super::ids::ActorId;

/// Errors raised by market creation and market operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    /// Market parameters violate their bounds. Fatal at creation.
    #[error("invalid market configuration for {field}: {reason}")]
    Configuration {
        /// The offending parameter.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The share solver did not reach the requested tolerance.
    #[error("share solver did not converge after {iterations} iterations (residual {residual:e})")]
    Pricing {
        /// Iterations spent before giving up.
        iterations: usize,
        /// Remaining distance between quoted price and payment.
        residual: f64,
    },

    /// A sell would drive an outcome balance below zero.
    #[error("insufficient shares of outcome {outcome}: requested {requested}, available {available}")]
    InsufficientShares {
        /// Outcome index.
        outcome: usize,
        /// Shares the caller asked to sell.
        requested: f64,
        /// Shares outstanding before the sell.
        available: f64,
    },

    /// A liquidity removal exceeds what the actor has provided.
    #[error("insufficient liquidity for {actor}: requested {requested}, provided {available}")]
    InsufficientLiquidity {
        /// The liquidity provider.
        actor: ActorId,
        /// Amount the caller asked to withdraw.
        requested: f64,
        /// Net amount the actor has provided.
        available: f64,
    },

    /// The operation would leave the market without a positive liquidity
    /// parameter or well-defined prices.
    #[error("degenerate market state: {reason}")]
    DegenerateState {
        /// Which guard tripped.
        reason: &'static str,
    },

    /// Outcome index outside the market's outcome set.
    #[error("outcome index {index} out of range for {count} outcomes")]
    UnknownOutcome {
        /// Requested index.
        index: usize,
        /// Number of outcomes in the market.
        count: usize,
    },

    /// Amount is zero, negative, or not finite.
    #[error("{field} must be positive and finite, got {amount}")]
    InvalidAmount {
        /// Which argument was rejected.
        field: &'static str,
        /// The rejected value.
        amount: f64,
    },
}

impl MarketError {
    /// Shorthand for a configuration error.
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field,
            reason: reason.into(),
        }
    }

    /// True for errors that reject market creation rather than one operation.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

/// Reject amounts that are not strictly positive and finite.
pub(crate) fn ensure_positive(field: &'static str, amount: f64) -> Result<(), MarketError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(MarketError::InvalidAmount { field, amount })
    }
}
