//! Errors raised while interpreting policy directives.
//!
//! These never escape the limit stage: a [`DirectiveError`] is recorded as a
//! `FAIL` validation status on the customer's decision.

use thiserror::Error;

/// Why an increase directive could not be applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DirectiveError {
    /// The directive names an increase but has no amount after "by ".
    #[error("directive '{directive}' has no amount")]
    MissingAmount { directive: String },

    /// The amount is not a number.
    #[error("amount '{amount}' in directive '{directive}' is not a number")]
    InvalidAmount { directive: String, amount: String },

    /// The amount parsed to infinity or NaN.
    #[error("amount '{amount}' in directive '{directive}' is not finite")]
    NonFiniteAmount { directive: String, amount: String },
}
