//! Credit limit computation.
//!
//! Directives are free text. Only one form changes a limit:
//! `"Increase limit by N%"`, where `N` is the text between the first `"by "`
//! and the next one (if any), with `%` signs stripped. Anything else leaves
//! the limit as it is.

use credflow_core::ValidationStatus;

use crate::error::DirectiveError;

/// Marker that makes a directive an increase instruction.
const INCREASE_MARKER: &str = "Increase limit by";

/// An interpreted policy directive.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// No rule, a no-op rule, or an unrecognized directive.
    NoChange,
    /// Raise the limit by this many percent.
    IncreaseByPercent(f64),
    /// Looked like an increase but the amount was unusable.
    Malformed(DirectiveError),
}

impl Directive {
    /// Interpret a raw directive. `None` means no rule matched.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::NoChange;
        };
        if !raw.contains(INCREASE_MARKER) {
            return Self::NoChange;
        }

        let Some(segment) = raw.split("by ").nth(1) else {
            return Self::Malformed(DirectiveError::MissingAmount {
                directive: raw.to_string(),
            });
        };

        let amount = segment.replace('%', "");
        let amount = amount.trim();
        match amount.parse::<f64>() {
            Ok(pct) if pct.is_finite() => Self::IncreaseByPercent(pct),
            Ok(_) => Self::Malformed(DirectiveError::NonFiniteAmount {
                directive: raw.to_string(),
                amount: amount.to_string(),
            }),
            Err(_) => Self::Malformed(DirectiveError::InvalidAmount {
                directive: raw.to_string(),
                amount: amount.to_string(),
            }),
        }
    }
}

/// The computed limit for one customer.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitOutcome {
    /// New limit, rounded to two decimal places.
    pub new_limit: f64,
    /// New limit before rounding. Summaries compare against this value.
    pub raw_limit: f64,
    pub status: ValidationStatus,
    pub directive: Directive,
}

impl LimitOutcome {
    /// The directive error, if the directive was malformed.
    pub fn error(&self) -> Option<&DirectiveError> {
        match &self.directive {
            Directive::Malformed(err) => Some(err),
            _ => None,
        }
    }
}

/// Applies directives to current limits.
pub struct LimitComputer;

impl LimitComputer {
    /// Compute the new limit for `current_limit` under `directive`.
    ///
    /// - increase by N% → `current_limit * (1 + N/100)`, rounded, `PASS`
    /// - no-op / unrecognized → unchanged, `PASS`
    /// - malformed increase → unchanged, `FAIL`
    pub fn compute(current_limit: f64, directive: Option<&str>) -> LimitOutcome {
        let directive = Directive::parse(directive);
        let (raw_limit, status) = match &directive {
            Directive::IncreaseByPercent(pct) => {
                (current_limit * (1.0 + pct / 100.0), ValidationStatus::Pass)
            }
            Directive::NoChange => (current_limit, ValidationStatus::Pass),
            Directive::Malformed(_) => (current_limit, ValidationStatus::Fail),
        };

        LimitOutcome {
            new_limit: round_to_cents(raw_limit),
            raw_limit,
            status,
            directive,
        }
    }
}

/// Round to two decimal places.
///
/// Rounds the exact binary value, so `1320.915` (stored just below the
/// midpoint) becomes `1320.91`.
pub fn round_to_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}
