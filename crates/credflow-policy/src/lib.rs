//! Credit policy enforcement for credflow.
//!
//! Two steps turn a risk category into a new credit limit:
//!
//! 1. [`PolicyBook::decide`] looks up the directive for the category and
//!    labels the rule that applied (`"<category> Risk Policy"` or
//!    `"No Matching Policy"`).
//! 2. [`LimitComputer::compute`] interprets the directive against the
//!    customer's current limit. A malformed directive never aborts the run;
//!    it yields an unchanged limit with a `FAIL` status.
//!
//! ```
//! use credflow_core::{PolicyRule, ValidationStatus};
//! use credflow_policy::{LimitComputer, PolicyBook};
//!
//! let book = PolicyBook::from_rules(&[PolicyRule::new("Low", "Increase limit by 12%")]);
//! let decision = book.decide("Low");
//! assert_eq!(decision.rule_label, "Low Risk Policy");
//!
//! let outcome = LimitComputer::compute(1000.0, decision.directive.as_deref());
//! assert_eq!(outcome.new_limit, 1120.0);
//! assert_eq!(outcome.status, ValidationStatus::Pass);
//! ```

pub mod error;
pub mod limits;
pub mod rules;

pub use error::DirectiveError;
pub use limits::{Directive, LimitComputer, LimitOutcome, round_to_cents};
pub use rules::{NO_MATCHING_POLICY, PolicyBook, PolicyDecision};
