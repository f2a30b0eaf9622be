//! Risk-category policy lookup.
//!
//! Rules map a risk category (`condition`) to a directive (`action`). The
//! book is built once per run from the policy rules file. When the file lists
//! the same condition more than once the last rule wins; duplicates are
//! reported so `credflow check` can surface them.

use credflow_core::PolicyRule;
use std::collections::HashMap;

/// Rule label used when no rule matches the risk category.
pub const NO_MATCHING_POLICY: &str = "No Matching Policy";

/// Result of looking up a risk category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDecision {
    /// The directive to apply, or `None` for no change.
    pub directive: Option<String>,
    /// `"<category> Risk Policy"` or `"No Matching Policy"`.
    pub rule_label: String,
}

impl PolicyDecision {
    fn no_match() -> Self {
        Self {
            directive: None,
            rule_label: NO_MATCHING_POLICY.to_string(),
        }
    }

    /// Whether a rule matched the category.
    pub fn matched(&self) -> bool {
        self.directive.is_some()
    }
}

/// Condition → directive lookup table.
#[derive(Debug, Clone, Default)]
pub struct PolicyBook {
    rules: HashMap<String, String>,
    duplicates: Vec<String>,
}

impl PolicyBook {
    /// Build the book. Later rules overwrite earlier ones with the same condition.
    pub fn from_rules(rules: &[PolicyRule]) -> Self {
        let mut book = Self::default();
        for rule in rules {
            let previous = book
                .rules
                .insert(rule.condition.clone(), rule.action.clone());
            if previous.is_some() {
                tracing::warn!(
                    condition = %rule.condition,
                    action = %rule.action,
                    "Duplicate policy condition; the last definition wins"
                );
                if !book.duplicates.contains(&rule.condition) {
                    book.duplicates.push(rule.condition.clone());
                }
            }
        }
        book
    }

    /// Conditions that appeared more than once, in first-duplicate order.
    pub fn duplicate_conditions(&self) -> &[String] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Look up the directive for a risk category.
    ///
    /// An empty directive is treated as no rule at all.
    pub fn decide(&self, risk_category: &str) -> PolicyDecision {
        match self.rules.get(risk_category) {
            Some(action) if !action.is_empty() => PolicyDecision {
                directive: Some(action.clone()),
                rule_label: format!("{} Risk Policy", risk_category),
            },
            _ => PolicyDecision::no_match(),
        }
    }
}
