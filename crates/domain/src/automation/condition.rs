//! Condition — a field/operator/value rule gating trigger automations.
//!
//! Conditions are evaluated against the payload of the event that fired
//! the trigger. All conditions in an automation must pass (logical AND).
//! Evaluation is pure and never fails: a field path that does not
//! resolve, or operands an operator cannot compare, are a non-match —
//! malformed or missing fields never match.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Comparison operator applied between the resolved field and the
/// condition's value. Serialized names match the platform's stored rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    /// Strict value equality.
    Equals,
    /// Strict value inequality.
    NotEquals,
    /// String substring or array membership.
    Contains,
    /// Numeric comparison, or lexicographic when both operands are strings.
    GreaterThan,
    /// Numeric comparison, or lexicographic when both operands are strings.
    LessThan,
}

impl Operator {
    /// The wire name of this operator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "notEquals",
            Self::Contains => "contains",
            Self::GreaterThan => "greaterThan",
            Self::LessThan => "lessThan",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rule: resolve `field` on the event payload and compare it
/// with `value` using `operator`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Dotted path into the event payload, e.g. `"donation.amount"`.
    pub field: String,
    /// How to compare the resolved field with `value`.
    pub operator: Operator,
    /// The expected value.
    pub value: serde_json::Value,
}

impl Condition {
    /// Evaluate this condition against an event payload.
    #[must_use]
    pub fn evaluate(&self, data: &serde_json::Value) -> bool {
        let Some(actual) = resolve_path(data, &self.field) else {
            return false;
        };

        match self.operator {
            Operator::Equals => actual == &self.value,
            Operator::NotEquals => actual != &self.value,
            Operator::Contains => contains(actual, &self.value),
            Operator::GreaterThan => {
                compare(actual, &self.value).is_some_and(|ord| ord == Ordering::Greater)
            }
            Operator::LessThan => {
                compare(actual, &self.value).is_some_and(|ord| ord == Ordering::Less)
            }
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}

/// Evaluate a list of conditions with AND semantics.
///
/// An empty list passes vacuously; evaluation short-circuits on the
/// first failing condition.
#[must_use]
pub fn evaluate_all(conditions: &[Condition], data: &serde_json::Value) -> bool {
    conditions.iter().all(|condition| condition.evaluate(data))
}

/// Walk a dotted path, returning `None` as soon as a segment is missing.
fn resolve_path<'a>(data: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    path.split('.')
        .try_fold(data, |value, segment| value.get(segment))
}

fn contains(haystack: &serde_json::Value, needle: &serde_json::Value) -> bool {
    match (haystack, needle) {
        (serde_json::Value::String(text), serde_json::Value::String(sub)) => {
            text.contains(sub.as_str())
        }
        (serde_json::Value::Array(items), needle) => items.contains(needle),
        _ => false,
    }
}

fn compare(left: &serde_json::Value, right: &serde_json::Value) -> Option<Ordering> {
    match (left, right) {
        (serde_json::Value::Number(a), serde_json::Value::Number(b)) => {
            a.as_f64()?.partial_cmp(&b.as_f64()?)
        }
        (serde_json::Value::String(a), serde_json::Value::String(b)) => {
            Some(a.as_str().cmp(b.as_str()))
        }
        _ => None,
    }
}
