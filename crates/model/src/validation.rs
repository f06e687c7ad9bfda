//! Validation rules for component values
//!
//! A rule is a pure predicate over a [`FieldValue`]. Rules of the wrong kind
//! for a value fail, except `Required`, which only constrains strings.

use chrono::{DateTime, Utc};
use formkit_core::{FieldValue, ValidationCategory};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Signature of a programmatic rule
pub type Predicate = dyn Fn(&FieldValue) -> bool + Send + Sync;

// ============================================================================
// ValidationRule
// ============================================================================

/// A single constraint attached to a component configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRule {
    /// Strings must be non-empty, other kinds always pass
    Required,
    /// Minimum string length in characters
    MinLength(usize),
    /// Maximum string length in characters
    MaxLength(usize),
    /// Inclusive numeric bounds
    Range { min: Option<f64>, max: Option<f64> },
    /// Inclusive timestamp bounds
    DateRange {
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    },
    /// String must contain a match of the pattern
    Regex(String),
    /// Programmatic predicate; never stored
    #[serde(skip)]
    Custom(CustomRule),
}

impl ValidationRule {
    /// Numeric range with optional bounds
    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        ValidationRule::Range { min, max }
    }

    /// Timestamp range with optional bounds
    pub fn date_range(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        ValidationRule::DateRange { from, to }
    }

    /// Pattern rule
    pub fn regex(pattern: impl Into<String>) -> Self {
        ValidationRule::Regex(pattern.into())
    }

    /// Programmatic rule
    pub fn custom(
        name: impl Into<String>,
        predicate: impl Fn(&FieldValue) -> bool + Send + Sync + 'static,
    ) -> Self {
        ValidationRule::Custom(CustomRule::new(name, predicate))
    }

    /// Rules synthesized for a component created without a configuration
    pub fn defaults_for(category: ValidationCategory) -> Vec<ValidationRule> {
        match category {
            ValidationCategory::Text => vec![
                ValidationRule::Required,
                ValidationRule::MinLength(1),
                ValidationRule::MaxLength(1000),
            ],
            ValidationCategory::Number => {
                vec![ValidationRule::Required, ValidationRule::range(None, None)]
            }
            ValidationCategory::Date => vec![
                ValidationRule::Required,
                ValidationRule::date_range(None, None),
            ],
            ValidationCategory::Boolean => vec![ValidationRule::Required],
        }
    }

    /// Evaluate the rule against a candidate value
    pub fn is_satisfied_by(&self, value: &FieldValue) -> bool {
        match self {
            ValidationRule::Required => value.as_str().is_none_or(|s| !s.is_empty()),
            ValidationRule::MinLength(min) => value
                .as_str()
                .is_some_and(|s| s.chars().count() >= *min),
            ValidationRule::MaxLength(max) => value
                .as_str()
                .is_some_and(|s| s.chars().count() <= *max),
            ValidationRule::Range { min, max } => value.as_number().is_some_and(|n| {
                min.is_none_or(|min| n >= min) && max.is_none_or(|max| n <= max)
            }),
            ValidationRule::DateRange { from, to } => value.as_date().is_some_and(|d| {
                from.is_none_or(|from| d >= from) && to.is_none_or(|to| d <= to)
            }),
            ValidationRule::Regex(pattern) => {
                let Some(s) = value.as_str() else {
                    return false;
                };
                match regex::Regex::new(pattern) {
                    Ok(re) => re.is_match(s),
                    Err(e) => {
                        tracing::warn!("Invalid validation pattern '{}': {}", pattern, e);
                        false
                    }
                }
            }
            ValidationRule::Custom(rule) => rule.evaluate(value),
        }
    }

    /// Whether the rule survives serialization
    pub fn is_persistable(&self) -> bool {
        !matches!(self, ValidationRule::Custom(_))
    }

    /// Get a user-friendly error message
    pub fn error_message(&self) -> String {
        match self {
            ValidationRule::Required => "This field is required".to_string(),
            ValidationRule::MinLength(n) => format!("Minimum length is {} characters", n),
            ValidationRule::MaxLength(n) => format!("Maximum length is {} characters", n),
            ValidationRule::Range { min, max } => match (min, max) {
                (Some(min), Some(max)) => format!("Value must be between {} and {}", min, max),
                (Some(min), None) => format!("Minimum value is {}", min),
                (None, Some(max)) => format!("Maximum value is {}", max),
                (None, None) => "Must be a number".to_string(),
            },
            ValidationRule::DateRange { from, to } => match (from, to) {
                (Some(from), Some(to)) => format!(
                    "Date must be between {} and {}",
                    from.date_naive(),
                    to.date_naive()
                ),
                (Some(from), None) => format!("Date must be on or after {}", from.date_naive()),
                (None, Some(to)) => format!("Date must be on or before {}", to.date_naive()),
                (None, None) => "Must be a date".to_string(),
            },
            ValidationRule::Regex(_) => "Invalid format".to_string(),
            ValidationRule::Custom(rule) => format!("Failed validation: {}", rule.name()),
        }
    }
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationRule::Required => write!(f, "required"),
            ValidationRule::MinLength(n) => write!(f, "min_length({})", n),
            ValidationRule::MaxLength(n) => write!(f, "max_length({})", n),
            ValidationRule::Range { min, max } => write!(f, "range({:?}, {:?})", min, max),
            ValidationRule::DateRange { from, to } => {
                write!(f, "date_range({:?}, {:?})", from, to)
            }
            ValidationRule::Regex(pattern) => write!(f, "regex({})", pattern),
            ValidationRule::Custom(rule) => write!(f, "custom({})", rule.name()),
        }
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValidationRule::{}", self)
    }
}

impl PartialEq for ValidationRule {
    fn eq(&self, other: &Self) -> bool {
        use ValidationRule::*;
        match (self, other) {
            (Required, Required) => true,
            (MinLength(a), MinLength(b)) | (MaxLength(a), MaxLength(b)) => a == b,
            (Range { min: a, max: b }, Range { min: c, max: d }) => a == c && b == d,
            (DateRange { from: a, to: b }, DateRange { from: c, to: d }) => a == c && b == d,
            (Regex(a), Regex(b)) => a == b,
            (Custom(a), Custom(b)) => a == b,
            _ => false,
        }
    }
}

// ============================================================================
// CustomRule
// ============================================================================

/// Named predicate attached in code
#[derive(Clone)]
pub struct CustomRule {
    name: String,
    predicate: Arc<Predicate>,
}

impl CustomRule {
    /// Create a new custom rule
    pub fn new(
        name: impl Into<String>,
        predicate: impl Fn(&FieldValue) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Rule name used in messages
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the predicate
    pub fn evaluate(&self, value: &FieldValue) -> bool {
        (self.predicate)(value)
    }
}

impl PartialEq for CustomRule {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.predicate, &other.predicate)
    }
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRule").field("name", &self.name).finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
