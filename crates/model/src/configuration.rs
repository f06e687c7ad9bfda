//! Component configuration
//!
//! Presentation text, picker options and the ordered rule list a
//! component's value is checked against.

use crate::validation::ValidationRule;
use formkit_core::{ConfigurationId, FieldValue, ValidationCategory};
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// Options offered by a picker with no explicit list
pub fn default_picker_options() -> Vec<String> {
    vec![
        "Option 1".to_string(),
        "Option 2".to_string(),
        "Option 3".to_string(),
    ]
}

// ============================================================================
// ComponentConfiguration
// ============================================================================

/// Validation and presentation settings owned by one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfiguration {
    /// Unique identifier for this configuration
    pub id: ConfigurationId,

    /// Whether the form marks the field as required
    pub is_required: bool,

    /// Placeholder text for input
    pub placeholder: Option<String>,

    /// Help text shown below input
    pub helper_text: Option<String>,

    /// Rules checked in order; `None` means always valid
    #[serde(default, serialize_with = "serialize_stored_rules")]
    pub validation_rules: Option<Vec<ValidationRule>>,

    /// Choices for picker components
    #[serde(default = "default_picker_options")]
    pub picker_options: Vec<String>,

    /// Message shown when the value is invalid
    pub error_message: Option<String>,

    /// Preferred initial value
    pub default_value: Option<FieldValue>,
}

impl ComponentConfiguration {
    /// Create an empty configuration (no rules)
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            is_required: false,
            placeholder: None,
            helper_text: None,
            validation_rules: None,
            picker_options: default_picker_options(),
            error_message: None,
            default_value: None,
        }
    }

    /// Configuration synthesized for a component created without one
    pub fn for_category(category: ValidationCategory, title: &str) -> Self {
        Self::new()
            .with_placeholder(format!("Enter {}", title.to_lowercase()))
            .with_rules(ValidationRule::defaults_for(category))
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Set the placeholder text
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Set the helper text
    pub fn with_helper_text(mut self, helper: impl Into<String>) -> Self {
        self.helper_text = Some(helper.into());
        self
    }

    /// Replace the rule list
    pub fn with_rules(mut self, rules: Vec<ValidationRule>) -> Self {
        self.validation_rules = Some(rules);
        self
    }

    /// Append a rule
    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.validation_rules.get_or_insert_with(Vec::new).push(rule);
        self
    }

    /// Set the picker options
    pub fn with_picker_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.picker_options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Set the error message
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Set the default value
    pub fn with_default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check a candidate value against every rule, stopping at the first failure
    pub fn validate(&self, value: &FieldValue) -> bool {
        self.first_failure(value).is_none()
    }

    /// The first rule the candidate fails, if any
    pub fn first_failure(&self, value: &FieldValue) -> Option<&ValidationRule> {
        self.validation_rules
            .as_deref()?
            .iter()
            .find(|rule| !rule.is_satisfied_by(value))
    }

    /// Check if any rule is configured
    pub fn has_rules(&self) -> bool {
        self.validation_rules.as_ref().is_some_and(|r| !r.is_empty())
    }

    /// Copy with a new identifier
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4();
        copy
    }
}

impl Default for ComponentConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

/// Custom rules live only in memory; drop them when writing
fn serialize_stored_rules<S: Serializer>(
    rules: &Option<Vec<ValidationRule>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match rules {
        None => serializer.serialize_none(),
        Some(rules) => {
            let stored: Vec<&ValidationRule> = rules.iter().filter(|r| r.is_persistable()).collect();
            serializer.serialize_some(&stored)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
