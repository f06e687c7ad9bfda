//! Core types used throughout formkit
//!
//! Identifiers, the closed set of component types and the validation
//! categories that pick a component's default rule set.

use crate::value::FieldValue;
use chrono::Utc;
use serde::{Deserialize, Serialize};

// ============================================================================
// Unique Identifiers
// ============================================================================

/// Type alias for page identifiers
pub type PageId = uuid::Uuid;

/// Type alias for module identifiers
pub type ModuleId = uuid::Uuid;

/// Type alias for component identifiers
pub type ComponentId = uuid::Uuid;

/// Type alias for component configuration identifiers
pub type ConfigurationId = uuid::Uuid;

// ============================================================================
// Component Types
// ============================================================================

/// Default option shown by a picker with no stored value
pub const DEFAULT_PICKER_OPTION: &str = "Option 1";

/// Kind of input a component represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Text,
    Number,
    Date,
    Toggle,
    Picker,
}

impl ComponentType {
    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            ComponentType::Text => "Text Input",
            ComponentType::Number => "Number Input",
            ComponentType::Date => "Date Input",
            ComponentType::Toggle => "Toggle Switch",
            ComponentType::Picker => "Picker Select",
        }
    }

    /// Value a fresh or reset component of this type holds
    ///
    /// Dates default to the current time, so two calls differ.
    pub fn default_value(&self) -> FieldValue {
        match self {
            ComponentType::Text => FieldValue::String(String::new()),
            ComponentType::Number => FieldValue::Float(0.0),
            ComponentType::Date => FieldValue::Date(Utc::now()),
            ComponentType::Toggle => FieldValue::Bool(false),
            ComponentType::Picker => FieldValue::String(DEFAULT_PICKER_OPTION.to_string()),
        }
    }

    /// Category whose default rules apply to this type
    pub fn validation_category(&self) -> ValidationCategory {
        match self {
            ComponentType::Text | ComponentType::Picker => ValidationCategory::Text,
            ComponentType::Number => ValidationCategory::Number,
            ComponentType::Date => ValidationCategory::Date,
            ComponentType::Toggle => ValidationCategory::Boolean,
        }
    }

    /// Get all component types
    pub fn all() -> &'static [ComponentType] {
        &[
            ComponentType::Text,
            ComponentType::Number,
            ComponentType::Date,
            ComponentType::Toggle,
            ComponentType::Picker,
        ]
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ComponentType::Text => "text",
            ComponentType::Number => "number",
            ComponentType::Date => "date",
            ComponentType::Toggle => "toggle",
            ComponentType::Picker => "picker",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Validation Categories
// ============================================================================

/// Groups component types that share a default rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationCategory {
    Text,
    Number,
    Date,
    Boolean,
}

// ============================================================================
// Tests
// ============================================================================
