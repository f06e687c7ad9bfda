//! Component definitions
//!
//! A `Component` is a single typed input: a title, one [`FieldValue`] and an
//! optional configuration whose rules decide the cached validity flag.

use crate::configuration::{ComponentConfiguration, default_picker_options};
use chrono::{DateTime, Utc};
use formkit_core::{ComponentId, ComponentType, FieldValue, Identifiable, Validatable};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

// ============================================================================
// Component
// ============================================================================

/// A typed form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredComponent")]
pub struct Component {
    /// Unique identifier for this component
    pub id: ComponentId,

    /// Kind of input
    pub component_type: ComponentType,

    /// Field label, also the key in exported values
    pub title: String,

    value: FieldValue,

    /// Shared between duplicates until one of them edits it
    configuration: Option<Arc<ComponentConfiguration>>,

    #[serde(skip)]
    is_valid: bool,
}

impl Component {
    /// Create a component holding its type's default value
    ///
    /// A configuration with the type's default rule set is attached.
    pub fn new(component_type: ComponentType, title: impl Into<String>) -> Self {
        let title = title.into();
        let configuration =
            ComponentConfiguration::for_category(component_type.validation_category(), &title);

        let mut component = Self {
            id: Uuid::new_v4(),
            component_type,
            title,
            value: component_type.default_value(),
            configuration: Some(Arc::new(configuration)),
            is_valid: true,
        };
        component.validate_value();
        component
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set the initial value
    pub fn with_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.set_value(value);
        self
    }

    /// Attach a configuration (owned or shared)
    pub fn with_configuration(mut self, configuration: impl Into<Arc<ComponentConfiguration>>) -> Self {
        self.configuration = Some(configuration.into());
        self.validate_value();
        self
    }

    /// Drop the configuration so any value is accepted
    pub fn without_configuration(mut self) -> Self {
        self.configuration = None;
        self.validate_value();
        self
    }

    // ========================================================================
    // Value
    // ========================================================================

    /// Current value
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Replace the value and revalidate
    ///
    /// A value that cannot be encoded is replaced by the type's default.
    pub fn set_value(&mut self, value: impl Into<FieldValue>) {
        let value = value.into();
        self.value = match value.encode() {
            Ok(_) => value,
            Err(e) => {
                tracing::debug!("Component '{}' value rejected ({}), using default", self.title, e);
                self.component_type.default_value()
            }
        };
        self.validate_value();
    }

    /// Restore the type's default value
    pub fn reset_to_default(&mut self) {
        self.set_value(self.component_type.default_value());
    }

    /// Run the configuration's rules and cache the result
    pub fn validate_value(&mut self) -> bool {
        self.is_valid = self
            .configuration
            .as_deref()
            .is_none_or(|config| config.validate(&self.value));
        self.is_valid
    }

    // ========================================================================
    // Typed accessors
    // ========================================================================

    /// Value as text, empty when not a string
    pub fn string_value(&self) -> String {
        self.value.as_str().unwrap_or_default().to_string()
    }

    pub fn set_string_value(&mut self, value: impl Into<String>) {
        self.set_value(FieldValue::String(value.into()));
    }

    /// Value as a number, zero when not numeric
    pub fn number_value(&self) -> f64 {
        self.value.as_number().unwrap_or(0.0)
    }

    pub fn set_number_value(&mut self, value: f64) {
        self.set_value(FieldValue::Float(value));
    }

    /// Value as a timestamp, now when not a date
    pub fn date_value(&self) -> DateTime<Utc> {
        self.value.as_date().unwrap_or_else(Utc::now)
    }

    pub fn set_date_value(&mut self, value: DateTime<Utc>) {
        self.set_value(FieldValue::Date(value));
    }

    /// Value as a flag, false when not a boolean
    pub fn bool_value(&self) -> bool {
        self.value.as_bool().unwrap_or(false)
    }

    pub fn set_bool_value(&mut self, value: bool) {
        self.set_value(FieldValue::Bool(value));
    }

    /// Choices offered by a picker
    pub fn picker_options(&self) -> Vec<String> {
        self.configuration
            .as_ref()
            .map(|config| config.picker_options.clone())
            .unwrap_or_else(default_picker_options)
    }

    pub fn set_picker_options(&mut self, options: Vec<String>) {
        self.update_configuration(|config| config.picker_options = options);
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Attached configuration, if any
    pub fn configuration(&self) -> Option<&ComponentConfiguration> {
        self.configuration.as_deref()
    }

    /// Shared handle to the configuration
    pub fn shared_configuration(&self) -> Option<Arc<ComponentConfiguration>> {
        self.configuration.clone()
    }

    /// Whether both components point at the same configuration instance
    pub fn shares_configuration_with(&self, other: &Component) -> bool {
        match (&self.configuration, &other.configuration) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Edit the configuration and revalidate
    ///
    /// A configuration shared with other components is copied first, so the
    /// edit is only visible here.
    pub fn update_configuration(&mut self, edit: impl FnOnce(&mut ComponentConfiguration)) {
        let category = self.component_type.validation_category();
        let title = &self.title;
        let shared = self.configuration.get_or_insert_with(|| {
            Arc::new(ComponentConfiguration::for_category(category, title))
        });
        edit(Arc::make_mut(shared));
        self.validate_value();
    }

    /// Message to show for the current value, `None` when valid
    pub fn error_message(&self) -> Option<String> {
        if self.is_valid {
            return None;
        }
        let config = self.configuration.as_deref()?;
        config.error_message.clone().or_else(|| {
            config
                .first_failure(&self.value)
                .map(|rule| rule.error_message())
        })
    }

    // ========================================================================
    // Copies
    // ========================================================================

    /// Copy with a new id and a " Copy" title suffix, sharing the configuration
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4();
        copy.title = format!("{} Copy", self.title);
        copy
    }

    /// Copy with a new id and the type's default value, sharing the configuration
    pub fn blank_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4();
        copy.reset_to_default();
        copy
    }
}

impl Identifiable for Component {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Validatable for Component {
    fn is_valid(&self) -> bool {
        self.is_valid
    }

    fn validation_errors(&self) -> Vec<String> {
        if self.is_valid {
            return vec![];
        }
        let reason = self
            .error_message()
            .unwrap_or_else(|| "Invalid value".to_string());
        vec![format!("{}: {}", self.title, reason)]
    }
}

// ============================================================================
// Deserialization
// ============================================================================

/// Persisted shape; the value is decoded leniently
#[derive(Deserialize)]
struct StoredComponent {
    id: ComponentId,
    component_type: ComponentType,
    title: String,
    #[serde(default)]
    value: serde_json::Value,
    #[serde(default)]
    configuration: Option<ComponentConfiguration>,
}

impl From<StoredComponent> for Component {
    fn from(stored: StoredComponent) -> Self {
        let value = serde_json::from_value::<FieldValue>(stored.value).unwrap_or_else(|e| {
            tracing::warn!(
                "Component '{}' has an unreadable value ({}), using default",
                stored.title,
                e
            );
            stored.component_type.default_value()
        });

        let mut component = Self {
            id: stored.id,
            component_type: stored.component_type,
            title: stored.title,
            value,
            configuration: stored.configuration.map(Arc::new),
            is_valid: true,
        };
        component.validate_value();
        component
    }
}

// ============================================================================
// Tests
// ============================================================================
