//! Core traits for formkit
//!
//! Shared behaviour of the page tree: identity, validity, timestamps and
//! JSON file persistence.

use crate::error::{FormError, FormResult};
use serde::{Serialize, de::DeserializeOwned};

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types whose validity is derived from their current values
///
/// Validity is never thrown while editing; `validate` turns the collected
/// messages into an error only when a caller asks for one.
pub trait Validatable {
    /// Check if the object is currently valid
    fn is_valid(&self) -> bool;

    /// Describe every invalid part (empty when valid)
    fn validation_errors(&self) -> Vec<String>;

    /// Fail with the aggregated messages if invalid
    fn validate(&self) -> FormResult<()> {
        let errors = self.validation_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(FormError::ModelValidationFailed(errors))
        }
    }
}

// ============================================================================
// Identifiable Trait
// ============================================================================

/// Pages, modules, components and configurations addressed by ID
pub trait Identifiable {
    /// The entity's ID
    fn id(&self) -> uuid::Uuid;

    /// Whether `id` names this entity
    fn matches_id(&self, id: uuid::Uuid) -> bool {
        self.id() == id
    }
}

// ============================================================================
// Timestamped Trait
// ============================================================================

/// Entities whose edits are stamped
pub trait Timestamped {
    /// When the entity was created
    fn created_at(&self) -> chrono::DateTime<chrono::Utc>;

    /// When the entity last changed
    fn updated_at(&self) -> chrono::DateTime<chrono::Utc>;

    /// Stamp an edit at the current time
    fn touch(&mut self);
}

// ============================================================================
// Persistable Trait
// ============================================================================

/// Trait for documents that are written to and read from JSON files
pub trait Persistable: Serialize + DeserializeOwned + Sized {
    /// Extension used for files of this kind, no leading dot
    fn file_extension() -> &'static str;

    /// Pretty-printed JSON
    fn to_json(&self) -> FormResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| FormError::invalid_data(e.to_string()))
    }

    /// Parse from JSON
    fn from_json(json: &str) -> FormResult<Self> {
        serde_json::from_str(json).map_err(|e| FormError::invalid_data(e.to_string()))
    }

    /// Write the JSON form to `path`
    fn save_to_file(&self, path: &std::path::Path) -> FormResult<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| FormError::FileWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read and parse `path`
    fn load_from_file(path: &std::path::Path) -> FormResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| FormError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    struct Flag {
        valid: bool,
    }

    impl Validatable for Flag {
        fn is_valid(&self) -> bool {
            self.valid
        }

        fn validation_errors(&self) -> Vec<String> {
            if self.valid {
                vec![]
            } else {
                vec!["flag is off".to_string()]
            }
        }
    }

    #[test]
    fn test_validatable_trait() {
        assert!(Flag { valid: true }.validate().is_ok());

        let err = Flag { valid: false }.validate().unwrap_err();
        assert!(matches!(err, FormError::ModelValidationFailed(ref m) if m.len() == 1));
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
    }

    impl Persistable for Doc {
        fn file_extension() -> &'static str {
            "json"
        }
    }

    #[test]
    fn test_persistable_file_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("doc.json");
        let doc = Doc {
            name: "intake".to_string(),
        };

        doc.save_to_file(&path).unwrap();
        assert_eq!(Doc::load_from_file(&path).unwrap(), doc);
    }

    #[test]
    fn test_persistable_missing_file() {
        let err = Doc::load_from_file(std::path::Path::new("/nonexistent/doc.json")).unwrap_err();
        assert!(matches!(err, FormError::FileRead { .. }));
    }

    #[test]
    fn test_persistable_invalid_json() {
        let err = Doc::from_json("{not json").unwrap_err();
        assert!(matches!(err, FormError::InvalidData(_)));
    }
}
