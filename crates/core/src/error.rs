//! Error types for formkit
//!
//! This module provides the error taxonomy shared by the model and the
//! store: data errors wrapping storage failures, validation errors,
//! model-consistency errors and a small set of general errors.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for formkit
#[derive(Debug, Error)]
pub enum FormError {
    // ========================================================================
    // Data Errors
    // ========================================================================
    /// The requested record does not exist
    #[error("The requested data could not be found: {0}")]
    DataNotFound(String),

    /// The data is invalid or corrupted
    #[error("The data is invalid or corrupted: {0}")]
    InvalidData(String),

    /// Persisting a change failed
    #[error("Failed to save data: {0}")]
    SaveFailed(#[source] StorageError),

    /// Reading persisted data failed
    #[error("Failed to load data: {0}")]
    LoadFailed(#[source] StorageError),

    /// Persisting a delete failed
    #[error("Failed to delete data: {0}")]
    DeleteFailed(#[source] StorageError),

    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// Invalid value for a field
    #[error("Invalid value provided for {0}")]
    InvalidValue(String),

    /// Required field left empty
    #[error("{0} is required")]
    RequiredFieldMissing(String),

    /// Value has the wrong format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Value outside of the allowed bounds
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    // ========================================================================
    // Model Errors
    // ========================================================================
    /// No persistence context is available
    #[error("Persistence context is missing")]
    ModelContextMissing,

    /// One or more pages failed validation
    #[error("Validation failed: {}", .0.join(", "))]
    ModelValidationFailed(Vec<String>),

    /// A parent/child relationship is broken
    #[error("Relationship error: {0}")]
    ModelRelationship(String),

    // ========================================================================
    // Value Errors
    // ========================================================================
    /// A field value could not be encoded or decoded
    #[error("Value cannot be decoded: {0}")]
    Decode(String),

    // ========================================================================
    // File / Settings Errors
    // ========================================================================
    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Unexpected error
    #[error("Unknown error: {0}")]
    Unknown(String),

    /// Free-form error
    #[error("{0}")]
    Custom(String),
}

impl FormError {
    /// Create a not-found error
    pub fn not_found(what: impl Into<String>) -> Self {
        FormError::DataNotFound(what.into())
    }

    /// Create an invalid-data error
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        FormError::InvalidData(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        FormError::Decode(msg.into())
    }

    /// Create a free-form error
    pub fn custom(msg: impl Into<String>) -> Self {
        FormError::Custom(msg.into())
    }

    /// Check if this error is a data error
    pub fn is_data(&self) -> bool {
        matches!(
            self,
            FormError::DataNotFound(_)
                | FormError::InvalidData(_)
                | FormError::SaveFailed(_)
                | FormError::LoadFailed(_)
                | FormError::DeleteFailed(_)
        )
    }

    /// Check if this error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FormError::InvalidValue(_)
                | FormError::RequiredFieldMissing(_)
                | FormError::InvalidFormat(_)
                | FormError::OutOfRange(_)
                | FormError::ModelValidationFailed(_)
        )
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, FormError::DataNotFound(_))
    }

    /// A short hint shown next to the error message
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            FormError::DataNotFound(_) => "Please check if the data exists and try again",
            FormError::InvalidData(_) | FormError::Decode(_) => {
                "Please ensure the data is in the correct format"
            }
            FormError::SaveFailed(_) => "Please try saving again",
            FormError::LoadFailed(_) => "Please check your storage location and try again",
            FormError::DeleteFailed(_) => "Please try deleting again",
            FormError::InvalidValue(_) => "Please check the input value and try again",
            FormError::RequiredFieldMissing(_) => "Please fill in all required fields",
            FormError::InvalidFormat(_) => "Please check the format and try again",
            FormError::OutOfRange(_) => "Please enter a value within the allowed range",
            FormError::ModelContextMissing => "Please ensure the store is opened before use",
            FormError::ModelValidationFailed(_) => "Please check the input values and try again",
            FormError::ModelRelationship(_) => "Please check the related items and try again",
            FormError::FileRead { .. } | FormError::FileWrite { .. } => {
                "Please check the file permissions and try again"
            }
            FormError::InvalidConfig(_) => "Please fix the settings file or reset it",
            FormError::Unknown(_) => "Please try the operation again",
            FormError::Custom(_) => "Please try again or contact support if the issue persists",
        }
    }
}

/// Result type alias using FormError
pub type FormResult<T> = Result<T, FormError>;

// ============================================================================
// StorageError
// ============================================================================

/// Failure reported by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend refused the operation
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// Tests
// ============================================================================
