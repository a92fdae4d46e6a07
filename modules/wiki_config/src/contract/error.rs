//! Contract error types for the wiki configuration
//!
//! These errors are transport-agnostic. Absent keys are never errors.

use super::model::FieldKind;

/// Wiki configuration errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Name does not identify a configuration field
    UnknownField {
        /// Name as supplied by the caller
        name: String,
    },
    /// Value kind does not match the field kind
    TypeMismatch {
        /// Field name
        field: String,
        /// Kind the field carries
        expected: FieldKind,
    },
    /// Same key appears more than once in the backing store
    DuplicateKey {
        /// Repeated key
        key: String,
    },
    /// Key differs from a field name only by letter case
    CaseVariantKey {
        /// Key found in the store
        key: String,
        /// Field name it collides with
        field: String,
    },
    /// Backing store could not be read or parsed
    Load {
        /// Store description
        store: String,
        /// Error details
        details: String,
    },
    /// Backing store could not be written
    Save {
        /// Store description
        store: String,
        /// Error details
        details: String,
    },
    /// Setup cannot finish while required fields are unset
    SetupIncomplete {
        /// Names of the unset required fields
        missing: Vec<String>,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownField { name } => {
                write!(f, "Unknown configuration field: {}", name)
            }
            Self::TypeMismatch { field, expected } => {
                write!(f, "Field {} expects a {} value", field, expected)
            }
            Self::DuplicateKey { key } => {
                write!(f, "Duplicate configuration key: {}", key)
            }
            Self::CaseVariantKey { key, field } => {
                write!(f, "Configuration key '{}' differs from '{}' only by case", key, field)
            }
            Self::Load { store, details } => {
                write!(f, "Failed to load configuration from {}: {}", store, details)
            }
            Self::Save { store, details } => {
                write!(f, "Failed to save configuration to {}: {}", store, details)
            }
            Self::SetupIncomplete { missing } => {
                write!(f, "Setup is incomplete, required fields are unset: {}", missing.join(", "))
            }
        }
    }
}

impl std::error::Error for ConfigError {}
