//! REST DTOs with serde derives for HTTP API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Single configuration field
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldDto {
    /// Field name as used in the backing store
    #[schema(example = "UseObjectCache")]
    pub name: String,

    /// Value kind
    #[schema(example = "boolean")]
    pub kind: String,

    /// Whether the operator must set this field
    pub required: bool,

    /// Current value (string or boolean)
    pub value: serde_json::Value,

    /// Whether the value came from the declared default
    pub is_default: bool,

    /// Whether the value was withheld
    #[serde(default)]
    pub redacted: bool,
}

/// Every configuration field
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConfigurationResponse {
    /// Fields in declaration order
    pub items: Vec<FieldDto>,

    /// Total count
    pub total: usize,
}

/// Field update request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateFieldRequest {
    /// New value; booleans also accept "true"/"false"
    pub value: serde_json::Value,
}

/// Lifecycle status of the configuration
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusDto {
    /// "normal" or "setup"
    #[schema(example = "normal")]
    pub mode: String,

    /// Why setup is required
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_reason: Option<String>,

    /// Required fields absent from the store
    pub missing_required: Vec<String>,

    /// Value of `Installed`
    pub installed: bool,

    /// In-memory changes not yet saved
    pub dirty: bool,

    /// Backing store description
    pub store: String,

    /// Time of the last load
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

// Note: Conversion implementations live in mapper.rs
