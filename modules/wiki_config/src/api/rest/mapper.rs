//! Mappers between REST DTOs and contract models

use super::dto::*;
use crate::contract::{
    ConfigError, ConfigField, FieldKind, FieldValue, SetupReason, StartupMode, WikiSettings,
};
use crate::domain::LoadedConfiguration;

const REDACTED: &str = "********";

// ===== Value conversions =====

pub fn value_to_json(value: &FieldValue) -> serde_json::Value {
    match value {
        FieldValue::Text(text) => serde_json::Value::String(text.clone()),
        FieldValue::Flag(flag) => serde_json::Value::Bool(*flag),
    }
}

/// Convert a JSON scalar to a value of the field's kind
pub fn json_to_value(
    field: ConfigField,
    value: serde_json::Value,
) -> Result<FieldValue, ConfigError> {
    let mismatch = || ConfigError::TypeMismatch {
        field: field.name().to_string(),
        expected: field.kind(),
    };

    match (field.kind(), value) {
        (FieldKind::Text, serde_json::Value::String(text)) => Ok(FieldValue::Text(text)),
        (FieldKind::Flag, serde_json::Value::Bool(flag)) => Ok(FieldValue::Flag(flag)),
        (FieldKind::Flag, serde_json::Value::String(text)) => {
            FieldValue::parse(FieldKind::Flag, &text).ok_or_else(mismatch)
        }
        _ => Err(mismatch()),
    }
}

// ===== Field conversions =====

pub fn field_dto(field: ConfigField, loaded: &LoadedConfiguration) -> FieldDto {
    let value = loaded.configuration.get(field);
    let redacted = field.is_sensitive() && value.as_text().is_some_and(|text| !text.is_empty());

    FieldDto {
        name: field.name().to_string(),
        kind: field.kind().to_string(),
        required: field.is_required(),
        value: if redacted {
            serde_json::Value::String(REDACTED.to_string())
        } else {
            value_to_json(&value)
        },
        is_default: loaded.defaults_applied.contains(&field),
        redacted,
    }
}

pub fn configuration_response(loaded: &LoadedConfiguration) -> ConfigurationResponse {
    let items: Vec<FieldDto> = ConfigField::ALL
        .into_iter()
        .map(|field| field_dto(field, loaded))
        .collect();
    let total = items.len();
    ConfigurationResponse { items, total }
}

// ===== Status conversions =====

pub fn status_dto(loaded: &LoadedConfiguration, store: String) -> StatusDto {
    let (mode, setup_reason) = match loaded.startup_mode() {
        StartupMode::Normal => ("normal", None),
        StartupMode::Setup(SetupReason::NotInstalled) => {
            ("setup", Some("not_installed".to_string()))
        }
        StartupMode::Setup(SetupReason::MissingRequired(_)) => {
            ("setup", Some("missing_required".to_string()))
        }
    };

    StatusDto {
        mode: mode.to_string(),
        setup_reason,
        missing_required: loaded
            .missing_required
            .iter()
            .map(|field| field.name().to_string())
            .collect(),
        installed: loaded.configuration.installed,
        dirty: loaded.dirty,
        store,
        loaded_at: loaded.loaded_at,
    }
}
