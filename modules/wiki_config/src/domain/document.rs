//! Flat key-value document as held by a backing store
//!
//! Any serde format (JSON, YAML) deserializes into `StoredSettings`:
//! unrecognized keys are ignored, `null` counts as absent, repeated and
//! case-variant keys are rejected.

use crate::contract::{ConfigError, ConfigField, FieldKind, FieldValue, WikiSettings};
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Raw stored values, keyed by field; absent keys are simply missing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredSettings {
    entries: BTreeMap<ConfigField, FieldValue>,
}

impl StoredSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the stored values of any other representation
    pub fn from_settings<S: WikiSettings + ?Sized>(source: &S) -> Self {
        let entries = ConfigField::ALL
            .into_iter()
            .filter_map(|field| {
                source
                    .stored_value(field)
                    .filter(|value| value.kind() == field.kind())
                    .map(|value| (field, value))
            })
            .collect();
        Self { entries }
    }

    /// Build from string pairs (database rows, environment variables)
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut settings = Self::new();
        let mut seen = HashSet::new();
        for (key, raw) in pairs {
            let Some(field) = resolve_key(key.as_ref(), &mut seen)? else {
                continue;
            };
            let value = FieldValue::parse(field.kind(), raw.as_ref())
                .ok_or_else(|| mismatch(field))?;
            settings.entries.insert(field, value);
        }
        Ok(settings)
    }

    /// Every entry rendered as a string pair, in field order
    pub fn to_string_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(field, value)| (field.name().to_string(), value.to_string()))
            .collect()
    }

    pub fn contains(&self, field: ConfigField) -> bool {
        self.entries.contains_key(&field)
    }

    pub fn remove(&mut self, field: ConfigField) -> Option<FieldValue> {
        self.entries.remove(&field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConfigField, &FieldValue)> {
        self.entries.iter().map(|(field, value)| (*field, value))
    }
}

impl WikiSettings for StoredSettings {
    fn stored_value(&self, field: ConfigField) -> Option<FieldValue> {
        self.entries.get(&field).cloned()
    }

    fn set(&mut self, field: ConfigField, value: FieldValue) -> Result<(), ConfigError> {
        if value.kind() != field.kind() {
            return Err(mismatch(field));
        }
        self.entries.insert(field, value);
        Ok(())
    }
}

fn mismatch(field: ConfigField) -> ConfigError {
    ConfigError::TypeMismatch {
        field: field.name().to_string(),
        expected: field.kind(),
    }
}

/// Map a store key to a field, enforcing identity by exact name
fn resolve_key(key: &str, seen: &mut HashSet<String>) -> Result<Option<ConfigField>, ConfigError> {
    if !seen.insert(key.to_string()) {
        return Err(ConfigError::DuplicateKey {
            key: key.to_string(),
        });
    }
    if let Some(field) = ConfigField::from_name(key) {
        return Ok(Some(field));
    }
    if let Some(field) = ConfigField::case_variant_of(key) {
        return Err(ConfigError::CaseVariantKey {
            key: key.to_string(),
            field: field.name().to_string(),
        });
    }
    tracing::debug!(key, "Ignoring unrecognized configuration key");
    Ok(None)
}

/// Scalar as it appears in a document
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredScalar {
    Flag(bool),
    Text(String),
}

impl StoredScalar {
    fn into_value(self, field: ConfigField) -> Result<FieldValue, ConfigError> {
        match (field.kind(), self) {
            (FieldKind::Flag, Self::Flag(flag)) => Ok(FieldValue::Flag(flag)),
            (FieldKind::Flag, Self::Text(text)) => {
                FieldValue::parse(FieldKind::Flag, &text).ok_or_else(|| mismatch(field))
            }
            (FieldKind::Text, Self::Text(text)) => Ok(FieldValue::Text(text)),
            (FieldKind::Text, Self::Flag(_)) => Err(mismatch(field)),
        }
    }
}

struct StoredSettingsVisitor;

impl<'de> Visitor<'de> for StoredSettingsVisitor {
    type Value = StoredSettings;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of configuration keys to scalar values")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut settings = StoredSettings::new();
        let mut seen = HashSet::new();

        while let Some(key) = map.next_key::<String>()? {
            match resolve_key(&key, &mut seen).map_err(de::Error::custom)? {
                Some(field) => {
                    if let Some(scalar) = map.next_value::<Option<StoredScalar>>()? {
                        let value = scalar.into_value(field).map_err(de::Error::custom)?;
                        settings.entries.insert(field, value);
                    }
                }
                None => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(settings)
    }
}

impl<'de> Deserialize<'de> for StoredSettings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(StoredSettingsVisitor)
    }
}

impl Serialize for StoredSettings {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, value) in &self.entries {
            match value {
                FieldValue::Text(text) => map.serialize_entry(field.name(), text)?,
                FieldValue::Flag(flag) => map.serialize_entry(field.name(), flag)?,
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_json_document() {
        let settings: StoredSettings = serde_json::from_str(
            r#"{
                "ConnectionString": "Server=x",
                "Installed": true,
                "UseHtmlWhiteList": "False",
                "SiteTheme": { "name": "Mediawiki" }
            }"#,
        )
        .unwrap();

        assert_eq!(settings.len(), 3);
        assert_eq!(
            settings.stored_value(ConfigField::ConnectionString),
            Some(FieldValue::from("Server=x"))
        );
        assert_eq!(
            settings.stored_value(ConfigField::UseHtmlWhiteList),
            Some(FieldValue::Flag(false))
        );
    }

    #[test]
    fn test_null_counts_as_absent() {
        let settings: StoredSettings =
            serde_json::from_str(r#"{ "UseObjectCache": null, "ApiKeys": "" }"#).unwrap();
        assert!(!settings.contains(ConfigField::UseObjectCache));
        assert!(settings.get(ConfigField::UseObjectCache) == FieldValue::Flag(true));
        assert_eq!(
            settings.stored_value(ConfigField::ApiKeys),
            Some(FieldValue::Text(String::new()))
        );
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = serde_json::from_str::<StoredSettings>(
            r#"{ "Installed": true, "Installed": false }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Duplicate configuration key: Installed"));
    }

    #[test]
    fn test_case_variant_key_rejected() {
        let err = serde_json::from_str::<StoredSettings>(r#"{ "installed": true }"#).unwrap_err();
        assert!(err.to_string().contains("only by case"));
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        assert!(serde_json::from_str::<StoredSettings>(r#"{ "Installed": "maybe" }"#).is_err());
        assert!(serde_json::from_str::<StoredSettings>(r#"{ "DatabaseName": true }"#).is_err());
    }

    #[test]
    fn test_yaml_document() {
        let settings: StoredSettings = serde_yaml::from_str(
            "AdminRoleName: Admins\nUseWindowsAuthentication: false\nAttachmentsRoutePath: files\n",
        )
        .unwrap();
        assert_eq!(settings.admin_role_name(), "Admins");
        assert!(!settings.use_windows_authentication());
        assert_eq!(settings.attachments_route_path(), "files");
    }

    #[test]
    fn test_serialize_uses_field_names() {
        let mut settings = StoredSettings::new();
        settings.set(ConfigField::Installed, FieldValue::Flag(false)).unwrap();
        settings.set(ConfigField::AzureContainer, FieldValue::from("media")).unwrap();

        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "Installed": false, "AzureContainer": "media" })
        );
    }

    #[test]
    fn test_apply_defaults_on_stored_document() {
        let mut settings = StoredSettings::from_pairs([
            ("Installed", "true"),
            ("UseObjectCache", "false"),
        ])
        .unwrap();

        let applied = crate::contract::apply_defaults(&mut settings);

        assert_eq!(applied.len(), crate::contract::DECLARED_DEFAULTS.len() - 1);
        assert!(!applied.contains(&ConfigField::UseObjectCache));
        assert_eq!(
            settings.stored_value(ConfigField::UseObjectCache),
            Some(FieldValue::Flag(false))
        );
        // Required fields never receive a value
        assert!(!settings.contains(ConfigField::ConnectionString));
        assert_eq!(settings.len(), 1 + crate::contract::DECLARED_DEFAULTS.len());
        assert!(crate::contract::apply_defaults(&mut settings).is_empty());
    }

    #[test]
    fn test_from_pairs() {
        let settings = StoredSettings::from_pairs([
            ("Installed", "true"),
            ("DatabaseName", "Postgres"),
            ("Obsolete", "1"),
        ])
        .unwrap();
        assert!(settings.installed());
        assert_eq!(settings.database_name(), "Postgres");
        assert_eq!(settings.len(), 2);

        let err = StoredSettings::from_pairs([("IsPublicSite", "sometimes")]).unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { .. }));

        let err = StoredSettings::from_pairs([("ApiKeys", "a"), ("APIKEYS", "b")]).unwrap_err();
        assert!(matches!(err, ConfigError::CaseVariantKey { .. }));
    }
}
