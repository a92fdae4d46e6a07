//! Declared defaults for optional configuration fields

use super::model::{ConfigField, FieldValue};
use super::settings::WikiSettings;

/// Default value declared for an optional field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredDefault {
    Text(&'static str),
    Flag(bool),
}

impl DeclaredDefault {
    pub fn to_value(self) -> FieldValue {
        match self {
            Self::Text(text) => FieldValue::Text(text.to_string()),
            Self::Flag(flag) => FieldValue::Flag(flag),
        }
    }
}

/// Field -> default table; required fields never appear here
pub const DECLARED_DEFAULTS: [(ConfigField, DeclaredDefault); 15] = [
    (ConfigField::IgnoreSearchIndexErrors, DeclaredDefault::Flag(true)),
    (ConfigField::AttachmentsFolder, DeclaredDefault::Text("~/App_Data/Attachments")),
    (ConfigField::AttachmentsRoutePath, DeclaredDefault::Text("Attachments")),
    (ConfigField::DatabaseName, DeclaredDefault::Text("SqlServer2008")),
    (ConfigField::IsPublicSite, DeclaredDefault::Flag(true)),
    (ConfigField::LdapConnectionString, DeclaredDefault::Text("")),
    (ConfigField::LdapUsername, DeclaredDefault::Text("")),
    (ConfigField::LdapPassword, DeclaredDefault::Text("")),
    (ConfigField::UseHtmlWhiteList, DeclaredDefault::Flag(true)),
    (ConfigField::UseObjectCache, DeclaredDefault::Flag(true)),
    (ConfigField::UseBrowserCache, DeclaredDefault::Flag(true)),
    (ConfigField::UserServiceType, DeclaredDefault::Text("")),
    // Declared upstream as "" on a boolean field; false is the intended value.
    (ConfigField::UseAzureFileStorage, DeclaredDefault::Flag(false)),
    (ConfigField::AzureConnectionString, DeclaredDefault::Text("")),
    (ConfigField::AzureContainer, DeclaredDefault::Text("")),
];

/// Declared default for `field`, `None` for required fields
pub fn declared_default(field: ConfigField) -> Option<FieldValue> {
    DECLARED_DEFAULTS
        .iter()
        .find(|(candidate, _)| *candidate == field)
        .map(|(_, default)| default.to_value())
}

/// Assign the declared default to every optional field that is absent
///
/// Explicit values are never overwritten, so calling this again is a no-op.
/// Returns the fields that received a default.
pub fn apply_defaults<S: WikiSettings + ?Sized>(settings: &mut S) -> Vec<ConfigField> {
    let mut applied = Vec::new();
    for (field, default) in DECLARED_DEFAULTS {
        if settings.stored_value(field).is_some() {
            continue;
        }
        match settings.set(field, default.to_value()) {
            Ok(()) => applied.push(field),
            // The table's kinds are checked by test_default_kinds_match_fields
            Err(e) => debug_assert!(false, "declared default rejected: {}", e),
        }
    }
    applied
}
