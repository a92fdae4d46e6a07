//! Capability interface over any configuration representation
//!
//! Backing stores only provide `stored_value`/`set`; defaults, typed
//! accessors and the `ApiKeys` rules are shared.

use super::defaults::declared_default;
use super::error::ConfigError;
use super::model::{ConfigField, FieldValue, WikiConfiguration};

/// Get/Set access to the wiki configuration fields
pub trait WikiSettings {
    /// Value held by the representation, `None` when absent
    fn stored_value(&self, field: ConfigField) -> Option<FieldValue>;

    /// Assign a value in memory. Fails only when the value kind does not
    /// match the field kind; no semantic validation happens here.
    fn set(&mut self, field: ConfigField, value: FieldValue) -> Result<(), ConfigError>;

    /// Current value; optional fields fall back to their declared default,
    /// required fields to the zero value
    fn get(&self, field: ConfigField) -> FieldValue {
        self.stored_value(field)
            .or_else(|| declared_default(field))
            .unwrap_or_else(|| FieldValue::zero(field.kind()))
    }

    fn text(&self, field: ConfigField) -> String {
        match self.get(field) {
            FieldValue::Text(text) => text,
            FieldValue::Flag(flag) => flag.to_string(),
        }
    }

    fn flag(&self, field: ConfigField) -> bool {
        self.get(field).as_flag().unwrap_or(false)
    }

    /// Parsed `ApiKeys`: comma separated, trimmed, empty entries dropped
    fn api_key_list(&self) -> Vec<String> {
        self.text(ConfigField::ApiKeys)
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// An empty `ApiKeys` disables the REST API
    fn is_rest_api_enabled(&self) -> bool {
        !self.api_key_list().is_empty()
    }

    // ===== Typed accessors =====

    fn admin_role_name(&self) -> String {
        self.text(ConfigField::AdminRoleName)
    }

    fn editor_role_name(&self) -> String {
        self.text(ConfigField::EditorRoleName)
    }

    fn api_keys(&self) -> String {
        self.text(ConfigField::ApiKeys)
    }

    fn connection_string(&self) -> String {
        self.text(ConfigField::ConnectionString)
    }

    fn installed(&self) -> bool {
        self.flag(ConfigField::Installed)
    }

    fn use_windows_authentication(&self) -> bool {
        self.flag(ConfigField::UseWindowsAuthentication)
    }

    fn ignore_search_index_errors(&self) -> bool {
        self.flag(ConfigField::IgnoreSearchIndexErrors)
    }

    fn attachments_folder(&self) -> String {
        self.text(ConfigField::AttachmentsFolder)
    }

    fn attachments_route_path(&self) -> String {
        self.text(ConfigField::AttachmentsRoutePath)
    }

    fn database_name(&self) -> String {
        self.text(ConfigField::DatabaseName)
    }

    fn is_public_site(&self) -> bool {
        self.flag(ConfigField::IsPublicSite)
    }

    fn ldap_connection_string(&self) -> String {
        self.text(ConfigField::LdapConnectionString)
    }

    fn ldap_username(&self) -> String {
        self.text(ConfigField::LdapUsername)
    }

    fn ldap_password(&self) -> String {
        self.text(ConfigField::LdapPassword)
    }

    fn use_html_white_list(&self) -> bool {
        self.flag(ConfigField::UseHtmlWhiteList)
    }

    fn use_object_cache(&self) -> bool {
        self.flag(ConfigField::UseObjectCache)
    }

    fn use_browser_cache(&self) -> bool {
        self.flag(ConfigField::UseBrowserCache)
    }

    fn user_service_type(&self) -> String {
        self.text(ConfigField::UserServiceType)
    }

    fn use_azure_file_storage(&self) -> bool {
        self.flag(ConfigField::UseAzureFileStorage)
    }

    fn azure_connection_string(&self) -> String {
        self.text(ConfigField::AzureConnectionString)
    }

    fn azure_container(&self) -> String {
        self.text(ConfigField::AzureContainer)
    }
}

fn mismatch(field: ConfigField) -> ConfigError {
    ConfigError::TypeMismatch {
        field: field.name().to_string(),
        expected: field.kind(),
    }
}

impl WikiConfiguration {
    /// Copy every stored value out of another representation
    ///
    /// Defaults are not applied; absent required fields stay at zero.
    pub fn from_settings<S: WikiSettings + ?Sized>(source: &S) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for field in ConfigField::ALL {
            if let Some(value) = source.stored_value(field) {
                config.set(field, value)?;
            }
        }
        Ok(config)
    }

    /// Same as `apply_defaults`, by value
    pub fn with_defaults(mut self) -> Self {
        super::defaults::apply_defaults(&mut self);
        self
    }

    fn text_slot(&mut self, field: ConfigField) -> Option<&mut Option<String>> {
        let slot = match field {
            ConfigField::AttachmentsFolder => &mut self.attachments_folder,
            ConfigField::AttachmentsRoutePath => &mut self.attachments_route_path,
            ConfigField::DatabaseName => &mut self.database_name,
            ConfigField::LdapConnectionString => &mut self.ldap_connection_string,
            ConfigField::LdapUsername => &mut self.ldap_username,
            ConfigField::LdapPassword => &mut self.ldap_password,
            ConfigField::UserServiceType => &mut self.user_service_type,
            ConfigField::AzureConnectionString => &mut self.azure_connection_string,
            ConfigField::AzureContainer => &mut self.azure_container,
            _ => return None,
        };
        Some(slot)
    }

    fn flag_slot(&mut self, field: ConfigField) -> Option<&mut Option<bool>> {
        let slot = match field {
            ConfigField::IgnoreSearchIndexErrors => &mut self.ignore_search_index_errors,
            ConfigField::IsPublicSite => &mut self.is_public_site,
            ConfigField::UseHtmlWhiteList => &mut self.use_html_white_list,
            ConfigField::UseObjectCache => &mut self.use_object_cache,
            ConfigField::UseBrowserCache => &mut self.use_browser_cache,
            ConfigField::UseAzureFileStorage => &mut self.use_azure_file_storage,
            _ => return None,
        };
        Some(slot)
    }
}

impl WikiSettings for WikiConfiguration {
    fn stored_value(&self, field: ConfigField) -> Option<FieldValue> {
        let text = |value: &Option<String>| value.clone().map(FieldValue::Text);
        let flag = |value: &Option<bool>| value.map(FieldValue::Flag);

        match field {
            ConfigField::AdminRoleName => Some(FieldValue::Text(self.admin_role_name.clone())),
            ConfigField::EditorRoleName => Some(FieldValue::Text(self.editor_role_name.clone())),
            ConfigField::ApiKeys => Some(FieldValue::Text(self.api_keys.clone())),
            ConfigField::ConnectionString => {
                Some(FieldValue::Text(self.connection_string.clone()))
            }
            ConfigField::Installed => Some(FieldValue::Flag(self.installed)),
            ConfigField::UseWindowsAuthentication => {
                Some(FieldValue::Flag(self.use_windows_authentication))
            }
            ConfigField::IgnoreSearchIndexErrors => flag(&self.ignore_search_index_errors),
            ConfigField::AttachmentsFolder => text(&self.attachments_folder),
            ConfigField::AttachmentsRoutePath => text(&self.attachments_route_path),
            ConfigField::DatabaseName => text(&self.database_name),
            ConfigField::IsPublicSite => flag(&self.is_public_site),
            ConfigField::LdapConnectionString => text(&self.ldap_connection_string),
            ConfigField::LdapUsername => text(&self.ldap_username),
            ConfigField::LdapPassword => text(&self.ldap_password),
            ConfigField::UseHtmlWhiteList => flag(&self.use_html_white_list),
            ConfigField::UseObjectCache => flag(&self.use_object_cache),
            ConfigField::UseBrowserCache => flag(&self.use_browser_cache),
            ConfigField::UserServiceType => text(&self.user_service_type),
            ConfigField::UseAzureFileStorage => flag(&self.use_azure_file_storage),
            ConfigField::AzureConnectionString => text(&self.azure_connection_string),
            ConfigField::AzureContainer => text(&self.azure_container),
        }
    }

    fn set(&mut self, field: ConfigField, value: FieldValue) -> Result<(), ConfigError> {
        match (field, value) {
            (ConfigField::AdminRoleName, FieldValue::Text(text)) => self.admin_role_name = text,
            (ConfigField::EditorRoleName, FieldValue::Text(text)) => self.editor_role_name = text,
            (ConfigField::ApiKeys, FieldValue::Text(text)) => self.api_keys = text,
            (ConfigField::ConnectionString, FieldValue::Text(text)) => {
                self.connection_string = text
            }
            (ConfigField::Installed, FieldValue::Flag(flag)) => self.installed = flag,
            (ConfigField::UseWindowsAuthentication, FieldValue::Flag(flag)) => {
                self.use_windows_authentication = flag
            }
            (field, FieldValue::Text(text)) => {
                *self.text_slot(field).ok_or_else(|| mismatch(field))? = Some(text)
            }
            (field, FieldValue::Flag(flag)) => {
                *self.flag_slot(field).ok_or_else(|| mismatch(field))? = Some(flag)
            }
        }
        Ok(())
    }
}
