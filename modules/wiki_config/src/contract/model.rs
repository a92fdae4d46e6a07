//! Contract models for the wiki configuration
//!
//! These models are transport-agnostic and shared by every backing store.
//! NO serde derives - the persisted shape lives in `domain::document`.

use super::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Every configuration key recognized by the wiki
///
/// Field identity is by exact (case-sensitive) name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigField {
    AdminRoleName,
    EditorRoleName,
    ApiKeys,
    ConnectionString,
    Installed,
    UseWindowsAuthentication,
    IgnoreSearchIndexErrors,
    AttachmentsFolder,
    AttachmentsRoutePath,
    DatabaseName,
    IsPublicSite,
    LdapConnectionString,
    LdapUsername,
    LdapPassword,
    UseHtmlWhiteList,
    UseObjectCache,
    UseBrowserCache,
    UserServiceType,
    UseAzureFileStorage,
    AzureConnectionString,
    AzureContainer,
}

impl ConfigField {
    /// All fields in declaration order (required first)
    pub const ALL: [ConfigField; 21] = [
        Self::AdminRoleName,
        Self::EditorRoleName,
        Self::ApiKeys,
        Self::ConnectionString,
        Self::Installed,
        Self::UseWindowsAuthentication,
        Self::IgnoreSearchIndexErrors,
        Self::AttachmentsFolder,
        Self::AttachmentsRoutePath,
        Self::DatabaseName,
        Self::IsPublicSite,
        Self::LdapConnectionString,
        Self::LdapUsername,
        Self::LdapPassword,
        Self::UseHtmlWhiteList,
        Self::UseObjectCache,
        Self::UseBrowserCache,
        Self::UserServiceType,
        Self::UseAzureFileStorage,
        Self::AzureConnectionString,
        Self::AzureContainer,
    ];

    /// Key used in the backing store
    pub fn name(self) -> &'static str {
        match self {
            Self::AdminRoleName => "AdminRoleName",
            Self::EditorRoleName => "EditorRoleName",
            Self::ApiKeys => "ApiKeys",
            Self::ConnectionString => "ConnectionString",
            Self::Installed => "Installed",
            Self::UseWindowsAuthentication => "UseWindowsAuthentication",
            Self::IgnoreSearchIndexErrors => "IgnoreSearchIndexErrors",
            Self::AttachmentsFolder => "AttachmentsFolder",
            Self::AttachmentsRoutePath => "AttachmentsRoutePath",
            Self::DatabaseName => "DatabaseName",
            Self::IsPublicSite => "IsPublicSite",
            Self::LdapConnectionString => "LdapConnectionString",
            Self::LdapUsername => "LdapUsername",
            Self::LdapPassword => "LdapPassword",
            Self::UseHtmlWhiteList => "UseHtmlWhiteList",
            Self::UseObjectCache => "UseObjectCache",
            Self::UseBrowserCache => "UseBrowserCache",
            Self::UserServiceType => "UserServiceType",
            Self::UseAzureFileStorage => "UseAzureFileStorage",
            Self::AzureConnectionString => "AzureConnectionString",
            Self::AzureContainer => "AzureContainer",
        }
    }

    /// Value kind carried by this field
    pub fn kind(self) -> FieldKind {
        match self {
            Self::Installed
            | Self::UseWindowsAuthentication
            | Self::IgnoreSearchIndexErrors
            | Self::IsPublicSite
            | Self::UseHtmlWhiteList
            | Self::UseObjectCache
            | Self::UseBrowserCache
            | Self::UseAzureFileStorage => FieldKind::Flag,
            _ => FieldKind::Text,
        }
    }

    /// Required fields have no declared default and must be set by the operator
    pub fn is_required(self) -> bool {
        matches!(
            self,
            Self::AdminRoleName
                | Self::EditorRoleName
                | Self::ApiKeys
                | Self::ConnectionString
                | Self::Installed
                | Self::UseWindowsAuthentication
        )
    }

    /// Secrets that must not be echoed back to API callers
    pub fn is_sensitive(self) -> bool {
        matches!(self, Self::LdapPassword | Self::AzureConnectionString)
    }

    /// Look up a field by its exact store key
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    /// Find the field whose name differs from `name` only by letter case
    pub fn case_variant_of(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() != name && field.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigField {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ConfigError::UnknownField {
            name: s.to_string(),
        })
    }
}

/// Scalar kinds supported by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Flag,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("string"),
            Self::Flag => f.write_str("boolean"),
        }
    }
}

/// A single configuration value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Flag(_) => FieldKind::Flag,
        }
    }

    /// Zero value left in place of an absent required field
    pub fn zero(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text => Self::Text(String::new()),
            FieldKind::Flag => Self::Flag(false),
        }
    }

    /// Parse a raw string (database row, environment variable) as `kind`
    ///
    /// Booleans accept `true`/`false` in any letter case.
    pub fn parse(kind: FieldKind, raw: &str) -> Option<Self> {
        match kind {
            FieldKind::Text => Some(Self::Text(raw.to_string())),
            FieldKind::Flag => {
                let raw = raw.trim();
                if raw.eq_ignore_ascii_case("true") {
                    Some(Self::Flag(true))
                } else if raw.eq_ignore_ascii_case("false") {
                    Some(Self::Flag(false))
                } else {
                    None
                }
            }
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Flag(flag) => write!(f, "{}", flag),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// The active wiki configuration
///
/// Required fields hold the zero value when the store omitted them.
/// Optional fields are `None` until defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WikiConfiguration {
    /// Name of the administrator role
    pub admin_role_name: String,
    /// Name of the editor role
    pub editor_role_name: String,
    /// Comma-separated REST API keys; empty disables the REST API
    pub api_keys: String,
    /// Database connection string
    pub connection_string: String,
    /// Whether setup has completed
    pub installed: bool,
    /// Integrated (Windows/Active Directory) authentication instead of forms
    pub use_windows_authentication: bool,

    /// Whether search index update errors are swallowed
    pub ignore_search_index_errors: Option<bool>,
    /// Attachments folder, starting with "~/"
    pub attachments_folder: Option<String>,
    /// Route prefix attachments are served under
    pub attachments_route_path: Option<String>,
    /// Database provider name
    pub database_name: Option<String>,
    /// Whether all pages are visible without login
    pub is_public_site: Option<bool>,
    /// For example: LDAP://mydc01.company.internal
    pub ldap_connection_string: Option<String>,
    pub ldap_username: Option<String>,
    pub ldap_password: Option<String>,
    /// Strip HTML not present in the whitelist
    pub use_html_white_list: Option<bool>,
    /// Server-side page object caching
    pub use_object_cache: Option<bool>,
    /// Browser caching of page content, only honored with the object cache
    pub use_browser_cache: Option<bool>,
    /// Custom user service type name
    pub user_service_type: Option<String>,
    pub use_azure_file_storage: Option<bool>,
    pub azure_connection_string: Option<String>,
    pub azure_container: Option<String>,
}

/// Which mode the hosting application must start in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupMode {
    /// Configuration is complete; serve the wiki
    Normal,
    /// Route every request to the setup workflow
    Setup(SetupReason),
}

/// Why the setup workflow is required
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupReason {
    /// `Installed` is false
    NotInstalled,
    /// The store omitted required fields
    MissingRequired(Vec<ConfigField>),
}

impl StartupMode {
    pub fn is_setup(&self) -> bool {
        matches!(self, Self::Setup(_))
    }
}

impl fmt::Display for StartupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Setup(SetupReason::NotInstalled) => write!(f, "setup (not installed)"),
            Self::Setup(SetupReason::MissingRequired(fields)) => {
                let names: Vec<&str> = fields.iter().map(|field| field.name()).collect();
                write!(f, "setup (missing {})", names.join(", "))
            }
        }
    }
}
