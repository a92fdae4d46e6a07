//! Contract layer - public configuration schema and client API
//!
//! Transport-agnostic models, the declared-default table and the
//! capability traits consumers program against.

pub mod client;
pub mod defaults;
pub mod error;
pub mod model;
pub mod settings;

pub use client::ConfigurationApi;
pub use defaults::{apply_defaults, declared_default, DeclaredDefault, DECLARED_DEFAULTS};
pub use error::ConfigError;
pub use model::{
    ConfigField, FieldKind, FieldValue, SetupReason, StartupMode, WikiConfiguration,
};
pub use settings::WikiSettings;
