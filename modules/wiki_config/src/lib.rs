//! Wiki Configuration Module
//!
//! Typed configuration schema for a wiki engine. Settings live in a
//! pluggable backing store (JSON/YAML file, database table, environment
//! overlay); optional fields receive declared defaults on load so every
//! consumer sees one complete, typed configuration.

// Public exports
pub mod contract;
pub use contract::{
    client::ConfigurationApi, error::ConfigError, ConfigField, FieldKind, FieldValue,
    SetupReason, StartupMode, WikiConfiguration, WikiSettings,
};

pub mod config;
pub use config::{Config, StoreConfig};

pub mod module;
pub use module::WikiConfigModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
