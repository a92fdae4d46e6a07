//! Native client trait for in-process consumers
//!
//! Authentication, storage, caching, search and setup subsystems read the
//! configuration through this trait. NO HTTP - direct function calls.

use super::{
    error::ConfigError,
    model::{ConfigField, FieldValue, StartupMode, WikiConfiguration},
};
use async_trait::async_trait;

/// Wiki configuration API for inter-module communication
#[async_trait]
pub trait ConfigurationApi: Send + Sync {
    /// Snapshot of the active configuration with defaults applied
    async fn configuration(&self) -> WikiConfiguration;

    /// Current value of a single field
    async fn get_field(&self, field: ConfigField) -> FieldValue;

    /// Assign a field in memory; returns the previous value.
    /// Nothing is persisted until `save`.
    async fn set_field(
        &self,
        field: ConfigField,
        value: FieldValue,
    ) -> Result<FieldValue, ConfigError>;

    /// Persist the in-memory configuration and reload it from the store
    async fn save(&self) -> Result<(), ConfigError>;

    /// Discard in-memory changes and reload from the store
    async fn reload(&self) -> Result<(), ConfigError>;

    /// Whether the host must route to the setup workflow
    async fn startup_mode(&self) -> StartupMode;

    /// Mark setup as finished (`Installed = true`) and persist
    async fn complete_setup(&self) -> Result<(), ConfigError>;
}
