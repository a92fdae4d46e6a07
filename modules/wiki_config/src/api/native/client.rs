//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    ConfigError, ConfigField, ConfigurationApi, FieldValue, StartupMode, WikiConfiguration,
};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;

/// Native client implementation that directly calls the domain service
///
/// Handed to the authentication, storage, caching and search subsystems.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ConfigurationApi for NativeClient {
    async fn configuration(&self) -> WikiConfiguration {
        self.service.configuration()
    }

    async fn get_field(&self, field: ConfigField) -> FieldValue {
        self.service.get(field)
    }

    async fn set_field(
        &self,
        field: ConfigField,
        value: FieldValue,
    ) -> Result<FieldValue, ConfigError> {
        self.service.set(field, value).await
    }

    async fn save(&self) -> Result<(), ConfigError> {
        self.service.save().await
    }

    async fn reload(&self) -> Result<(), ConfigError> {
        self.service.reload().await
    }

    async fn startup_mode(&self) -> StartupMode {
        self.service.startup_mode()
    }

    async fn complete_setup(&self) -> Result<(), ConfigError> {
        self.service.complete_setup().await
    }
}
