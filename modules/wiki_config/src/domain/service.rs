//! Domain service - load, default application and the save path

use super::document::StoredSettings;
use super::events::{ConfigurationEvent, EventPublisher};
use super::repository::ConfigurationStore;
use super::validation;
use crate::contract::{
    apply_defaults, ConfigError, ConfigField, FieldValue, StartupMode, WikiConfiguration,
    WikiSettings,
};
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Configuration as last loaded, plus what the load observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfiguration {
    /// Active values, defaults applied
    pub configuration: WikiConfiguration,
    /// Optional fields that received their declared default
    pub defaults_applied: Vec<ConfigField>,
    /// Required fields absent from the store
    pub missing_required: Vec<ConfigField>,
    /// When the store was read
    pub loaded_at: DateTime<Utc>,
    /// In-memory changes not yet saved
    pub dirty: bool,
}

impl LoadedConfiguration {
    pub fn startup_mode(&self) -> StartupMode {
        validation::startup_mode(self.configuration.installed, &self.missing_required)
    }
}

/// Domain service owning the active configuration
///
/// Readers take lock-free snapshots; writers are serialized and replace the
/// whole instance.
pub struct Service {
    store: Arc<dyn ConfigurationStore>,
    event_publisher: Arc<dyn EventPublisher>,
    current: ArcSwap<LoadedConfiguration>,
    write_lock: Mutex<()>,
}

impl Service {
    /// Read the backing store once and apply defaults
    pub async fn load(
        store: Arc<dyn ConfigurationStore>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Result<Self, ConfigError> {
        let loaded = read_store(store.as_ref()).await?;
        let service = Self {
            store,
            event_publisher,
            current: ArcSwap::from_pointee(loaded),
            write_lock: Mutex::new(()),
        };
        service.publish_loaded().await;
        Ok(service)
    }

    // ===== Readers =====

    /// Shared snapshot of the active configuration
    pub fn snapshot(&self) -> Arc<LoadedConfiguration> {
        self.current.load_full()
    }

    /// Owned copy of the active configuration
    pub fn configuration(&self) -> WikiConfiguration {
        self.current.load().configuration.clone()
    }

    /// Current value of a field; never fails
    pub fn get(&self, field: ConfigField) -> FieldValue {
        self.current.load().configuration.get(field)
    }

    pub fn startup_mode(&self) -> StartupMode {
        self.current.load().startup_mode()
    }

    pub fn is_rest_api_enabled(&self) -> bool {
        self.current.load().configuration.is_rest_api_enabled()
    }

    pub fn accepts_api_key(&self, presented: &str) -> bool {
        validation::accepts_api_key(&self.current.load().configuration, presented)
    }

    /// Description of the backing store
    pub fn store_description(&self) -> String {
        self.store.describe()
    }

    // ===== Writers =====

    /// Assign a field in memory and return its previous value
    ///
    /// Nothing is persisted until `save`.
    pub async fn set(
        &self,
        field: ConfigField,
        value: FieldValue,
    ) -> Result<FieldValue, ConfigError> {
        let previous = {
            let _guard = self.write_lock.lock().await;
            let mut next = LoadedConfiguration::clone(&self.current.load());
            let previous = next.configuration.get(field);
            next.configuration.set(field, value)?;
            next.missing_required.retain(|missing| *missing != field);
            next.defaults_applied.retain(|defaulted| *defaulted != field);
            next.dirty = true;
            self.current.store(Arc::new(next));
            previous
        };

        tracing::debug!(field = %field, "Configuration field assigned");
        self.publish(ConfigurationEvent::field_changed(field)).await;
        Ok(previous)
    }

    /// Persist the active configuration, then reload it from the store
    ///
    /// Required fields that are still unset stay absent from the store.
    pub async fn save(&self) -> Result<(), ConfigError> {
        let _guard = self.write_lock.lock().await;
        self.save_locked().await
    }

    /// Replace the active configuration with what the store holds now
    pub async fn reload(&self) -> Result<(), ConfigError> {
        let _guard = self.write_lock.lock().await;
        let reloaded = read_store(self.store.as_ref()).await?;
        self.current.store(Arc::new(reloaded));
        self.publish_loaded().await;
        Ok(())
    }

    /// Finish the setup workflow: `Installed = true`, then save
    ///
    /// Refused while any other required field is unset.
    pub async fn complete_setup(&self) -> Result<(), ConfigError> {
        let _guard = self.write_lock.lock().await;

        let mut next = LoadedConfiguration::clone(&self.current.load());
        let missing: Vec<String> = next
            .missing_required
            .iter()
            .filter(|field| **field != ConfigField::Installed)
            .map(|field| field.name().to_string())
            .collect();
        if !missing.is_empty() {
            tracing::warn!(missing = ?missing, "Setup cannot complete with required fields unset");
            return Err(ConfigError::SetupIncomplete { missing });
        }

        next.configuration.installed = true;
        next.missing_required.clear();
        next.dirty = true;
        self.current.store(Arc::new(next));
        self.publish(ConfigurationEvent::field_changed(ConfigField::Installed))
            .await;

        self.save_locked().await
    }

    // ===== Helper Methods =====

    /// Save path; the caller holds `write_lock`
    async fn save_locked(&self) -> Result<(), ConfigError> {
        let stored = {
            let current = self.current.load();
            let mut stored = StoredSettings::from_settings(&current.configuration);
            for field in &current.missing_required {
                stored.remove(*field);
            }
            stored
        };

        self.store.save(&stored).await.map_err(|e| {
            let store = self.store.describe();
            tracing::error!(store = %store, error = ?e, "Failed to save configuration");
            ConfigError::Save {
                store,
                details: format!("{:#}", e),
            }
        })?;
        tracing::info!(store = %self.store.describe(), "Configuration saved");
        self.publish(ConfigurationEvent::saved(self.store.describe())).await;

        let reloaded = read_store(self.store.as_ref()).await?;
        self.current.store(Arc::new(reloaded));
        self.publish_loaded().await;
        Ok(())
    }

    async fn publish_loaded(&self) {
        let event = {
            let current = self.current.load();
            ConfigurationEvent::loaded(
                self.store.describe(),
                current.configuration.installed,
                &current.defaults_applied,
                &current.missing_required,
            )
        };
        self.publish(event).await;
    }

    async fn publish(&self, event: ConfigurationEvent) {
        let name = event.name();
        if let Err(e) = self.event_publisher.publish(event).await {
            // Log error but don't fail the operation
            tracing::warn!(event = name, error = %e, "Failed to publish configuration event");
        }
    }
}

/// Deserialize the store and populate defaults for missing optional fields
async fn read_store(store: &dyn ConfigurationStore) -> Result<LoadedConfiguration, ConfigError> {
    let stored = store.load().await.map_err(|e| {
        let store = store.describe();
        tracing::error!(store = %store, error = ?e, "Failed to load configuration");
        ConfigError::Load {
            store,
            details: format!("{:#}", e),
        }
    })?;

    let missing_required = validation::missing_required_fields(&stored);
    let mut configuration = WikiConfiguration::from_settings(&stored)?;
    let defaults_applied = apply_defaults(&mut configuration);

    if !missing_required.is_empty() {
        tracing::warn!(
            store = %store.describe(),
            missing = ?missing_required,
            "Configuration is missing required fields"
        );
    }
    tracing::info!(
        store = %store.describe(),
        installed = configuration.installed,
        defaults_applied = defaults_applied.len(),
        "Configuration loaded"
    );

    Ok(LoadedConfiguration {
        configuration,
        defaults_applied,
        missing_required,
        loaded_at: Utc::now(),
        dirty: false,
    })
}
