//! Domain events for the wiki configuration
//!
//! Consuming subsystems (cache, authentication, storage) subscribe to learn
//! when the active configuration was replaced or changed in memory.
//! Events carry field names only, never values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::contract::ConfigField;

/// Domain event types for the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ConfigurationEvent {
    /// Configuration was (re)loaded from the backing store
    ConfigurationLoaded(ConfigurationLoadedEvent),
    /// A field was assigned in memory
    FieldChanged(FieldChangedEvent),
    /// Configuration was written to the backing store
    ConfigurationSaved(ConfigurationSavedEvent),
}

/// Event data for a load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationLoadedEvent {
    /// Store description
    pub store: String,
    /// Value of `Installed` after load
    pub installed: bool,
    /// Optional fields that received their declared default
    pub defaults_applied: Vec<String>,
    /// Required fields absent from the store
    pub missing_required: Vec<String>,
    /// Timestamp of the event
    pub timestamp: DateTime<Utc>,
}

/// Event data for an in-memory assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChangedEvent {
    /// Field name
    pub field: String,
    /// Timestamp of the event
    pub timestamp: DateTime<Utc>,
}

/// Event data for a save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationSavedEvent {
    /// Store description
    pub store: String,
    /// Timestamp of the event
    pub timestamp: DateTime<Utc>,
}

fn names(fields: &[ConfigField]) -> Vec<String> {
    fields.iter().map(|field| field.name().to_string()).collect()
}

impl ConfigurationEvent {
    /// Create a new ConfigurationLoaded event
    pub fn loaded(
        store: String,
        installed: bool,
        defaults_applied: &[ConfigField],
        missing_required: &[ConfigField],
    ) -> Self {
        Self::ConfigurationLoaded(ConfigurationLoadedEvent {
            store,
            installed,
            defaults_applied: names(defaults_applied),
            missing_required: names(missing_required),
            timestamp: Utc::now(),
        })
    }

    /// Create a new FieldChanged event
    pub fn field_changed(field: ConfigField) -> Self {
        Self::FieldChanged(FieldChangedEvent {
            field: field.name().to_string(),
            timestamp: Utc::now(),
        })
    }

    /// Create a new ConfigurationSaved event
    pub fn saved(store: String) -> Self {
        Self::ConfigurationSaved(ConfigurationSavedEvent {
            store,
            timestamp: Utc::now(),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ConfigurationLoaded(_) => "configuration_loaded",
            Self::FieldChanged(_) => "field_changed",
            Self::ConfigurationSaved(_) => "configuration_saved",
        }
    }
}

/// Event publisher trait for publishing domain events
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a configuration event
    async fn publish(&self, event: ConfigurationEvent) -> anyhow::Result<()>;
}

/// No-op event publisher for testing or when events are disabled
pub struct NoOpEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: ConfigurationEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

/// In-process fan-out over a tokio broadcast channel
///
/// Publishing without subscribers is not an error.
#[derive(Clone)]
pub struct BroadcastEventPublisher {
    sender: broadcast::Sender<ConfigurationEvent>,
}

impl BroadcastEventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConfigurationEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastEventPublisher {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait::async_trait]
impl EventPublisher for BroadcastEventPublisher {
    async fn publish(&self, event: ConfigurationEvent) -> anyhow::Result<()> {
        if self.sender.receiver_count() == 0 {
            return Ok(());
        }
        self.sender
            .send(event)
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("broadcast channel closed: {}", e))
    }
}
