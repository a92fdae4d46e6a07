//! Repository trait for backing stores
//!
//! A backing store only moves a flat key-value document in and out;
//! defaults and the setup gate are applied by the service.
//! Implementations are in infra/storage.

use super::document::StoredSettings;
use anyhow::Result;
use async_trait::async_trait;

/// Persisted representation of the wiki configuration
#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    /// Read the whole document; absent keys are left out
    async fn load(&self) -> Result<StoredSettings>;

    /// Replace the stored values with `settings`
    async fn save(&self, settings: &StoredSettings) -> Result<()>;

    /// Human-readable location used in logs and errors
    fn describe(&self) -> String;
}
