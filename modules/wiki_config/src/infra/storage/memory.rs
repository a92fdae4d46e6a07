//! In-process backing store

use crate::domain::repository::ConfigurationStore;
use crate::domain::StoredSettings;
use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Keeps the document in memory; used when embedding the wiki and in tests
#[derive(Default)]
pub struct MemoryConfigurationStore {
    settings: RwLock<StoredSettings>,
    saves: AtomicUsize,
}

impl MemoryConfigurationStore {
    pub fn new(settings: StoredSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
            saves: AtomicUsize::new(0),
        }
    }

    /// Current document
    pub fn stored(&self) -> StoredSettings {
        self.settings.read().clone()
    }

    /// Replace the document behind the service's back (external edit)
    pub fn replace(&self, settings: StoredSettings) {
        *self.settings.write() = settings;
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigurationStore for MemoryConfigurationStore {
    async fn load(&self) -> Result<StoredSettings> {
        Ok(self.settings.read().clone())
    }

    async fn save(&self, settings: &StoredSettings) -> Result<()> {
        *self.settings.write() = settings.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
