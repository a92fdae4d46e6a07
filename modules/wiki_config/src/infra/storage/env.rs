//! Environment-variable overlay over another backing store

use crate::contract::{ConfigError, ConfigField, FieldValue, WikiSettings};
use crate::domain::repository::ConfigurationStore;
use crate::domain::StoredSettings;
use anyhow::Result;
use async_trait::async_trait;
use heck::ToShoutySnakeCase;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub const DEFAULT_ENV_PREFIX: &str = "WIKI_";

/// Variable name for `field`, e.g. `WIKI_USE_OBJECT_CACHE`
pub fn env_key(prefix: &str, field: ConfigField) -> String {
    format!("{}{}", prefix, field.name().to_shouty_snake_case())
}

/// Overrides stored values with environment variables on load
///
/// Variables are captured when the overlay is built. Saving never writes an
/// environment value to the inner store: overridden fields keep the inner
/// store's own value. A saved value that differs from the variable is an
/// explicit change; from then on the stored value wins over the variable.
pub struct EnvOverlayStore {
    inner: Arc<dyn ConfigurationStore>,
    prefix: String,
    vars: HashMap<String, String>,
    released: Mutex<HashSet<ConfigField>>,
}

impl EnvOverlayStore {
    /// Capture the process environment
    pub fn from_process_env(inner: Arc<dyn ConfigurationStore>, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let vars = std::env::vars()
            .filter(|(key, _)| key.starts_with(&prefix))
            .collect();
        Self {
            inner,
            prefix,
            vars,
            released: Mutex::new(HashSet::new()),
        }
    }

    /// Use an explicit variable set
    pub fn with_vars<I, K, V>(inner: Arc<dyn ConfigurationStore>, prefix: impl Into<String>, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            inner,
            prefix: prefix.into(),
            vars: vars
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            released: Mutex::new(HashSet::new()),
        }
    }

    /// Overrides present in the captured environment and still in effect
    pub fn overrides(&self) -> Result<Vec<(ConfigField, FieldValue)>, ConfigError> {
        let released = self.released.lock().clone();
        let mut overrides = Vec::new();
        for field in ConfigField::ALL {
            if released.contains(&field) {
                continue;
            }
            let key = env_key(&self.prefix, field);
            let Some(raw) = self.vars.get(&key) else {
                continue;
            };
            let value = FieldValue::parse(field.kind(), raw).ok_or_else(|| {
                ConfigError::TypeMismatch {
                    field: key.clone(),
                    expected: field.kind(),
                }
            })?;
            overrides.push((field, value));
        }
        Ok(overrides)
    }
}

#[async_trait]
impl ConfigurationStore for EnvOverlayStore {
    async fn load(&self) -> Result<StoredSettings> {
        let mut settings = self.inner.load().await?;
        for (field, value) in self.overrides()? {
            tracing::debug!(field = %field, prefix = %self.prefix, "Configuration field overridden from environment");
            settings.set(field, value)?;
        }
        Ok(settings)
    }

    async fn save(&self, settings: &StoredSettings) -> Result<()> {
        let overrides = self.overrides()?;
        if overrides.is_empty() {
            return self.inner.save(settings).await;
        }

        let original = self.inner.load().await?;
        let mut document = settings.clone();
        let mut explicit = Vec::new();
        for (field, env_value) in overrides {
            match document.stored_value(field) {
                Some(value) if value != env_value => explicit.push(field),
                _ => match original.stored_value(field) {
                    Some(value) => document.set(field, value)?,
                    None => {
                        document.remove(field);
                    }
                },
            }
        }

        self.inner.save(&document).await?;

        if !explicit.is_empty() {
            tracing::info!(
                fields = ?explicit,
                prefix = %self.prefix,
                "Saved values now take precedence over environment overrides"
            );
            self.released.lock().extend(explicit);
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{} (env overlay {}*)", self.inner.describe(), self.prefix)
    }
}
