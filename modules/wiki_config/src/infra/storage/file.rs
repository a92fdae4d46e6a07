//! Flat-file backing store (JSON or YAML document)

use crate::domain::repository::ConfigurationStore;
use crate::domain::StoredSettings;
use anyhow::Result;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Errors raised while reading or writing a configuration file
#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("Unsupported configuration file extension: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Document syntax of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self, FileStoreError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(Self::Json),
            "yml" | "yaml" => Ok(Self::Yaml),
            _ => Err(FileStoreError::UnsupportedFormat(
                path.display().to_string(),
            )),
        }
    }

    /// Parse a document; a blank document holds no keys
    pub fn parse(self, text: &str) -> Result<StoredSettings, FileStoreError> {
        if text.trim().is_empty() {
            return Ok(StoredSettings::new());
        }
        match self {
            Self::Json => Ok(serde_json::from_str(text)?),
            Self::Yaml => Ok(serde_yaml::from_str(text)?),
        }
    }

    pub fn render(self, settings: &StoredSettings) -> Result<String, FileStoreError> {
        match self {
            Self::Json => Ok(serde_json::to_string_pretty(settings)?),
            Self::Yaml => Ok(serde_yaml::to_string(settings)?),
        }
    }
}

/// Configuration kept in a single file on disk
pub struct FileConfigurationStore {
    path: PathBuf,
    format: DocumentFormat,
}

impl FileConfigurationStore {
    /// Store at `path`, format inferred from the extension
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, FileStoreError> {
        let path = path.into();
        let format = DocumentFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    pub fn with_format(path: impl Into<PathBuf>, format: DocumentFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl ConfigurationStore for FileConfigurationStore {
    async fn load(&self) -> Result<StoredSettings> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FileStoreError::Read {
                path: self.path.clone(),
                source,
            })?;
        Ok(self.format.parse(&text)?)
    }

    async fn save(&self, settings: &StoredSettings) -> Result<()> {
        let text = self.format.render(settings)?;
        let temp = self.temp_path();

        // Write-then-rename so readers never observe a partial document
        tokio::fs::write(&temp, text)
            .await
            .map_err(|source| FileStoreError::Write {
                path: temp.clone(),
                source,
            })?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|source| FileStoreError::Write {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(path = %self.path.display(), "Configuration file written");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
