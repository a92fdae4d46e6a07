//! Configuration for the wiki configuration module
//!
//! This is the module's own bootstrap configuration: which backing store
//! holds the wiki settings, whether environment overrides apply and where the
//! REST API listens. It is read from an optional YAML file and
//! `WIKICONFIG_*` environment variables.

use crate::infra::storage::DEFAULT_ENV_PREFIX;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix of the variables that override module configuration
pub const MODULE_ENV_PREFIX: &str = "WIKICONFIG_";

/// Wiki configuration module configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Backing store of the wiki settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Apply `{env_prefix}*` variables on top of stored values
    #[serde(default = "default_true")]
    pub env_overlay: bool,

    /// Prefix of the settings override variables
    #[serde(default = "default_env_prefix")]
    pub env_prefix: String,

    /// Address the REST API binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Capacity of the configuration event channel
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

/// Where the wiki settings live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum StoreConfig {
    /// JSON or YAML document, chosen by extension
    File { path: PathBuf },
    /// `wiki_configuration` table reached through sea-orm
    Database {
        url: String,
        #[serde(default = "default_true")]
        run_migrations: bool,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::File {
            path: PathBuf::from("wiki-config.json"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            env_overlay: true,
            env_prefix: default_env_prefix(),
            bind_addr: default_bind_addr(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl Config {
    /// Merge the optional YAML file and `WIKICONFIG_*` variables over defaults
    ///
    /// Nested keys use a double underscore, e.g. `WIKICONFIG_STORE__PATH`.
    /// Serde defaults fill whatever neither source sets.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(MODULE_ENV_PREFIX).split("__"));

        figment
            .extract()
            .with_context(|| match path {
                Some(path) => format!("invalid module configuration in {}", path.display()),
                None => "invalid module configuration".to_string(),
            })
    }
}

fn default_true() -> bool {
    true
}

fn default_env_prefix() -> String {
    DEFAULT_ENV_PREFIX.to_string()
}

fn default_bind_addr() -> String {
    "127.0.0.1:8087".to_string()
}

fn default_event_capacity() -> usize {
    64
}
