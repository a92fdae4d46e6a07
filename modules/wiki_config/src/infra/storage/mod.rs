//! Storage layer - backing store implementations

pub mod entity;
pub mod env;
pub mod file;
pub mod memory;
pub mod migrations;
pub mod repositories;

pub use env::{env_key, EnvOverlayStore, DEFAULT_ENV_PREFIX};
pub use file::{DocumentFormat, FileConfigurationStore, FileStoreError};
pub use memory::MemoryConfigurationStore;
pub use repositories::SeaOrmConfigurationStore;
