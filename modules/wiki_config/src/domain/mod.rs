//! Domain layer - loading, default application and the setup gate

pub mod document;
pub mod events;
pub mod repository;
pub mod service;
pub mod validation;

pub use document::StoredSettings;
pub use events::{BroadcastEventPublisher, ConfigurationEvent, EventPublisher, NoOpEventPublisher};
pub use repository::ConfigurationStore;
pub use service::{LoadedConfiguration, Service};
