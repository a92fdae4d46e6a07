//! Module wiring and lifecycle

use crate::api::native::NativeClient;
use crate::api::rest::routes::register_routes;
use crate::config::{Config, StoreConfig};
use crate::contract::ConfigurationApi;
use crate::domain::{BroadcastEventPublisher, ConfigurationEvent, ConfigurationStore, Service};
use crate::infra::storage::{EnvOverlayStore, FileConfigurationStore, SeaOrmConfigurationStore};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Wiki configuration module
///
/// Owns the backing store, the domain service and its event channel.
pub struct WikiConfigModule {
    config: Config,
    service: Arc<Service>,
    events: Arc<BroadcastEventPublisher>,
}

impl WikiConfigModule {
    /// Build the configured store and load the wiki configuration from it
    pub async fn init(config: Config) -> Result<Self> {
        let store = build_store(&config).await?;
        Self::with_store(config, store).await
    }

    /// Load from an already constructed store
    pub async fn with_store(config: Config, store: Arc<dyn ConfigurationStore>) -> Result<Self> {
        let store: Arc<dyn ConfigurationStore> = if config.env_overlay {
            Arc::new(EnvOverlayStore::from_process_env(
                store,
                config.env_prefix.clone(),
            ))
        } else {
            store
        };

        let events = Arc::new(BroadcastEventPublisher::new(config.event_capacity));
        let service = Arc::new(Service::load(store, events.clone()).await?);

        tracing::info!(
            store = %service.store_description(),
            rest_api = service.is_rest_api_enabled(),
            "Wiki configuration module initialized"
        );
        Ok(Self {
            config,
            service,
            events,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process client
    pub fn client(&self) -> Arc<dyn ConfigurationApi> {
        Arc::new(NativeClient::new(self.service.clone()))
    }

    /// Receive configuration events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ConfigurationEvent> {
        self.events.subscribe()
    }

    /// REST routes for the configuration endpoints
    pub fn router(&self) -> axum::Router {
        register_routes(axum::Router::new(), self.service.clone())
    }

    /// Serve the REST API until `cancel` fires
    pub async fn serve(self: Arc<Self>, cancel: CancellationToken) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.config.bind_addr)
            .await
            .with_context(|| format!("failed to bind {}", self.config.bind_addr))?;
        let local_addr = listener.local_addr()?;

        if !self.service.is_rest_api_enabled() {
            tracing::warn!("ApiKeys is empty, configuration endpoints will answer 403");
        }
        tracing::info!(addr = %local_addr, "Serving wiki configuration REST API");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move { cancel.cancelled().await })
            .await?;

        tracing::info!("Wiki configuration REST API stopped");
        Ok(())
    }
}

async fn build_store(config: &Config) -> Result<Arc<dyn ConfigurationStore>> {
    match &config.store {
        StoreConfig::File { path } => {
            let store = FileConfigurationStore::new(path.clone())?;
            Ok(Arc::new(store))
        }
        StoreConfig::Database {
            url,
            run_migrations,
        } => {
            let conn = sea_orm::Database::connect(url.as_str())
                .await
                .context("failed to connect to the configuration database")?;
            if *run_migrations {
                use crate::infra::storage::migrations::Migrator;
                use sea_orm_migration::MigratorTrait;

                Migrator::up(&conn, None).await?;
                tracing::info!("Wiki configuration migrations completed");
            }
            Ok(Arc::new(SeaOrmConfigurationStore::new(Arc::new(conn))))
        }
    }
}
