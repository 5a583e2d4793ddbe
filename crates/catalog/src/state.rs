//! Shared application state passed to every request handler.

use std::sync::Arc;

use crate::config::Config;
use crate::service::CatalogService;
use crate::storage::{memory_shows_gateway, GatewayShowRepository, StorageGateway};

#[derive(Clone)]
pub struct AppState {
    pub service: CatalogService,
    pub config: Arc<Config>,
}

impl AppState {
    /// Builds the state over the given storage gateway.
    pub fn new(gateway: Arc<dyn StorageGateway>, config: Config) -> Self {
        let repository = GatewayShowRepository::new(gateway);
        Self {
            service: CatalogService::new(Arc::new(repository)),
            config: Arc::new(config),
        }
    }

    /// State backed by a fresh in-memory table.
    pub fn in_memory(config: Config) -> Self {
        let gateway = memory_shows_gateway(config.dynamodb.shows_table.clone());
        Self::new(Arc::new(gateway), config)
    }
}
