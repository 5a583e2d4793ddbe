//! Storage layer: the gateway abstraction, its DynamoDB and in-memory
//! backends, and the show repository built on top of it.
//!
//! The backend is chosen at startup from configuration (`APP_STORAGE`).

pub mod dynamodb;
pub mod gateway;
pub mod inmemory;
pub mod keys;
pub mod records;
pub mod repository;

pub use gateway::StorageGateway;
pub use inmemory::InMemoryGateway;
pub use repository::GatewayShowRepository;

/// In-memory gateway laid out like the shows table, with the listing index.
pub fn memory_shows_gateway(table_name: impl Into<String>) -> InMemoryGateway {
    InMemoryGateway::new(table_name, keys::SLUG).with_index(
        keys::GSI_DRM_EPISODE,
        keys::DRM_KEY,
        Some(keys::EPISODE_COUNT),
    )
}
