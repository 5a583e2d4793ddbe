//! In-memory storage backend, used by tests and `APP_STORAGE=memory`.

mod gateway;

pub use gateway::{InMemoryGateway, IndexSchema};
