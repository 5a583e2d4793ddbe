//! DynamoDB storage backend using `aws-sdk-dynamodb`.

mod client;
mod error;
mod gateway;
mod table;

pub use client::{create_client, ClientOptions};
pub use gateway::DynamoDbGateway;
pub use table::ensure_shows_table;
