//! Shows table provisioning.
//!
//! Creates the table and its listing index when `createTableIfMissing` is
//! enabled. An existing table is left untouched.

use std::time::Duration;

use aws_sdk_dynamodb::error::BuildError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, IndexStatus, KeySchemaElement,
    KeyType, Projection, ProjectionType, ScalarAttributeType, TableStatus,
};
use aws_sdk_dynamodb::Client;

use crate::storage::gateway::GatewayError;
use crate::storage::keys;

const ACTIVATION_ATTEMPTS: usize = 60;
const ACTIVATION_DELAY: Duration = Duration::from_secs(2);

fn build_error(err: BuildError) -> GatewayError {
    GatewayError::Service(format!("Invalid table definition: {err}"))
}

fn key(name: &str, key_type: KeyType) -> Result<KeySchemaElement, GatewayError> {
    KeySchemaElement::builder()
        .attribute_name(name)
        .key_type(key_type)
        .build()
        .map_err(build_error)
}

fn attribute(
    name: &str,
    attribute_type: ScalarAttributeType,
) -> Result<AttributeDefinition, GatewayError> {
    AttributeDefinition::builder()
        .attribute_name(name)
        .attribute_type(attribute_type)
        .build()
        .map_err(build_error)
}

/// Attribute definitions for the table key and every index key.
fn attribute_definitions() -> Result<Vec<AttributeDefinition>, GatewayError> {
    Ok(vec![
        attribute(keys::SLUG, ScalarAttributeType::S)?,
        attribute(keys::DRM_KEY, ScalarAttributeType::N)?,
        attribute(keys::EPISODE_COUNT, ScalarAttributeType::N)?,
    ])
}

fn drm_episode_index() -> Result<GlobalSecondaryIndex, GatewayError> {
    GlobalSecondaryIndex::builder()
        .index_name(keys::GSI_DRM_EPISODE)
        .key_schema(key(keys::DRM_KEY, KeyType::Hash)?)
        .key_schema(key(keys::EPISODE_COUNT, KeyType::Range)?)
        .projection(
            Projection::builder()
                .projection_type(ProjectionType::All)
                .build(),
        )
        .build()
        .map_err(build_error)
}

/// `Some(true)` when the table and all its indexes are active, `None` when
/// the table does not exist.
async fn table_active(client: &Client, table_name: &str) -> Result<Option<bool>, GatewayError> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(output) => {
            let Some(table) = output.table() else {
                return Ok(None);
            };
            let table_active = table.table_status() == Some(&TableStatus::Active);
            let indexes_active = table
                .global_secondary_indexes()
                .iter()
                .all(|gsi| gsi.index_status() == Some(&IndexStatus::Active));
            Ok(Some(table_active && indexes_active))
        }
        Err(err) => match err.as_service_error() {
            Some(service) if service.is_resource_not_found_exception() => Ok(None),
            _ => Err(GatewayError::Service(format!(
                "DescribeTable failed: {}",
                aws_sdk_dynamodb::error::DisplayErrorContext(&err)
            ))),
        },
    }
}

async fn create_table(client: &Client, table_name: &str) -> Result<(), GatewayError> {
    client
        .create_table()
        .table_name(table_name)
        .key_schema(key(keys::SLUG, KeyType::Hash)?)
        .set_attribute_definitions(Some(attribute_definitions()?))
        .global_secondary_indexes(drm_episode_index()?)
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await
        .map_err(|err| {
            GatewayError::Service(format!(
                "CreateTable failed: {}",
                aws_sdk_dynamodb::error::DisplayErrorContext(&err)
            ))
        })?;
    Ok(())
}

async fn wait_for_table_active(client: &Client, table_name: &str) -> Result<(), GatewayError> {
    for _ in 0..ACTIVATION_ATTEMPTS {
        if table_active(client, table_name).await? == Some(true) {
            return Ok(());
        }
        tokio::time::sleep(ACTIVATION_DELAY).await;
    }
    Err(GatewayError::Service(format!(
        "Table {table_name} did not become active"
    )))
}

/// Creates the shows table with its listing index if it does not exist.
///
/// Returns `true` when the table was created.
pub async fn ensure_shows_table(client: &Client, table_name: &str) -> Result<bool, GatewayError> {
    if table_active(client, table_name).await?.is_some() {
        tracing::debug!(table = %table_name, "Table already exists");
        return Ok(false);
    }

    tracing::info!(table = %table_name, "Creating table");
    create_table(client, table_name).await?;
    wait_for_table_active(client, table_name).await?;
    tracing::info!(table = %table_name, "Table is active");
    Ok(true)
}
