//! DynamoDB gateway implementation.

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;

use crate::storage::gateway::{
    GatewayError, Item, KeyCondition, PutCondition, QueryParams, StorageGateway,
};

use super::error::{map_put_item_error, map_query_error, map_scan_error};

/// Pass-through gateway over a DynamoDB client.
///
/// `query` and `scan` follow `LastEvaluatedKey` until the result set is
/// exhausted (or the query limit is reached).
#[derive(Debug, Clone)]
pub struct DynamoDbGateway {
    client: Client,
    table_name: String,
}

impl DynamoDbGateway {
    /// Creates a gateway for the given client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl StorageGateway for DynamoDbGateway {
    async fn put(
        &self,
        table_name: &str,
        item: Item,
        condition: Option<&PutCondition>,
    ) -> Result<(), GatewayError> {
        let mut request = self
            .client
            .put_item()
            .table_name(table_name)
            .set_item(Some(item));

        if let Some(condition) = condition {
            let rendered = condition.to_expression();
            request = request
                .condition_expression(rendered.expression)
                .set_expression_attribute_names(Some(rendered.names));
        }

        request.send().await.map_err(map_put_item_error)?;
        Ok(())
    }

    async fn query(
        &self,
        table_name: &str,
        index_name: Option<&str>,
        key_condition: &KeyCondition,
        params: &QueryParams,
    ) -> Result<Vec<Item>, GatewayError> {
        let rendered = key_condition.to_expression();
        let limit = params.limit.and_then(|l| usize::try_from(l).ok());
        let mut items = Vec::new();
        let mut start_key = None;

        loop {
            let output = self
                .client
                .query()
                .table_name(table_name)
                .set_index_name(index_name.map(str::to_string))
                .key_condition_expression(&rendered.expression)
                .set_expression_attribute_names(Some(rendered.names.clone()))
                .set_expression_attribute_values(Some(rendered.values.clone()))
                .scan_index_forward(params.scan_index_forward)
                .set_limit(params.limit)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(map_query_error)?;

            items.extend(output.items.unwrap_or_default());

            if let Some(limit) = limit {
                if items.len() >= limit {
                    items.truncate(limit);
                    break;
                }
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(items)
    }

    async fn scan(&self, table_name: &str) -> Result<Vec<Item>, GatewayError> {
        let mut items = Vec::new();
        let mut start_key = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(table_name)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(map_scan_error)?;

            items.extend(output.items.unwrap_or_default());

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(items)
    }

    fn table_name(&self) -> &str {
        &self.table_name
    }
}
