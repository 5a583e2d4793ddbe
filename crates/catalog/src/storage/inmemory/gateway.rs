//! In-memory storage gateway.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use tokio::sync::RwLock;

use crate::storage::gateway::{
    compare_values, GatewayError, Item, KeyCondition, PutCondition, QueryParams, StorageGateway,
};

/// Key schema of a secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSchema {
    pub partition_key: String,
    pub sort_key: Option<String>,
}

/// In-memory store holding a single table.
///
/// Items live in a `HashMap` keyed by the primary key value, wrapped in
/// `Arc<RwLock<_>>` for shared access. Secondary indexes are sparse: an item
/// missing an index key attribute does not appear in that index. Data is lost
/// when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryGateway {
    table_name: String,
    primary_key: String,
    indexes: HashMap<String, IndexSchema>,
    items: Arc<RwLock<HashMap<String, Item>>>,
}

impl InMemoryGateway {
    /// Creates an empty table keyed on `primary_key`.
    pub fn new(table_name: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            primary_key: primary_key.into(),
            indexes: HashMap::new(),
            items: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers a secondary index.
    pub fn with_index(
        mut self,
        name: impl Into<String>,
        partition_key: impl Into<String>,
        sort_key: Option<&str>,
    ) -> Self {
        self.indexes.insert(
            name.into(),
            IndexSchema {
                partition_key: partition_key.into(),
                sort_key: sort_key.map(str::to_string),
            },
        );
        self
    }

    /// Number of stored items.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Returns the stored item with the given primary key value.
    pub async fn get(&self, key: &str) -> Option<Item> {
        self.items.read().await.get(key).cloned()
    }

    fn check_table(&self, table_name: &str) -> Result<(), GatewayError> {
        if table_name != self.table_name {
            return Err(GatewayError::ResourceNotFound(format!(
                "Table not found: {table_name}"
            )));
        }
        Ok(())
    }

    fn key_schema(&self, index_name: Option<&str>) -> Result<IndexSchema, GatewayError> {
        match index_name {
            None => Ok(IndexSchema {
                partition_key: self.primary_key.clone(),
                sort_key: None,
            }),
            Some(name) => self.indexes.get(name).cloned().ok_or_else(|| {
                GatewayError::ResourceNotFound(format!("Index not found: {name}"))
            }),
        }
    }
}

/// Primary key values are stored as their string or number text.
fn key_string(value: &AttributeValue) -> Option<String> {
    match value {
        AttributeValue::S(s) | AttributeValue::N(s) => Some(s.clone()),
        _ => None,
    }
}

#[async_trait]
impl StorageGateway for InMemoryGateway {
    async fn put(
        &self,
        table_name: &str,
        item: Item,
        condition: Option<&PutCondition>,
    ) -> Result<(), GatewayError> {
        self.check_table(table_name)?;

        let key = item
            .get(&self.primary_key)
            .and_then(key_string)
            .ok_or_else(|| {
                GatewayError::Service(format!("Missing key attribute: {}", self.primary_key))
            })?;

        // Held across the check and the insert so concurrent puts of the
        // same key cannot both pass the condition.
        let mut items = self.items.write().await;

        if let Some(PutCondition::AttributeNotExists(attribute)) = condition {
            let exists = items
                .get(&key)
                .is_some_and(|existing| existing.contains_key(attribute));
            if exists {
                return Err(GatewayError::ConditionFailed);
            }
        }

        items.insert(key, item);
        Ok(())
    }

    async fn query(
        &self,
        table_name: &str,
        index_name: Option<&str>,
        key_condition: &KeyCondition,
        params: &QueryParams,
    ) -> Result<Vec<Item>, GatewayError> {
        self.check_table(table_name)?;
        let schema = self.key_schema(index_name)?;

        if key_condition.partition_key != schema.partition_key {
            return Err(GatewayError::Service(format!(
                "Query condition missed key schema element: {}",
                schema.partition_key
            )));
        }
        if let Some(sort) = &key_condition.sort {
            if schema.sort_key.as_deref() != Some(sort.attribute()) {
                return Err(GatewayError::Service(format!(
                    "Query key condition not supported on attribute: {}",
                    sort.attribute()
                )));
            }
        }

        let items = self.items.read().await;
        let mut matched: Vec<Item> = items
            .values()
            .filter(|item| {
                let in_index = schema
                    .sort_key
                    .as_ref()
                    .is_none_or(|sort_key| item.contains_key(sort_key));
                in_index
                    && item.get(&schema.partition_key).is_some_and(|value| {
                        compare_values(value, &key_condition.partition_value)
                            == Some(Ordering::Equal)
                    })
            })
            .filter(|item| match &key_condition.sort {
                None => true,
                Some(sort) => item
                    .get(sort.attribute())
                    .is_some_and(|value| sort.matches(value)),
            })
            .cloned()
            .collect();
        drop(items);

        if let Some(sort_key) = &schema.sort_key {
            matched.sort_by(|a, b| match (a.get(sort_key), b.get(sort_key)) {
                (Some(a), Some(b)) => compare_values(a, b).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            });
        }
        if !params.scan_index_forward {
            matched.reverse();
        }
        if let Some(limit) = params.limit {
            matched.truncate(usize::try_from(limit).unwrap_or(0));
        }

        Ok(matched)
    }

    async fn scan(&self, table_name: &str) -> Result<Vec<Item>, GatewayError> {
        self.check_table(table_name)?;
        let items = self.items.read().await;
        Ok(items.values().cloned().collect())
    }

    fn table_name(&self) -> &str {
        &self.table_name
    }
}
