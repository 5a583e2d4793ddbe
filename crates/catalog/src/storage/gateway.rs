//! Storage gateway abstraction.
//!
//! A thin capability interface over a single-table key-value store. The
//! gateway moves raw items in and out; it knows nothing about shows and never
//! retries. Key conditions are typed and rendered to store expressions by the
//! pure functions in this module.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use thiserror::Error;

/// A raw stored record.
pub type Item = HashMap<String, AttributeValue>;

/// Errors produced by a storage gateway.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Conditional check failed")]
    ConditionFailed,
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),
    #[error("Throttled: {0}")]
    Throttled(String),
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Service error: {0}")]
    Service(String),
}

/// Precondition attached to a put.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutCondition {
    /// The write succeeds only if no item with this attribute exists yet.
    AttributeNotExists(String),
}

impl PutCondition {
    pub fn attribute_not_exists(attribute: impl Into<String>) -> Self {
        Self::AttributeNotExists(attribute.into())
    }

    /// Renders the condition with a placeholder attribute name.
    pub fn to_expression(&self) -> ConditionExpression {
        match self {
            Self::AttributeNotExists(attribute) => ConditionExpression {
                expression: "attribute_not_exists(#cond)".to_string(),
                names: HashMap::from([("#cond".to_string(), attribute.clone())]),
            },
        }
    }
}

/// A rendered put condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionExpression {
    pub expression: String,
    pub names: HashMap<String, String>,
}

/// Comparison applied to the sort key of a query.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKeyCondition {
    Equal(String, AttributeValue),
    GreaterThan(String, AttributeValue),
    GreaterThanOrEqual(String, AttributeValue),
    LessThan(String, AttributeValue),
    LessThanOrEqual(String, AttributeValue),
}

impl SortKeyCondition {
    /// Name of the sort key attribute.
    pub fn attribute(&self) -> &str {
        match self {
            Self::Equal(name, _)
            | Self::GreaterThan(name, _)
            | Self::GreaterThanOrEqual(name, _)
            | Self::LessThan(name, _)
            | Self::LessThanOrEqual(name, _) => name,
        }
    }

    pub fn value(&self) -> &AttributeValue {
        match self {
            Self::Equal(_, value)
            | Self::GreaterThan(_, value)
            | Self::GreaterThanOrEqual(_, value)
            | Self::LessThan(_, value)
            | Self::LessThanOrEqual(_, value) => value,
        }
    }

    fn operator(&self) -> &'static str {
        match self {
            Self::Equal(..) => "=",
            Self::GreaterThan(..) => ">",
            Self::GreaterThanOrEqual(..) => ">=",
            Self::LessThan(..) => "<",
            Self::LessThanOrEqual(..) => "<=",
        }
    }

    /// Evaluates the condition against a candidate sort key value.
    ///
    /// Values of different types never match.
    pub fn matches(&self, candidate: &AttributeValue) -> bool {
        let Some(ordering) = compare_values(candidate, self.value()) else {
            return false;
        };
        match self {
            Self::Equal(..) => ordering == Ordering::Equal,
            Self::GreaterThan(..) => ordering == Ordering::Greater,
            Self::GreaterThanOrEqual(..) => ordering != Ordering::Less,
            Self::LessThan(..) => ordering == Ordering::Less,
            Self::LessThanOrEqual(..) => ordering != Ordering::Greater,
        }
    }
}

/// Key condition of a query: equality on the partition key plus an optional
/// sort key comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyCondition {
    pub partition_key: String,
    pub partition_value: AttributeValue,
    pub sort: Option<SortKeyCondition>,
}

impl KeyCondition {
    pub fn partition(name: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            partition_key: name.into(),
            partition_value: value,
            sort: None,
        }
    }

    pub fn with_sort(mut self, sort: SortKeyCondition) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Renders the condition as a key condition expression with
    /// placeholder names (`#pk`, `#sk`) and values (`:pk`, `:sk`).
    pub fn to_expression(&self) -> KeyExpression {
        let mut expression = "#pk = :pk".to_string();
        let mut names = HashMap::from([("#pk".to_string(), self.partition_key.clone())]);
        let mut values = HashMap::from([(":pk".to_string(), self.partition_value.clone())]);

        if let Some(sort) = &self.sort {
            expression.push_str(&format!(" AND #sk {} :sk", sort.operator()));
            names.insert("#sk".to_string(), sort.attribute().to_string());
            values.insert(":sk".to_string(), sort.value().clone());
        }

        KeyExpression {
            expression,
            names,
            values,
        }
    }
}

/// A rendered key condition.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyExpression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

/// Query options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryParams {
    /// Ascending sort key order when true.
    pub scan_index_forward: bool,
    /// Maximum number of items returned.
    pub limit: Option<i32>,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            scan_index_forward: true,
            limit: None,
        }
    }
}

impl QueryParams {
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Orders two scalar key values: numerically for `N` (exactly for integers),
/// lexically for `S`.
///
/// Returns `None` for mismatched or non-scalar types.
pub fn compare_values(a: &AttributeValue, b: &AttributeValue) -> Option<Ordering> {
    match (a, b) {
        (AttributeValue::N(a), AttributeValue::N(b)) => {
            if let (Ok(a), Ok(b)) = (a.parse::<i64>(), b.parse::<i64>()) {
                return Some(a.cmp(&b));
            }
            let a: f64 = a.parse().ok()?;
            let b: f64 = b.parse().ok()?;
            a.partial_cmp(&b)
        }
        (AttributeValue::S(a), AttributeValue::S(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Capability interface over the key-value store.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Writes an item, optionally guarded by a precondition.
    async fn put(
        &self,
        table_name: &str,
        item: Item,
        condition: Option<&PutCondition>,
    ) -> Result<(), GatewayError>;

    /// Queries the table or one of its secondary indexes. Returns the full
    /// result set in sort key order.
    async fn query(
        &self,
        table_name: &str,
        index_name: Option<&str>,
        key_condition: &KeyCondition,
        params: &QueryParams,
    ) -> Result<Vec<Item>, GatewayError>;

    /// Reads every item in the table.
    async fn scan(&self, table_name: &str) -> Result<Vec<Item>, GatewayError>;

    /// Name of the table this gateway is bound to.
    fn table_name(&self) -> &str;
}
