//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to [`GatewayError`]. Transport failures become
//! `Connection`; service errors are classified by their exception type.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;

use crate::storage::gateway::GatewayError;

/// Map transport-level failures; `None` for service errors.
fn map_transport_error<E, R>(err: &SdkError<E, R>) -> Option<GatewayError> {
    match err {
        SdkError::DispatchFailure(_) => Some(GatewayError::Connection(
            "Failed to dispatch request to DynamoDB".to_string(),
        )),
        SdkError::TimeoutError(_) => Some(GatewayError::Connection(
            "Request to DynamoDB timed out".to_string(),
        )),
        _ => None,
    }
}

/// Map a PutItem SDK error to GatewayError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
) -> GatewayError {
    if let Some(mapped) = map_transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        PutItemError::ConditionalCheckFailedException(_) => GatewayError::ConditionFailed,
        PutItemError::ResourceNotFoundException(_) => {
            GatewayError::ResourceNotFound("Table not found".to_string())
        }
        PutItemError::ProvisionedThroughputExceededException(_) => {
            GatewayError::Throttled("Throughput exceeded, please retry".to_string())
        }
        PutItemError::RequestLimitExceeded(_) => {
            GatewayError::Throttled("Request limit exceeded, please retry".to_string())
        }
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            GatewayError::Service("Item collection size limit exceeded".to_string())
        }
        PutItemError::TransactionConflictException(_) => {
            GatewayError::Service("Transaction conflict, please retry".to_string())
        }
        PutItemError::InternalServerError(_) => {
            GatewayError::Service("DynamoDB internal server error".to_string())
        }
        err => GatewayError::Service(format!("PutItem failed: {:?}", err)),
    }
}

/// Map a Query SDK error to GatewayError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
) -> GatewayError {
    if let Some(mapped) = map_transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => {
            GatewayError::ResourceNotFound("Table or index not found".to_string())
        }
        QueryError::ProvisionedThroughputExceededException(_) => {
            GatewayError::Throttled("Throughput exceeded, please retry".to_string())
        }
        QueryError::RequestLimitExceeded(_) => {
            GatewayError::Throttled("Request limit exceeded, please retry".to_string())
        }
        QueryError::InternalServerError(_) => {
            GatewayError::Service("DynamoDB internal server error".to_string())
        }
        err => GatewayError::Service(format!("Query failed: {:?}", err)),
    }
}

/// Map a Scan SDK error to GatewayError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ScanError, R>,
) -> GatewayError {
    if let Some(mapped) = map_transport_error(&err) {
        return mapped;
    }
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => {
            GatewayError::ResourceNotFound("Table not found".to_string())
        }
        ScanError::ProvisionedThroughputExceededException(_) => {
            GatewayError::Throttled("Throughput exceeded, please retry".to_string())
        }
        ScanError::RequestLimitExceeded(_) => {
            GatewayError::Throttled("Request limit exceeded, please retry".to_string())
        }
        ScanError::InternalServerError(_) => {
            GatewayError::Service("DynamoDB internal server error".to_string())
        }
        err => GatewayError::Service(format!("Scan failed: {:?}", err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::types::error::{
        ConditionalCheckFailedException, ProvisionedThroughputExceededException,
        ResourceNotFoundException,
    };

    #[test]
    fn test_conditional_check_maps_to_condition_failed() {
        let err: SdkError<PutItemError, ()> = SdkError::service_error(
            PutItemError::ConditionalCheckFailedException(
                ConditionalCheckFailedException::builder().build(),
            ),
            (),
        );
        assert_eq!(map_put_item_error(err), GatewayError::ConditionFailed);
    }

    #[test]
    fn test_throughput_maps_to_throttled() {
        let err: SdkError<QueryError, ()> = SdkError::service_error(
            QueryError::ProvisionedThroughputExceededException(
                ProvisionedThroughputExceededException::builder().build(),
            ),
            (),
        );
        assert!(matches!(map_query_error(err), GatewayError::Throttled(_)));
    }

    #[test]
    fn test_missing_table_maps_to_resource_not_found() {
        let err: SdkError<ScanError, ()> = SdkError::service_error(
            ScanError::ResourceNotFoundException(ResourceNotFoundException::builder().build()),
            (),
        );
        assert!(matches!(
            map_scan_error(err),
            GatewayError::ResourceNotFound(_)
        ));
    }

    #[test]
    fn test_timeout_maps_to_connection() {
        let err: SdkError<PutItemError, ()> = SdkError::timeout_error("deadline elapsed");
        assert!(matches!(
            map_put_item_error(err),
            GatewayError::Connection(_)
        ));
    }
}
