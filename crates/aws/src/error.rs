use std::time::Duration;

use folio_store::StoreError;
use thiserror::Error;

/// Timeout reported when the SDK gives up without telling us how long it
/// waited.
const SDK_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors specific to AWS store operations.
#[derive(Debug, Error)]
pub enum AwsStoreError {
    /// The AWS SDK returned an error from the service.
    #[error("AWS service error: {0}")]
    ServiceError(String),

    /// The request was throttled by the AWS service.
    #[error("AWS request throttled")]
    Throttled,

    /// A network or connection error occurred communicating with AWS.
    #[error("AWS connection error: {0}")]
    Connection(String),

    /// The request timed out.
    #[error("AWS request timed out")]
    Timeout,

    /// Credentials were rejected or lack permission for the operation.
    #[error("AWS access denied: {0}")]
    AccessDenied(String),

    /// Configuration is invalid.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl From<AwsStoreError> for StoreError {
    fn from(err: AwsStoreError) -> Self {
        match err {
            AwsStoreError::ServiceError(msg) => StoreError::Backend(msg),
            AwsStoreError::Throttled => StoreError::Throttled("AWS request throttled".to_owned()),
            AwsStoreError::Connection(msg) => StoreError::Connection(msg),
            AwsStoreError::Timeout => StoreError::Timeout(SDK_TIMEOUT),
            AwsStoreError::AccessDenied(msg) => StoreError::AccessDenied(msg),
            AwsStoreError::Configuration(msg) => StoreError::Configuration(msg),
        }
    }
}

/// Classify an AWS SDK error string into the appropriate [`AwsStoreError`].
///
/// Inspects the message for common patterns (throttling, timeout,
/// permissions, connection) and falls back to a generic service error.
pub fn classify_sdk_error(error_str: &str) -> AwsStoreError {
    let lower = error_str.to_lowercase();
    if lower.contains("throttl")
        || lower.contains("slowdown")
        || lower.contains("rate exceed")
        || lower.contains("too many")
    {
        AwsStoreError::Throttled
    } else if lower.contains("timeout") || lower.contains("timed out") {
        AwsStoreError::Timeout
    } else if lower.contains("accessdenied")
        || lower.contains("access denied")
        || lower.contains("forbidden")
        || lower.contains("invalidaccesskeyid")
        || lower.contains("signaturedoesnotmatch")
    {
        AwsStoreError::AccessDenied(error_str.to_owned())
    } else if lower.contains("connection")
        || lower.contains("connect")
        || lower.contains("dns")
        || lower.contains("network")
    {
        AwsStoreError::Connection(error_str.to_owned())
    } else {
        AwsStoreError::ServiceError(error_str.to_owned())
    }
}
