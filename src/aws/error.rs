//! AWS error classification
//!
//! Provides typed errors for AWS SDK operations using the `.code()` method
//! instead of string matching on Debug format. The classified error is what
//! ends up in a candidate's "DELETE FAILED: <cause>" result string.

use aws_sdk_ec2::error::ProvideErrorMetadata;
use thiserror::Error;

/// AWS error categories relevant to the audit
#[derive(Debug, Error)]
pub enum AwsError {
    /// The group no longer exists (deleted out of band since the fetch)
    #[error("security group not found")]
    NotFound,

    /// The group still has dependent objects (e.g. an ENI attached)
    #[error("security group has dependent objects")]
    DependencyViolation,

    /// Rate limit exceeded
    #[error("rate limit exceeded")]
    Throttled,

    /// Credentials missing, expired, or not allowed to perform the call
    #[error("not authorized: {message}")]
    AuthFailure { message: String },

    /// Generic AWS SDK error with code and message
    #[error("AWS error: {message}")]
    Sdk {
        code: Option<String>,
        message: String,
    },
}

impl AwsError {
    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, AwsError::NotFound)
    }

    /// Get an operator-facing suggestion for resolving this error, if any.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            AwsError::DependencyViolation => Some(
                "The group is still in use by a resource this audit does not \
                 scan (e.g. a peered VPC or another account's interface).",
            ),
            AwsError::Throttled => {
                Some("AWS API rate limit hit. Re-run the audit in a moment.")
            }
            AwsError::AuthFailure { .. } => {
                Some("Check that the credentials allow ec2:DeleteSecurityGroup.")
            }
            _ => None,
        }
    }
}

/// Known AWS error codes for "not found" conditions
const NOT_FOUND_CODES: &[&str] = &["InvalidGroup.NotFound", "InvalidPermission.NotFound"];

/// Known AWS error codes for throttling/rate limiting
const THROTTLING_CODES: &[&str] = &["Throttling", "ThrottlingException", "RequestLimitExceeded"];

/// Known AWS error codes for dependency violations (resource still in use)
const DEPENDENCY_CODES: &[&str] = &["DependencyViolation"];

/// Known AWS error codes for auth/credential failures
const AUTH_CODES: &[&str] = &["AuthFailure", "UnauthorizedOperation", "RequestExpired"];

/// Classify an AWS SDK error using the error code.
pub fn classify_aws_error(code: Option<&str>, message: Option<&str>) -> AwsError {
    let message = message.unwrap_or("Unknown error").to_string();

    match code {
        Some(c) if NOT_FOUND_CODES.contains(&c) => AwsError::NotFound,
        Some(c) if DEPENDENCY_CODES.contains(&c) => AwsError::DependencyViolation,
        Some(c) if THROTTLING_CODES.contains(&c) => AwsError::Throttled,
        Some(c) if AUTH_CODES.contains(&c) => AwsError::AuthFailure { message },
        _ => AwsError::Sdk {
            code: code.map(|s| s.to_string()),
            message,
        },
    }
}

/// Classify any AWS SDK error type that carries error metadata.
///
/// `SdkError<E>` implements `ProvideErrorMetadata` whenever the operation
/// error `E` does, so this covers the raw SDK results directly.
pub fn classify_sdk_error<E>(err: &E) -> AwsError
where
    E: ProvideErrorMetadata,
{
    classify_aws_error(err.code(), err.message())
}
