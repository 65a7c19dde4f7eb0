//! Error types module
//!
//! Every failure in the upload pipeline and the record handlers is expressed as
//! an `AppError`. Component crates keep their own narrower error enums and
//! convert into this one at the boundary.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

use std::collections::BTreeMap;
use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Per-field validation messages, keyed by wire (camelCase) field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues and rejected payloads
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UPLOAD_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Validation failed: {message}")]
    Validation { message: String, fields: FieldErrors },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload rejected: {0}")]
    PayloadRejected(String),

    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Upstream timeout: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(_: uuid::Error) -> Self {
        AppError::InvalidInput("Invalid identifier".to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errors) in err.field_errors() {
            let wire_name = camel_case(&field);
            let messages = errors
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", wire_name),
                })
                .collect();
            fields.insert(wire_name, messages);
        }

        let message = fields
            .values()
            .flatten()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");

        AppError::Validation { message, fields }
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::Database(_) => (
            500,
            "DATABASE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Persistence(_) => (
            500,
            "PERSISTENCE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Validation { .. } => (
            400,
            "VALIDATION_ERROR",
            false,
            Some("Correct the highlighted fields and resubmit"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::BadRequest(_) => (
            400,
            "BAD_REQUEST",
            false,
            Some("Check request format and parameters"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadRejected(_) => (
            400,
            "PAYLOAD_REJECTED",
            false,
            Some("Upload an image file of at most the allowed size"),
            false,
            LogLevel::Warn,
        ),
        AppError::MissingRequiredField(_) => (
            400,
            "MISSING_REQUIRED_FIELD",
            false,
            Some("Attach the required file and resubmit"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::UploadFailed(_) => (
            500,
            "UPLOAD_FAILED",
            false,
            Some("Resubmit the form"),
            true,
            LogLevel::Error,
        ),
        AppError::Timeout(_) => (
            504,
            "UPSTREAM_TIMEOUT",
            false,
            Some("Resubmit the form"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Persistence(_) => "Persistence",
            AppError::Validation { .. } => "Validation",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::BadRequest(_) => "BadRequest",
            AppError::PayloadRejected(_) => "PayloadRejected",
            AppError::MissingRequiredField(_) => "MissingRequiredField",
            AppError::NotFound(_) => "NotFound",
            AppError::UploadFailed(_) => "UploadFailed",
            AppError::Timeout(_) => "Timeout",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Per-field messages, present only for validation failures.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            AppError::Validation { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Single-field validation failure.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![message.clone()]);
        AppError::Validation { message, fields }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Persistence(_) => {
                "Failed to access the document store".to_string()
            }
            AppError::Validation { ref message, .. } => message.clone(),
            AppError::InvalidInput(ref msg)
            | AppError::BadRequest(ref msg)
            | AppError::PayloadRejected(ref msg)
            | AppError::MissingRequiredField(ref msg)
            | AppError::NotFound(ref msg) => msg.clone(),
            AppError::UploadFailed(_) => "Error uploading image to cloud storage".to_string(),
            AppError::Timeout(_) => "Image storage service did not respond in time".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_error_metadata_database() {
        #[cfg(feature = "sqlx")]
        let err = AppError::from(sqlx::Error::PoolClosed);
        #[cfg(not(feature = "sqlx"))]
        let err = AppError::Database("pool closed".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert!(err.is_recoverable());
        assert_eq!(err.client_message(), "Failed to access the document store");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_error_metadata_not_found() {
        let err = AppError::NotFound("Project not found".to_string());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "Project not found");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_pipeline_errors_map_to_expected_statuses() {
        assert_eq!(
            AppError::PayloadRejected("text/plain".into()).http_status_code(),
            400
        );
        assert_eq!(
            AppError::MissingRequiredField("Project image is required".into()).http_status_code(),
            400
        );
        let upload = AppError::UploadFailed("502 from upstream".into());
        assert_eq!(upload.http_status_code(), 500);
        assert!(!upload.is_recoverable());
        assert_eq!(upload.client_message(), "Error uploading image to cloud storage");
        let timeout = AppError::Timeout("30s elapsed".into());
        assert_eq!(timeout.http_status_code(), 504);
        assert_eq!(timeout.error_code(), "UPSTREAM_TIMEOUT");
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(max = 3, message = "Full name is too long"))]
        full_name: String,
        #[validate(length(min = 1))]
        city: String,
    }

    #[test]
    fn test_validation_errors_keep_field_messages() {
        let sample = Sample {
            full_name: "abcdef".to_string(),
            city: String::new(),
        };
        let err: AppError = sample.validate().unwrap_err().into();
        let fields = err.field_errors().expect("validation fields");
        assert_eq!(fields["fullName"], vec!["Full name is too long".to_string()]);
        assert_eq!(fields["city"], vec!["city is invalid".to_string()]);
        assert_eq!(err.http_status_code(), 400);
        assert!(err.client_message().contains("Full name is too long"));
    }

    #[test]
    fn test_invalid_field_helper() {
        let err = AppError::invalid_field("email", "Please enter a valid email");
        assert_eq!(err.client_message(), "Please enter a valid email");
        assert_eq!(err.field_errors().unwrap().len(), 1);
    }

    #[test]
    fn test_camel_case_conversion() {
        assert_eq!(camel_case("mobile_number"), "mobileNumber");
        assert_eq!(camel_case("name"), "name");
    }
}
