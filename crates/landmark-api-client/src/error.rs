use landmark_core::FieldErrors;
use serde::Deserialize;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
        fields: FieldErrors,
    },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("{0}")]
    MissingImage(String),

    #[error("A submission for this form is already in progress")]
    SubmissionInFlight,
}

impl ClientError {
    /// HTTP status for errors the server answered with.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ClientError::Api { fields, .. } if !fields.is_empty() => Some(fields),
            _ => None,
        }
    }

    /// Build from a non-success response body, falling back to the raw text
    /// when it is not the JSON failure envelope.
    pub(crate) fn from_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<FailureBody>(body) {
            Ok(parsed) => ClientError::Api {
                status,
                message: parsed.message,
                code: parsed.code,
                fields: parsed.fields.unwrap_or_default(),
            },
            Err(_) => ClientError::Api {
                status,
                message: if body.trim().is_empty() {
                    "Unknown error".to_string()
                } else {
                    body.trim().to_string()
                },
                code: None,
                fields: FieldErrors::new(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct FailureBody {
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    fields: Option<FieldErrors>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_failure_envelope() {
        let err = ClientError::from_body(
            400,
            r#"{"success":false,"message":"Please enter a valid email","error":"x","code":"VALIDATION_ERROR","recoverable":false,"fields":{"email":["Please enter a valid email"]}}"#,
        );
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.code(), Some("VALIDATION_ERROR"));
        assert_eq!(err.field_errors().unwrap()["email"].len(), 1);
        assert_eq!(
            err.to_string(),
            "API request failed with status 400: Please enter a valid email"
        );
    }

    #[test]
    fn non_json_body_is_kept_as_message() {
        let err = ClientError::from_body(502, "Bad Gateway\n");
        assert_eq!(err.to_string(), "API request failed with status 502: Bad Gateway");
        assert!(err.field_errors().is_none());
        assert!(ClientError::from_body(404, "").is_not_found());
    }
}
