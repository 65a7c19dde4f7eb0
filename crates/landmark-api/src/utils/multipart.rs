//! Multipart form reading for content submissions

use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::Multipart;
use axum::http::StatusCode;
use landmark_core::models::{ContentKind, FormFields, UploadCandidate};
use landmark_core::AppError;
use landmark_processing::{IngressError, IngressValidator};

use crate::services::Submission;

/// Map a multipart read failure; an exceeded body limit counts as a rejected payload.
pub fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadRejected(err.body_text())
    } else {
        AppError::BadRequest(format!("Failed to read multipart form: {}", err.body_text()))
    }
}

/// Unwrap the extractor result; a non-multipart body is a bad request.
pub fn require_multipart(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Multipart, AppError> {
    multipart.map_err(|rejection| {
        AppError::BadRequest(format!("Expected a multipart form: {}", rejection.body_text()))
    })
}

/// Read text fields and at most one image part for `kind`.
///
/// The image part is accepted under the kind's field name or `image`. Its
/// content type is checked before any bytes are read, and reading stops as
/// soon as the running size passes the cap.
pub async fn read_submission(
    mut multipart: Multipart,
    kind: ContentKind,
    ingress: &IngressValidator,
) -> Result<Submission, AppError> {
    let mut fields = FormFields::new();
    let mut file: Option<UploadCandidate> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string).unwrap_or_default();

        if kind.accepts_file_field(&name) {
            if file.is_some() {
                return Err(IngressError::MultipleFiles.into());
            }
            file = Some(read_file(field, ingress).await?);
        } else if field.file_name().is_some() {
            return Err(AppError::PayloadRejected(format!(
                "Unexpected file field '{}'",
                name
            )));
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            fields.insert(name, value);
        }
    }

    tracing::debug!(
        kind = kind.label(),
        field_count = fields.len(),
        has_file = file.is_some(),
        "Multipart submission read"
    );

    Ok(Submission { fields, file })
}

async fn read_file(
    mut field: Field<'_>,
    ingress: &IngressValidator,
) -> Result<UploadCandidate, AppError> {
    let content_type = ingress.validate_content_type(field.content_type())?;
    let file_name = field.file_name().map(str::to_string);

    let mut buffer = ingress.buffer();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        buffer.push(&chunk)?;
    }

    Ok(ingress.accept(Some(&content_type), buffer.freeze(), file_name)?)
}
