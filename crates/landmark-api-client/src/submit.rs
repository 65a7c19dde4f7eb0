//! Upload transport for the image-backed forms.
//!
//! A [`ContentForm`] carries the text fields plus at most one encoded image.
//! [`FormSubmitter`] packages it into a single multipart request and allows
//! one submission in flight at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use landmark_core::{ApiResponse, ContentKind, SubmissionStage, UploadCandidate};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::api::content_path;
use crate::{ApiClient, ClientError, ClientResult};

/// Text fields and optional image of a project or client form.
#[derive(Debug, Clone, Default)]
pub struct ContentForm {
    fields: Vec<(String, String)>,
    image: Option<UploadCandidate>,
}

impl ContentForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn image(mut self, image: UploadCandidate) -> Self {
        self.image = Some(image);
        self
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Build the multipart body; the image goes under the kind's file field.
    fn into_multipart(self, kind: ContentKind) -> ClientResult<Form> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        if let Some(image) = self.image {
            let file_name = image
                .file_name
                .clone()
                .unwrap_or_else(|| "image.jpg".to_string());
            let part = Part::bytes(image.data.to_vec())
                .file_name(file_name)
                .mime_str(&image.content_type)?;
            form = form.part(kind.file_field(), part);
        }
        Ok(form)
    }
}

/// Clears the in-flight flag on every exit path.
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Submits one content form at a time and tracks its stage.
#[derive(Debug, Clone)]
pub struct FormSubmitter {
    client: ApiClient,
    kind: ContentKind,
    in_flight: Arc<AtomicBool>,
    stage: Arc<Mutex<SubmissionStage>>,
}

impl FormSubmitter {
    pub fn new(client: ApiClient, kind: ContentKind) -> Self {
        Self {
            client,
            kind,
            in_flight: Arc::new(AtomicBool::new(false)),
            stage: Arc::new(Mutex::new(SubmissionStage::Collecting)),
        }
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Stage of the current or most recent submission.
    pub fn stage(&self) -> SubmissionStage {
        self.stage
            .lock()
            .map(|stage| stage.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn begin(&self) -> ClientResult<InFlightGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ClientError::SubmissionInFlight)?;
        self.set_stage(SubmissionStage::Collecting);
        Ok(InFlightGuard {
            flag: Arc::clone(&self.in_flight),
        })
    }

    fn set_stage(&self, stage: SubmissionStage) {
        let mut current = match self.stage.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *current = stage;
    }

    fn advance(&self, target: SubmissionStage) {
        let mut current = match self.stage.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(err) = current.advance(target) {
            tracing::warn!(
                kind = self.kind.label(),
                error = %err,
                "Unexpected submission transition"
            );
        }
    }

    fn fail(&self, err: ClientError) -> ClientError {
        self.advance(SubmissionStage::Failed(err.to_string()));
        err
    }

    /// Create a record. The form must carry an image.
    #[tracing::instrument(skip_all, fields(kind = self.kind.label()))]
    pub async fn create<T: DeserializeOwned>(
        &self,
        form: ContentForm,
    ) -> ClientResult<ApiResponse<T>> {
        let _guard = self.begin()?;
        self.advance(SubmissionStage::Validating);
        if !form.has_image() {
            return Err(self.fail(ClientError::MissingImage(self.kind.image_required())));
        }
        let body = form
            .into_multipart(self.kind)
            .map_err(|err| self.fail(err))?;

        self.advance(SubmissionStage::Uploading);
        let path = content_path(self.kind);
        self.finish(self.client.post_multipart(&path, body).await)
    }

    /// Partially update a record; an image is optional.
    #[tracing::instrument(skip_all, fields(kind = self.kind.label(), id = %id))]
    pub async fn update<T: DeserializeOwned>(
        &self,
        id: Uuid,
        form: ContentForm,
    ) -> ClientResult<ApiResponse<T>> {
        let _guard = self.begin()?;
        self.advance(SubmissionStage::Validating);
        let uploads = form.has_image();
        let body = form
            .into_multipart(self.kind)
            .map_err(|err| self.fail(err))?;

        self.advance(if uploads {
            SubmissionStage::Uploading
        } else {
            SubmissionStage::Persisting
        });
        let path = format!("{}/{}", content_path(self.kind), id);
        self.finish(self.client.put_multipart(&path, body).await)
    }

    fn finish<T>(&self, result: ClientResult<ApiResponse<T>>) -> ClientResult<ApiResponse<T>> {
        match result {
            Ok(response) => {
                if self.stage() == SubmissionStage::Uploading {
                    self.advance(SubmissionStage::Persisting);
                }
                self.advance(SubmissionStage::Done);
                tracing::debug!(kind = self.kind.label(), "Submission completed");
                Ok(response)
            }
            Err(err) => {
                tracing::debug!(kind = self.kind.label(), error = %err, "Submission failed");
                Err(self.fail(err))
            }
        }
    }
}
