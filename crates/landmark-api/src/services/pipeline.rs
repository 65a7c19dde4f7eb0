//! Submission pipeline for image-backed records
//!
//! A submission moves through `Validating → Uploading → Persisting → Done`.
//! Field validation runs before anything is sent to the image store, so a
//! rejected form never leaves an asset behind. An asset uploaded for a record
//! that then fails to persist is logged with its public id; no compensating
//! delete is attempted.

use std::sync::Arc;
use std::time::Duration;

use landmark_core::models::{
    Client, ContentKind, ContentRecord, FormFields, Project, StoredImageReference, UploadCandidate,
};
use landmark_core::{AppError, SubmissionStage};
use landmark_db::{Repositories, Repository};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::state::AppState;

/// Text fields plus at most one validated image part, as read from a multipart body.
#[derive(Debug, Default)]
pub struct Submission {
    pub fields: FormFields,
    pub file: Option<UploadCandidate>,
}

/// A content record the pipeline can persist.
pub trait ContentResource: ContentRecord + Serialize {
    fn repository(repos: &Repositories) -> Arc<dyn Repository<Self>>;
}

impl ContentResource for Project {
    fn repository(repos: &Repositories) -> Arc<dyn Repository<Self>> {
        repos.projects.clone()
    }
}

impl ContentResource for Client {
    fn repository(repos: &Repositories) -> Arc<dyn Repository<Self>> {
        repos.clients.clone()
    }
}

struct StageTracker {
    kind: ContentKind,
    stage: SubmissionStage,
}

impl StageTracker {
    fn new(kind: ContentKind) -> Self {
        Self {
            kind,
            stage: SubmissionStage::Collecting,
        }
    }

    fn advance(&mut self, target: SubmissionStage) {
        match self.stage.advance(target) {
            Ok(()) => tracing::debug!(
                kind = self.kind.label(),
                stage = self.stage.name(),
                "Submission stage"
            ),
            Err(e) => tracing::warn!(error = %e, "Submission stage out of order"),
        }
    }

    fn fail(&mut self, err: AppError) -> AppError {
        let from = self.stage.name();
        if self
            .stage
            .advance(SubmissionStage::Failed(err.error_type().to_string()))
            .is_ok()
        {
            tracing::debug!(
                kind = self.kind.label(),
                stage = from,
                error = %err,
                "Submission failed"
            );
        }
        err
    }
}

async fn upload(
    state: &AppState,
    candidate: UploadCandidate,
) -> Result<StoredImageReference, AppError> {
    let limit = Duration::from_secs(state.config.upload_timeout_secs());
    match tokio::time::timeout(limit, state.images.store(candidate)).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => Err(AppError::Timeout(format!(
            "image store did not answer within {}s",
            limit.as_secs()
        ))),
    }
}

fn log_orphan(kind: ContentKind, image: &StoredImageReference) {
    tracing::warn!(
        kind = kind.label(),
        public_id = %image.public_id,
        url = %image.url,
        "Uploaded image is not referenced by any record"
    );
}

/// Create a record from a submission. The image is required.
#[tracing::instrument(skip_all, fields(kind = T::KIND.label()))]
pub async fn create_record<T: ContentResource>(
    state: &AppState,
    submission: Submission,
) -> Result<T, AppError> {
    let mut tracker = StageTracker::new(T::KIND);
    tracker.advance(SubmissionStage::Validating);

    let Some(file) = submission.file else {
        return Err(tracker.fail(AppError::MissingRequiredField(T::KIND.image_required())));
    };
    let input = T::input_from_form(&submission.fields);
    if let Err(errors) = input.validate() {
        return Err(tracker.fail(errors.into()));
    }

    tracker.advance(SubmissionStage::Uploading);
    let image = match upload(state, file).await {
        Ok(image) => image,
        Err(e) => return Err(tracker.fail(e)),
    };

    tracker.advance(SubmissionStage::Persisting);
    let record = T::from_input(input, image.clone());
    let stored = match T::repository(&state.repos).insert(record).await {
        Ok(stored) => stored,
        Err(e) => {
            log_orphan(T::KIND, &image);
            return Err(tracker.fail(e));
        }
    };

    tracker.advance(SubmissionStage::Done);
    tracing::info!(id = %stored.id(), public_id = %image.public_id, "Record created");
    Ok(stored.with_resolved_image(state.public_base_url()))
}

/// Merge a submission over an existing record. A new image is optional.
#[tracing::instrument(skip_all, fields(kind = T::KIND.label(), id = %id))]
pub async fn update_record<T: ContentResource>(
    state: &AppState,
    id: Uuid,
    submission: Submission,
) -> Result<T, AppError> {
    let repo = T::repository(&state.repos);
    let mut tracker = StageTracker::new(T::KIND);
    tracker.advance(SubmissionStage::Validating);

    let existing = match repo.get(id).await {
        Ok(Some(existing)) => existing,
        Ok(None) => return Err(tracker.fail(AppError::NotFound(T::KIND.not_found()))),
        Err(e) => return Err(tracker.fail(e)),
    };

    let input = existing.merged_input(&submission.fields);
    if let Err(errors) = input.validate() {
        return Err(tracker.fail(errors.into()));
    }

    let image = match submission.file {
        Some(file) => {
            tracker.advance(SubmissionStage::Uploading);
            match upload(state, file).await {
                Ok(image) => Some(image),
                Err(e) => return Err(tracker.fail(e)),
            }
        }
        None => None,
    };

    tracker.advance(SubmissionStage::Persisting);
    let mut record = existing;
    record.apply_input(input, image.clone());
    let updated = match repo.replace(record).await {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            if let Some(image) = &image {
                log_orphan(T::KIND, image);
            }
            return Err(tracker.fail(AppError::NotFound(T::KIND.not_found())));
        }
        Err(e) => {
            if let Some(image) = &image {
                log_orphan(T::KIND, image);
            }
            return Err(tracker.fail(e));
        }
    };

    tracker.advance(SubmissionStage::Done);
    tracing::info!(image_replaced = image.is_some(), "Record updated");
    Ok(updated.with_resolved_image(state.public_base_url()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use landmark_core::{Config, StorageBackend};
    use landmark_storage::{ImageStore, StorageError, StorageResult};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ImageStore for CountingStore {
        async fn store(&self, _candidate: UploadCandidate) -> StorageResult<StoredImageReference> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(StoredImageReference {
                url: format!("https://img.example/{}.jpg", n),
                public_id: format!("landmark-real-estate/{}", n),
            })
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::Cloudinary
        }
    }

    struct FailingStore;

    #[async_trait]
    impl ImageStore for FailingStore {
        async fn store(&self, _candidate: UploadCandidate) -> StorageResult<StoredImageReference> {
            Err(StorageError::UploadFailed("HTTP 500".into()))
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::Cloudinary
        }
    }

    fn state(images: Arc<dyn ImageStore>) -> AppState {
        AppState::new(Config::for_memory("uploads"), Repositories::in_memory(), images)
    }

    fn submission(fields: &[(&str, &str)], with_file: bool) -> Submission {
        Submission {
            fields: fields.iter().copied().collect(),
            file: with_file.then(|| UploadCandidate::new(vec![1u8, 2, 3], "image/png")),
        }
    }

    #[tokio::test]
    async fn invalid_fields_never_reach_the_store() {
        let store = Arc::new(CountingStore::default());
        let state = state(store.clone());
        let err = create_record::<Project>(&state, submission(&[("name", "Only name")], true))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_image_is_reported_first() {
        let state = state(Arc::new(CountingStore::default()));
        let err = create_record::<Client>(&state, submission(&[], false))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingRequiredField(msg) if msg == "Client image is required"));
    }

    #[tokio::test]
    async fn upload_failure_leaves_collection_empty() {
        let state = state(Arc::new(FailingStore));
        let fields = [("name", "Lakeview Tower"), ("description", "Tower")];
        let err = create_record::<Project>(&state, submission(&fields, true))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UploadFailed(_)));
        assert_eq!(state.repos.projects.list(None).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn update_without_image_keeps_existing_reference() {
        let store = Arc::new(CountingStore::default());
        let state = state(store.clone());
        let fields = [("name", "Lakeview Tower"), ("description", "Tower")];
        let created = create_record::<Project>(&state, submission(&fields, true))
            .await
            .unwrap();

        let updated = update_record::<Project>(
            &state,
            created.id,
            submission(&[("description", "Now with a rooftop pool")], false),
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Lakeview Tower");
        assert_eq!(updated.description, "Now with a rooftop pool");
        assert_eq!(updated.image, created.image);
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn update_of_unknown_id_skips_upload() {
        let store = Arc::new(CountingStore::default());
        let state = state(store.clone());
        let err = update_record::<Project>(&state, Uuid::new_v4(), submission(&[], true))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Project not found"));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn tracker_fails_once() {
        let mut tracker = StageTracker::new(ContentKind::Project);
        tracker.advance(SubmissionStage::Validating);
        let _ = tracker.fail(AppError::BadRequest("x".into()));
        assert_eq!(tracker.stage, SubmissionStage::Failed("BadRequest".into()));
        tracker.advance(SubmissionStage::Uploading);
        assert_eq!(tracker.stage, SubmissionStage::Failed("BadRequest".into()));
    }
}
