//! Remote transform-and-store through the Cloudinary upload API.

use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use landmark_core::{StorageBackend, StoredImageReference, UploadCandidate, UploadSettings};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::traits::{ImageStore, StorageError, StorageResult};
use crate::transform::TransformSpec;

#[derive(Clone)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl Debug for CloudinaryCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CloudinaryCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    public_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct CloudinaryImageStore {
    http_client: reqwest::Client,
    upload_url: String,
    credentials: CloudinaryCredentials,
    folder: String,
    transform: TransformSpec,
    timeout: Duration,
}

impl Debug for CloudinaryImageStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CloudinaryImageStore")
            .field("upload_url", &self.upload_url)
            .field("folder", &self.folder)
            .field("transform", &self.transform.to_string())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CloudinaryImageStore {
    /// # Arguments
    /// * `api_base` - API root, e.g. `https://api.cloudinary.com/v1_1`
    /// * `timeout` - upper bound for one upload, including the response body
    pub fn new(
        credentials: CloudinaryCredentials,
        api_base: &str,
        settings: &UploadSettings,
        timeout: Duration,
    ) -> StorageResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        let upload_url = format!(
            "{}/{}/image/upload",
            api_base.trim_end_matches('/'),
            credentials.cloud_name
        );

        Ok(Self {
            http_client,
            upload_url,
            credentials,
            folder: settings.folder.clone(),
            transform: TransformSpec::from_settings(settings),
            timeout,
        })
    }

    /// SHA-256 over `k=v` pairs joined by `&` in key order, followed by the secret.
    pub(crate) fn sign(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
        let to_sign = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn transport_error(&self, err: reqwest::Error) -> StorageError {
        if err.is_timeout() {
            StorageError::Timeout(format!(
                "image service did not answer within {}s",
                self.timeout.as_secs_f64()
            ))
        } else {
            StorageError::UploadFailed(format!("Request to image service failed: {}", err))
        }
    }
}

#[async_trait]
impl ImageStore for CloudinaryImageStore {
    #[tracing::instrument(skip(self, candidate), fields(
        storage.backend = "cloudinary",
        size_bytes = candidate.len(),
        content_type = %candidate.content_type,
    ))]
    async fn store(&self, candidate: UploadCandidate) -> StorageResult<StoredImageReference> {
        let start = Instant::now();
        let timestamp = Utc::now().timestamp().to_string();

        let mut params = BTreeMap::new();
        params.insert("folder", self.folder.clone());
        params.insert("timestamp", timestamp);
        params.insert("transformation", self.transform.to_string());
        let signature = Self::sign(&params, &self.credentials.api_secret);

        let data_uri = format!(
            "data:{};base64,{}",
            candidate.content_type,
            STANDARD.encode(&candidate.data)
        );

        let mut form = reqwest::multipart::Form::new()
            .text("file", data_uri)
            .text("api_key", self.credentials.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key, value);
        }

        let response = self
            .http_client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(StorageError::UploadFailed(format!(
                "Image service returned {}: {}",
                status, detail
            )));
        }

        let parsed: UploadResponse = serde_json::from_str(&body).map_err(|e| {
            StorageError::UploadFailed(format!("Malformed image service response: {}", e))
        })?;
        let (url, public_id) = match (parsed.secure_url, parsed.public_id) {
            (Some(url), Some(public_id)) if !url.is_empty() && !public_id.is_empty() => {
                (url, public_id)
            }
            _ => {
                return Err(StorageError::UploadFailed(
                    "Image service response is missing secure_url or public_id".to_string(),
                ))
            }
        };

        tracing::info!(
            public_id = %public_id,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image uploaded to cloud storage"
        );

        Ok(StoredImageReference { url, public_id })
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Cloudinary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn credentials() -> CloudinaryCredentials {
        CloudinaryCredentials {
            cloud_name: "demo".to_string(),
            api_key: "key-123".to_string(),
            api_secret: "shh".to_string(),
        }
    }

    fn store_for(base: &str, timeout: Duration) -> CloudinaryImageStore {
        CloudinaryImageStore::new(credentials(), base, &UploadSettings::default(), timeout).unwrap()
    }

    fn candidate() -> UploadCandidate {
        UploadCandidate::new(vec![0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg").with_file_name("a.jpg")
    }

    #[test]
    fn signature_is_order_independent_sha256_hex() {
        let mut a = BTreeMap::new();
        a.insert("timestamp", "1700000000".to_string());
        a.insert("folder", "landmark-real-estate".to_string());
        let mut b = BTreeMap::new();
        b.insert("folder", "landmark-real-estate".to_string());
        b.insert("timestamp", "1700000000".to_string());

        let sig = CloudinaryImageStore::sign(&a, "shh");
        assert_eq!(sig, CloudinaryImageStore::sign(&b, "shh"));
        assert_eq!(sig.len(), 64);
        assert_ne!(sig, CloudinaryImageStore::sign(&a, "other"));

        let expected = hex::encode(Sha256::digest(
            b"folder=landmark-real-estate&timestamp=1700000000shh",
        ));
        assert_eq!(sig, expected);
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let rendered = format!("{:?}", credentials());
        assert!(!rendered.contains("shh"));
    }

    #[tokio::test]
    async fn successful_upload_returns_reference() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/demo/image/upload")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("c_fill,w_450,h_350/q_auto/f_auto".to_string()),
                Matcher::Regex("landmark-real-estate".to_string()),
                Matcher::Regex("data:image/jpeg;base64,".to_string()),
                Matcher::Regex("sha256".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"secure_url":"https://res.cloudinary.com/demo/image/upload/v1/landmark-real-estate/abc.jpg","public_id":"landmark-real-estate/abc"}"#,
            )
            .create_async()
            .await;

        let store = store_for(&server.url(), Duration::from_secs(5));
        let stored = store.store(candidate()).await.unwrap();
        assert_eq!(stored.public_id, "landmark-real-estate/abc");
        assert!(stored.url.starts_with("https://"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_upload_failed() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/demo/image/upload")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Invalid Signature"}}"#)
            .create_async()
            .await;

        let err = store_for(&server.url(), Duration::from_secs(5))
            .store(candidate())
            .await
            .unwrap_err();
        match err {
            StorageError::UploadFailed(msg) => assert!(msg.contains("Invalid Signature")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_response_is_upload_failed() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/demo/image/upload")
            .with_status(200)
            .with_body(r#"{"url":"http://x"}"#)
            .create_async()
            .await;

        let err = store_for(&server.url(), Duration::from_secs(5))
            .store(candidate())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::UploadFailed(_)));
    }

    #[tokio::test]
    async fn unreachable_service_is_upload_failed() {
        let store = store_for("http://127.0.0.1:1", Duration::from_secs(5));
        let err = store.store(candidate()).await.unwrap_err();
        assert!(matches!(err, StorageError::UploadFailed(_)));
    }

    #[tokio::test]
    async fn silent_service_times_out() {
        // Accepts connections but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _hold = tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });

        let store = store_for(&format!("http://{}", addr), Duration::from_millis(200));
        let err = store.store(candidate()).await.unwrap_err();
        assert!(matches!(err, StorageError::Timeout(_)), "{:?}", err);
    }
}
