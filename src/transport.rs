//! HTTP transport layer
//!
//! All network round-trips go through the [`ApiTransport`] trait so that the
//! polling and upload orchestration can be exercised against a scripted
//! transport in tests. [`HttpTransport`] is the reqwest-backed
//! implementation used by [`crate::client::Client`].

use std::collections::HashMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::task::types::TaskState;

// ============================================================================
// Wire Types
// ============================================================================

/// Response to task submission
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    /// Server-assigned identifier for the submitted task
    #[serde(rename = "sessionID")]
    pub session_id: String,

    /// Whether the submission was accepted
    pub success: bool,
}

/// One task status snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct TaskStatusResponse {
    /// Current task state
    pub state: TaskState,

    /// Result payload, present only when completed
    #[serde(default)]
    pub data: Option<Value>,

    /// Error message, present only on failed/error
    #[serde(default)]
    pub error: Option<String>,

    /// Progress percentage (0-100), if the service reports one
    #[serde(default)]
    pub progress: Option<u8>,
}

/// Response to the multipart negotiate phase
#[derive(Debug, Clone, Deserialize)]
pub struct MultipartInit {
    /// Upload identifier for the whole multipart operation
    #[serde(rename = "uploadID")]
    pub upload_id: String,

    /// Storage key the object will live under
    pub key: String,

    /// Server-chosen part size in bytes
    #[serde(rename = "partSize")]
    pub part_size: u64,
}

/// One signed part URL from the authorize phase
#[derive(Debug, Clone, Deserialize)]
pub struct PresignedPart {
    #[serde(rename = "partNumber")]
    pub part_number: u32,

    #[serde(rename = "uploadURL")]
    pub upload_url: String,
}

/// One uploaded part with its integrity token, as sent to finalize
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedPart {
    #[serde(rename = "partNumber")]
    pub part_number: u32,

    pub etag: String,
}

/// Response to the single-shot presign request
#[derive(Debug, Clone, Deserialize)]
pub struct SinglePresign {
    #[serde(rename = "uploadURL")]
    pub upload_url: String,

    #[serde(rename = "downloadURL")]
    pub download_url: String,

    /// Opaque form fields the storage backend requires on the upload request
    #[serde(default)]
    pub fields: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
struct CreateMultipartRequest<'a> {
    #[serde(rename = "fileSuffix")]
    file_suffix: &'a str,
    #[serde(rename = "fileSize")]
    file_size: u64,
}

#[derive(Debug, Serialize)]
struct PresignPartsRequest<'a> {
    #[serde(rename = "uploadID")]
    upload_id: &'a str,
    key: &'a str,
    #[serde(rename = "partNumbers")]
    part_numbers: &'a [u32],
}

#[derive(Debug, Serialize)]
struct CompleteMultipartRequest<'a> {
    #[serde(rename = "uploadID")]
    upload_id: &'a str,
    key: &'a str,
    parts: &'a [CompletedPart],
}

#[derive(Debug, Deserialize)]
struct CompleteMultipartResponse {
    #[serde(rename = "downloadURL")]
    download_url: String,
}

#[derive(Debug, Serialize)]
struct PresignSingleRequest<'a> {
    #[serde(rename = "fileSuffix")]
    file_suffix: &'a str,
}

// ============================================================================
// Transport Trait
// ============================================================================

/// Network round-trips used by the poller and the upload paths
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Submit a task to a service
    async fn submit_task(
        &self,
        service: &str,
        inputs: &Value,
    ) -> Result<SubmitResponse, TransportError>;

    /// Read one status snapshot for a submitted task
    async fn task_status(
        &self,
        service: &str,
        session_id: &str,
    ) -> Result<TaskStatusResponse, TransportError>;

    /// Negotiate a multipart upload session
    async fn create_multipart_upload(
        &self,
        file_suffix: &str,
        file_size: u64,
    ) -> Result<MultipartInit, TransportError>;

    /// Request one signed URL per part number
    async fn presign_part_urls(
        &self,
        upload_id: &str,
        key: &str,
        part_numbers: &[u32],
    ) -> Result<Vec<PresignedPart>, TransportError>;

    /// Upload raw part bytes to a signed URL
    ///
    /// Returns the integrity token from the response `ETag` header, or
    /// `None` if the response carried no token.
    async fn upload_part(
        &self,
        url: &str,
        body: Vec<u8>,
    ) -> Result<Option<String>, TransportError>;

    /// Finalize a multipart upload, returning the public download URL
    async fn complete_multipart_upload(
        &self,
        upload_id: &str,
        key: &str,
        parts: &[CompletedPart],
    ) -> Result<String, TransportError>;

    /// Request one signed target for a single-shot upload
    async fn presign_single_upload(
        &self,
        file_suffix: &str,
    ) -> Result<SinglePresign, TransportError>;

    /// Submit the single-shot multipart form: provided fields plus payload
    async fn upload_form(
        &self,
        url: &str,
        fields: &HashMap<String, String>,
        file_name: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<(), TransportError>;
}

// ============================================================================
// Reqwest Implementation
// ============================================================================

/// Reqwest-backed transport
///
/// Service endpoints carry `Authorization: Bearer <token>`; raw signed-URL
/// transfers carry no additional authentication.
#[derive(Debug)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl HttpTransport {
    /// Build a transport from client configuration
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Map a non-success response to `TransportError::Status`
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(TransportError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, TransportError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.endpoint(path))
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await?;

        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn get_json<R>(&self, path: &str) -> Result<R, TransportError>
    where
        R: DeserializeOwned,
    {
        let response = self
            .http
            .get(self.endpoint(path))
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn submit_task(
        &self,
        service: &str,
        inputs: &Value,
    ) -> Result<SubmitResponse, TransportError> {
        let path = format!("{}/submit", urlencoding::encode(service));
        self.post_json(&path, inputs).await
    }

    async fn task_status(
        &self,
        service: &str,
        session_id: &str,
    ) -> Result<TaskStatusResponse, TransportError> {
        let path = format!(
            "{}/result/{}",
            urlencoding::encode(service),
            urlencoding::encode(session_id)
        );
        self.get_json(&path).await
    }

    async fn create_multipart_upload(
        &self,
        file_suffix: &str,
        file_size: u64,
    ) -> Result<MultipartInit, TransportError> {
        let body = CreateMultipartRequest {
            file_suffix,
            file_size,
        };
        self.post_json("file-upload/action/create-multipart-upload", &body)
            .await
    }

    async fn presign_part_urls(
        &self,
        upload_id: &str,
        key: &str,
        part_numbers: &[u32],
    ) -> Result<Vec<PresignedPart>, TransportError> {
        let body = PresignPartsRequest {
            upload_id,
            key,
            part_numbers,
        };
        self.post_json("file-upload/action/generate-presigned-urls", &body)
            .await
    }

    async fn upload_part(
        &self,
        url: &str,
        body: Vec<u8>,
    ) -> Result<Option<String>, TransportError> {
        let response = self.http.put(url).body(body).send().await?;
        let response = Self::check(response).await?;

        let etag = response
            .headers()
            .get(reqwest::header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        Ok(etag)
    }

    async fn complete_multipart_upload(
        &self,
        upload_id: &str,
        key: &str,
        parts: &[CompletedPart],
    ) -> Result<String, TransportError> {
        let body = CompleteMultipartRequest {
            upload_id,
            key,
            parts,
        };
        let response: CompleteMultipartResponse = self
            .post_json("file-upload/action/complete-multipart-upload", &body)
            .await?;
        Ok(response.download_url)
    }

    async fn presign_single_upload(
        &self,
        file_suffix: &str,
    ) -> Result<SinglePresign, TransportError> {
        let body = PresignSingleRequest { file_suffix };
        self.post_json("file-upload/action/generate-presigned-url", &body)
            .await
    }

    async fn upload_form(
        &self,
        url: &str,
        fields: &HashMap<String, String>,
        file_name: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<(), TransportError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in fields {
            form = form.text(name.clone(), value.clone());
        }

        let part = reqwest::multipart::Part::bytes(body)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| TransportError::Request(e.to_string()))?;
        form = form.part("file", part);

        let response = self.http.post(url).multipart(form).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

// ============================================================================
// Scripted Transport for Tests
// ============================================================================


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_response_wire_format() {
        let response: SubmitResponse =
            serde_json::from_str(r#"{"sessionID":"abc-123","success":true}"#).unwrap();
        assert_eq!(response.session_id, "abc-123");
        assert!(response.success);
    }

    #[test]
    fn test_status_response_optional_fields() {
        let response: TaskStatusResponse =
            serde_json::from_str(r#"{"state":"processing","progress":42}"#).unwrap();
        assert_eq!(response.state, TaskState::Processing);
        assert_eq!(response.progress, Some(42));
        assert!(response.data.is_none());
        assert!(response.error.is_none());
    }

    #[test]
    fn test_multipart_init_wire_format() {
        let init: MultipartInit = serde_json::from_str(
            r#"{"uploadID":"up-1","key":"objects/a","partSize":5242880}"#,
        )
        .unwrap();
        assert_eq!(init.upload_id, "up-1");
        assert_eq!(init.key, "objects/a");
        assert_eq!(init.part_size, 5 * 1024 * 1024);
    }

    #[test]
    fn test_completed_part_serializes_part_number() {
        let part = CompletedPart {
            part_number: 3,
            etag: "\"abc\"".to_string(),
        };
        let json = serde_json::to_string(&part).unwrap();
        assert!(json.contains("\"partNumber\":3"));
        assert!(json.contains("etag"));
    }
}
