use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures_util::{stream, Stream, StreamExt};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use widget_logging::{widget_debug, widget_info};

use crate::{EngineEvent, FailureKind, SessionId, UploadError, UploadOutput, UploadProgress, UploadRequest};

#[derive(Debug, Clone)]
pub struct UploadSettings {
    /// Base URL of the processing service.
    pub endpoint: String,
    pub upload_path: String,
    /// Multipart field carrying the file.
    pub field_name: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
    /// Size of the pieces the request body is streamed in; one progress event per piece.
    pub chunk_size: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000".to_string(),
            upload_path: "/upload".to_string(),
            field_name: "file".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            max_response_bytes: 20 * 1024 * 1024,
            chunk_size: 64 * 1024,
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Sends one file and yields the processed response body.
///
/// Progress is reported through `sink` while the request body is being sent;
/// the returned future resolves with the final result or error.
#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(
        &self,
        session_id: SessionId,
        request: &UploadRequest,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<UploadOutput, UploadError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestUploader {
    settings: UploadSettings,
}

impl ReqwestUploader {
    pub fn new(settings: UploadSettings) -> Self {
        Self { settings }
    }

    /// `{endpoint}/{upload_path}`, keeping any path prefix of the endpoint.
    fn upload_url(&self) -> Result<reqwest::Url, UploadError> {
        let mut base =
            reqwest::Url::parse(&self.settings.endpoint).map_err(invalid_endpoint)?;
        // join() replaces the last segment unless the base ends in '/'.
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }
        base.join(self.settings.upload_path.trim_start_matches('/'))
            .map_err(invalid_endpoint)
    }

    fn build_client(&self) -> Result<reqwest::Client, UploadError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| UploadError::new(FailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Uploader for ReqwestUploader {
    async fn upload(
        &self,
        session_id: SessionId,
        request: &UploadRequest,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<UploadOutput, UploadError> {
        let url = self.upload_url()?;
        let client = self.build_client()?;

        let data = tokio::fs::read(&request.path).await.map_err(|err| {
            UploadError::new(
                FailureKind::FileRead,
                format!("{}: {err}", request.path.display()),
            )
        })?;
        let data = Bytes::from(data);
        let len = data.len() as u64;
        // An empty body gives the transport nothing to measure progress against.
        let total = (len > 0).then_some(len);

        sink.emit(EngineEvent::Progress(UploadProgress {
            session_id,
            loaded: 0,
            total,
        }));

        let body = reqwest::Body::wrap_stream(progress_stream(
            data,
            self.settings.chunk_size,
            session_id,
            total,
            sink,
        ));
        let part = Part::stream_with_length(body, len)
            .file_name(request.file_name.clone())
            .mime_str(&request.content_type)
            .map_err(map_reqwest_error)?;
        let form = Form::new().part(self.settings.field_name.clone(), part);

        widget_debug!(
            "Upload session={} url={} file={} bytes={}",
            session_id,
            url,
            request.file_name,
            len
        );
        let response = client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = server_error_message(&body).unwrap_or_else(|| status.to_string());
            return Err(UploadError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(UploadError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(UploadError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        widget_info!(
            "Upload session={} done status={} response_bytes={}",
            session_id,
            status.as_u16(),
            bytes.len()
        );
        Ok(UploadOutput {
            status: status.as_u16(),
            content_type,
            bytes,
        })
    }
}

/// Splits `data` into pieces and reports the running byte count as the
/// transport pulls each one.
fn progress_stream(
    data: Bytes,
    chunk_size: usize,
    session_id: SessionId,
    total: Option<u64>,
    sink: Arc<dyn ProgressSink>,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
    let len = data.len();
    let chunk_size = chunk_size.max(1);
    let chunks = (0..len)
        .step_by(chunk_size)
        .map(move |start| data.slice(start..(start + chunk_size).min(len)));
    let mut loaded = 0u64;
    stream::iter(chunks).map(move |chunk| {
        loaded += chunk.len() as u64;
        sink.emit(EngineEvent::Progress(UploadProgress {
            session_id,
            loaded,
            total,
        }));
        Ok(chunk)
    })
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    detail: Option<serde_json::Value>,
}

/// Extracts `{"error": "..."}` or `{"detail": ...}` from a JSON error body.
fn server_error_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    parsed.error.or_else(|| {
        parsed.detail.map(|detail| match detail {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        })
    })
}

fn invalid_endpoint(err: impl std::fmt::Display) -> UploadError {
    UploadError::new(FailureKind::InvalidEndpoint, err.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> UploadError {
    if err.is_timeout() {
        return UploadError::new(FailureKind::Timeout, err.to_string());
    }
    UploadError::new(FailureKind::Network, err.to_string())
}
