use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use widget_engine::{
    EngineEvent, FailureKind, ProgressSink, ReqwestUploader, UploadProgress, UploadRequest,
    UploadSettings, Uploader,
};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    fn progress(&self) -> Vec<UploadProgress> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                EngineEvent::Progress(progress) => Some(progress.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn write_clip(dir: &Path, name: &str, content: &[u8]) -> UploadRequest {
    let file_path = dir.join(name);
    fs::write(&file_path, content).unwrap();
    UploadRequest {
        file_name: name.to_string(),
        content_type: "video/mp4".to_string(),
        path: file_path,
    }
}

fn settings_for(server: &MockServer) -> UploadSettings {
    UploadSettings {
        endpoint: server.uri(),
        chunk_size: 4,
        ..UploadSettings::default()
    }
}

#[tokio::test]
async fn uploads_multipart_file_and_returns_image() {
    widget_logging::initialize_for_tests();
    let server = MockServer::start().await;
    let image = vec![0xFFu8, 0xD8, 0xFF, 0xE0, 1, 2, 3, 4, 5, 6, 7, 8, 0xFF, 0xD9];
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"clip.mp4\""))
        .and(body_string_contains("frames-of-a-video"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(image.clone(), "image/jpeg"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = write_clip(dir.path(), "clip.mp4", b"frames-of-a-video");
    let uploader = ReqwestUploader::new(settings_for(&server));
    let sink = Arc::new(TestSink::default());

    let output = uploader
        .upload(1, &request, sink.clone())
        .await
        .expect("upload ok");

    assert_eq!(output.status, 200);
    assert_eq!(output.content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(output.bytes.len(), image.len());
    assert_eq!(output.bytes, image);

    let progress = sink.progress();
    assert_eq!(
        progress.first(),
        Some(&UploadProgress {
            session_id: 1,
            loaded: 0,
            total: Some(17),
        })
    );
    assert_eq!(
        progress.last(),
        Some(&UploadProgress {
            session_id: 1,
            loaded: 17,
            total: Some(17),
        })
    );
    let loaded: Vec<u64> = progress.iter().map(|p| p.loaded).collect();
    assert_eq!(loaded, vec![0, 4, 8, 12, 16, 17]);
}

#[tokio::test]
async fn empty_file_reports_unknown_total() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![1u8, 2, 3], "image/jpeg"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = write_clip(dir.path(), "empty.mp4", b"");
    let uploader = ReqwestUploader::new(settings_for(&server));
    let sink = Arc::new(TestSink::default());

    let output = uploader.upload(4, &request, sink.clone()).await.unwrap();

    assert_eq!(output.bytes, vec![1, 2, 3]);
    assert!(sink.progress().iter().all(|p| p.total.is_none()));
}

#[tokio::test]
async fn server_error_message_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "no face detected"
            })),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = write_clip(dir.path(), "clip.mp4", b"abc");
    let uploader = ReqwestUploader::new(settings_for(&server));

    let err = uploader
        .upload(2, &request, Arc::new(TestSink::default()))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(400));
    assert_eq!(err.message, "no face detected");
}

#[tokio::test]
async fn non_json_error_uses_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = write_clip(dir.path(), "clip.mp4", b"abc");
    let uploader = ReqwestUploader::new(settings_for(&server));

    let err = uploader
        .upload(3, &request, Arc::new(TestSink::default()))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(503));
    assert!(err.message.starts_with("503"));
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_raw(vec![1u8], "image/jpeg"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = write_clip(dir.path(), "clip.mp4", b"abc");
    let uploader = ReqwestUploader::new(UploadSettings {
        request_timeout: Duration::from_millis(50),
        ..settings_for(&server)
    });

    let err = uploader
        .upload(5, &request, Arc::new(TestSink::default()))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 11], "image/jpeg"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = write_clip(dir.path(), "clip.mp4", b"abc");
    let uploader = ReqwestUploader::new(UploadSettings {
        max_response_bytes: 10,
        ..settings_for(&server)
    });

    let err = uploader
        .upload(6, &request, Arc::new(TestSink::default()))
        .await
        .unwrap_err();

    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn missing_file_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = UploadRequest {
        file_name: "gone.mp4".to_string(),
        content_type: "video/mp4".to_string(),
        path: dir.path().join("gone.mp4"),
    };
    let uploader = ReqwestUploader::new(settings_for(&server));
    let sink = Arc::new(TestSink::default());

    let err = uploader.upload(7, &request, sink.clone()).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::FileRead);
    assert!(sink.progress().is_empty());
}
