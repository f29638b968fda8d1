use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use widget_core::{Effect, Msg, ObjectUrl, ResultImage, SelectedFile};
use widget_engine::{
    download, AtomicFileWriter, EngineEvent, EngineHandle, FailureKind, ObjectUrlStore,
    SelectedFileInfo, UploadRequest,
};
use widget_logging::{widget_debug, widget_error, widget_info, widget_warn};

/// Executes core effects against the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    store: ObjectUrlStore,
    writer: AtomicFileWriter,
    downloads: Vec<PathBuf>,
    failed_downloads: usize,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, output_dir: PathBuf) -> Self {
        Self {
            engine,
            store: ObjectUrlStore::new(),
            writer: AtomicFileWriter::new(output_dir),
            downloads: Vec::new(),
            failed_downloads: 0,
        }
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartUpload { session_id, file } => {
                    widget_info!(
                        "StartUpload session={} file={} type={} bytes={:?}",
                        session_id,
                        file.name,
                        file.content_type,
                        file.byte_len
                    );
                    self.engine.start(
                        session_id,
                        UploadRequest {
                            file_name: file.name,
                            content_type: file.content_type,
                            path: file.path,
                        },
                    );
                }
                Effect::CancelUpload { session_id } => {
                    widget_info!("CancelUpload session={}", session_id);
                    self.engine.cancel(session_id);
                }
                Effect::ReleaseObjectUrl { url } => {
                    if !self.store.revoke(url.as_str()) {
                        widget_warn!("Release of {} which is not live", url);
                    }
                }
                Effect::TriggerDownload { url, filename } => {
                    match download(&self.store, url.as_str(), &filename, &self.writer) {
                        Ok(path) => self.downloads.push(path),
                        Err(err) => {
                            widget_error!("Download of {} failed: {}", url, err);
                            self.failed_downloads += 1;
                        }
                    }
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine event.
    pub fn next_msg(&mut self, timeout: Duration) -> Option<Msg> {
        let event = self.engine.recv_timeout(timeout)?;
        Some(self.map_event(event))
    }

    fn map_event(&mut self, event: EngineEvent) -> Msg {
        match event {
            EngineEvent::Progress(progress) => Msg::UploadProgress {
                session_id: progress.session_id,
                loaded: progress.loaded,
                total: progress.total,
            },
            EngineEvent::UploadCompleted {
                session_id,
                result: Ok(output),
            } => {
                let byte_len = output.bytes.len() as u64;
                let url = self
                    .store
                    .create(output.bytes, output.content_type.clone());
                Msg::UploadSucceeded {
                    session_id,
                    result: ResultImage {
                        url: ObjectUrl::new(url),
                        byte_len,
                        content_type: output.content_type,
                        received_at: Utc::now().to_rfc3339(),
                    },
                }
            }
            EngineEvent::UploadCompleted {
                session_id,
                result: Err(err),
            } => {
                if err.kind == FailureKind::Cancelled {
                    widget_debug!("Upload {} cancelled", session_id);
                } else {
                    widget_warn!("Upload {} failed: {}", session_id, err);
                }
                Msg::UploadFailed {
                    session_id,
                    reason: err.to_string(),
                }
            }
        }
    }

    pub fn live_urls(&self) -> usize {
        self.store.len()
    }

    pub fn take_downloads(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.downloads)
    }

    pub fn take_failed_downloads(&mut self) -> usize {
        std::mem::take(&mut self.failed_downloads)
    }
}

pub fn to_selected_file(info: SelectedFileInfo) -> SelectedFile {
    SelectedFile {
        name: info.name,
        content_type: info.content_type,
        byte_len: Some(info.byte_len),
        path: info.path,
    }
}
