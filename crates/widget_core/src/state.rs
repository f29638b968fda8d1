use std::fmt;
use std::path::PathBuf;

use crate::view_model::{ResultView, WidgetViewModel};
use crate::{AcceptFilter, Progress};

pub type SessionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading,
    Succeeded,
    Failed,
}

/// A file picked by the user, not yet read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub byte_len: Option<u64>,
    pub path: PathBuf,
}

/// Process-local reference to result bytes held by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultImage {
    pub url: ObjectUrl,
    pub byte_len: u64,
    pub content_type: Option<String>,
    pub received_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    pub id: SessionId,
    pub file_name: String,
    pub status: UploadStatus,
    pub progress: Progress,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WidgetState {
    accept: AcceptFilter,
    last_session_id: SessionId,
    session: Option<UploadSession>,
    result: Option<ResultImage>,
    last_error: Option<String>,
    last_rejection: Option<String>,
    dirty: bool,
}

impl WidgetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accept_filter(accept: AcceptFilter) -> Self {
        Self {
            accept,
            ..Self::default()
        }
    }

    pub fn view(&self) -> WidgetViewModel {
        let status = self
            .session
            .as_ref()
            .map(|s| s.status)
            .unwrap_or_default();
        let progress = self
            .session
            .as_ref()
            .map(|s| s.progress)
            .unwrap_or_default();
        let result = self.result.as_ref().map(|r| ResultView {
            url: r.url.clone(),
            byte_len: r.byte_len,
            content_type: r.content_type.clone(),
            received_at: r.received_at.clone(),
        });
        WidgetViewModel {
            status,
            progress,
            file_name: self.session.as_ref().map(|s| s.file_name.clone()),
            can_download: result.is_some(),
            can_cancel: status == UploadStatus::Uploading,
            result,
            last_error: self.last_error.clone(),
            last_rejection: self.last_rejection.clone(),
            dirty: self.dirty,
        }
    }

    pub fn status(&self) -> UploadStatus {
        self.session.as_ref().map(|s| s.status).unwrap_or_default()
    }

    pub fn session(&self) -> Option<&UploadSession> {
        self.session.as_ref()
    }

    pub fn result(&self) -> Option<&ResultImage> {
        self.result.as_ref()
    }

    pub fn accept_filter(&self) -> &AcceptFilter {
        &self.accept
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Id of the session whose events are still applied, if it is in flight.
    pub(crate) fn uploading_session_id(&self) -> Option<SessionId> {
        self.session
            .as_ref()
            .filter(|s| s.status == UploadStatus::Uploading)
            .map(|s| s.id)
    }

    pub(crate) fn begin_session(&mut self, file_name: String) -> SessionId {
        self.last_session_id += 1;
        let id = self.last_session_id;
        self.session = Some(UploadSession {
            id,
            file_name,
            status: UploadStatus::Uploading,
            progress: Progress::Unknown,
        });
        self.last_error = None;
        self.last_rejection = None;
        self.mark_dirty();
        id
    }

    pub(crate) fn reject_selection(&mut self, reason: String) {
        self.last_rejection = Some(reason);
        self.mark_dirty();
    }

    pub(crate) fn apply_progress(&mut self, progress: Progress) {
        if let Some(session) = self.session.as_mut() {
            if session.progress != progress {
                session.progress = progress;
                self.dirty = true;
            }
        }
    }

    /// Stores the new result and hands back the one it replaces.
    pub(crate) fn apply_success(&mut self, result: ResultImage) -> Option<ResultImage> {
        if let Some(session) = self.session.as_mut() {
            session.status = UploadStatus::Succeeded;
            session.progress = Progress::Percent(100);
        }
        self.mark_dirty();
        self.result.replace(result)
    }

    pub(crate) fn apply_failure(&mut self, reason: String) {
        if let Some(session) = self.session.as_mut() {
            session.status = UploadStatus::Failed;
        }
        self.last_error = Some(reason);
        self.mark_dirty();
    }

    pub(crate) fn cancel_session(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.status = UploadStatus::Idle;
            session.progress = Progress::Unknown;
        }
        self.mark_dirty();
    }

    /// Drops session and result; returns the result so it can be released.
    pub(crate) fn teardown(&mut self) -> Option<ResultImage> {
        self.session = None;
        self.last_error = None;
        self.last_rejection = None;
        self.mark_dirty();
        self.result.take()
    }
}
