use crate::{ObjectUrl, SelectedFile, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send `file` to the upload endpoint, tagged with `session_id`.
    StartUpload {
        session_id: SessionId,
        file: SelectedFile,
    },
    /// Abort an in-flight upload that is no longer current.
    CancelUpload { session_id: SessionId },
    /// The object URL is no longer referenced by the widget.
    ReleaseObjectUrl { url: ObjectUrl },
    /// Save the blob behind `url` under `filename`.
    TriggerDownload { url: ObjectUrl, filename: String },
}
