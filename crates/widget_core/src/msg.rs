#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// File picker changed; only the first file is used.
    FilesSelected(Vec<crate::SelectedFile>),
    /// Transport reported bytes sent for a session.
    UploadProgress {
        session_id: crate::SessionId,
        loaded: u64,
        total: Option<u64>,
    },
    /// Server answered 2xx and the body is available as an object URL.
    UploadSucceeded {
        session_id: crate::SessionId,
        result: crate::ResultImage,
    },
    /// Non-2xx response, transport error, or cancellation.
    UploadFailed {
        session_id: crate::SessionId,
        reason: String,
    },
    /// User aborted the current upload.
    CancelClicked,
    /// User asked to save the current result.
    DownloadClicked { filename: String },
    /// Widget is being discarded.
    Teardown,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
