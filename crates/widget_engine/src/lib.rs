//! Upload widget engine: file selection, upload transport and result storage.
mod blob;
mod download;
mod engine;
mod filename;
mod persist;
mod selection;
mod types;
mod upload;

pub use blob::{Blob, ObjectUrlStore};
pub use download::{download, DownloadError};
pub use engine::EngineHandle;
pub use filename::sanitize_download_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use selection::{guess_content_type, select_file, SelectedFileInfo, SelectionError};
pub use types::{
    EngineEvent, FailureKind, SessionId, UploadError, UploadOutput, UploadProgress, UploadRequest,
};
pub use upload::{ChannelProgressSink, ProgressSink, ReqwestUploader, UploadSettings, Uploader};
