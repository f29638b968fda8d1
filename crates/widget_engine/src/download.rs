use std::path::PathBuf;

use thiserror::Error;
use widget_logging::widget_info;

use crate::{sanitize_download_filename, AtomicFileWriter, ObjectUrlStore, PersistError};

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("object url {0} is not live")]
    UnknownObjectUrl(String),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Saves the blob behind `url` as `filename` in the writer's directory.
pub fn download(
    store: &ObjectUrlStore,
    url: &str,
    filename: &str,
    writer: &AtomicFileWriter,
) -> Result<PathBuf, DownloadError> {
    let blob = store
        .get(url)
        .ok_or_else(|| DownloadError::UnknownObjectUrl(url.to_string()))?;
    let filename = sanitize_download_filename(filename);
    let path = writer.write(&filename, &blob.data)?;
    widget_info!("Downloaded {} to {:?} ({} bytes)", url, path, blob.len());
    Ok(path)
}
