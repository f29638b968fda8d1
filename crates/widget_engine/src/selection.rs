use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

const OCTET_STREAM: &str = "application/octet-stream";

const KNOWN_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("heic", "image/heic"),
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("mov", "video/quicktime"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("avi", "video/x-msvideo"),
    ("mpeg", "video/mpeg"),
    ("mpg", "video/mpeg"),
    ("3gp", "video/3gpp"),
];

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("{path:?} is not a file")]
    NotAFile { path: PathBuf },
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A file picked from disk, described the way a browser file input does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFileInfo {
    pub name: String,
    pub content_type: String,
    pub byte_len: u64,
    pub path: PathBuf,
}

pub fn select_file(path: &Path) -> Result<SelectedFileInfo, SelectionError> {
    let meta = fs::metadata(path).map_err(|source| SelectionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !meta.is_file() {
        return Err(SelectionError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(SelectedFileInfo {
        content_type: guess_content_type(&name).to_string(),
        name,
        byte_len: meta.len(),
        path: path.to_path_buf(),
    })
}

/// MIME type from the file extension; unknown extensions are `application/octet-stream`.
pub fn guess_content_type(name: &str) -> &'static str {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return OCTET_STREAM;
    };
    KNOWN_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
        .unwrap_or(OCTET_STREAM)
}
