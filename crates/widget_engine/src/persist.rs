use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot save into {}: {reason}", path.display())]
    OutputDir { path: PathBuf, reason: String },
    #[error("saving download: {0}")]
    Io(#[from] io::Error),
}

/// Creates `dir` (and parents) unless it is already a directory.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let unusable = |reason: String| PersistError::OutputDir {
        path: dir.to_path_buf(),
        reason,
    };
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(unusable("exists and is not a directory".to_string())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|err| unusable(err.to_string()))
        }
        Err(err) => Err(unusable(err.to_string())),
    }
}

/// Saves downloads into one output directory.
///
/// Bytes land in a sibling temp file first and are renamed over the target,
/// so the target is either the old content or the complete new content.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;
        let target = self.dir.join(filename);

        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(content)?;
        staged.as_file().sync_all()?;

        // Windows refuses to rename onto an existing file.
        if target.is_file() {
            fs::remove_file(&target)?;
        }
        staged
            .persist(&target)
            .map_err(|persist_err| PersistError::Io(persist_err.error))?;
        Ok(target)
    }
}
