use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use widget_core::{AcceptFilter, DEFAULT_DOWNLOAD_FILENAME};
use widget_engine::UploadSettings;
use widget_logging::{widget_info, widget_warn};

pub const DEFAULT_CONFIG_FILE: &str = "upload_widget.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Settings read from `upload_widget.ron`; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub endpoint: String,
    pub upload_path: String,
    pub field_name: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
    pub output_dir: PathBuf,
    pub download_filename: String,
    /// MIME patterns the file chooser accepts.
    pub accept: Vec<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        let upload = UploadSettings::default();
        Self {
            endpoint: upload.endpoint,
            upload_path: upload.upload_path,
            field_name: upload.field_name,
            connect_timeout_secs: upload.connect_timeout.as_secs(),
            request_timeout_secs: upload.request_timeout.as_secs(),
            max_response_bytes: upload.max_response_bytes,
            output_dir: PathBuf::from("output"),
            download_filename: DEFAULT_DOWNLOAD_FILENAME.to_string(),
            accept: AcceptFilter::default().patterns().to_vec(),
        }
    }
}

impl WidgetConfig {
    pub fn upload_settings(&self) -> UploadSettings {
        UploadSettings {
            endpoint: self.endpoint.clone(),
            upload_path: self.upload_path.clone(),
            field_name: self.field_name.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_response_bytes: self.max_response_bytes,
            ..UploadSettings::default()
        }
    }

    pub fn accept_filter(&self) -> AcceptFilter {
        AcceptFilter::new(self.accept.iter().cloned())
    }
}

/// Reads the config file; `Ok(None)` when it does not exist.
pub fn load_config(path: &Path) -> Result<Option<WidgetConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    ron::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

pub fn load_or_default(path: &Path) -> WidgetConfig {
    match load_config(path) {
        Ok(Some(config)) => {
            widget_info!("Loaded config from {:?}", path);
            config
        }
        Ok(None) => WidgetConfig::default(),
        Err(err) => {
            widget_warn!("{}; using defaults", err);
            WidgetConfig::default()
        }
    }
}
