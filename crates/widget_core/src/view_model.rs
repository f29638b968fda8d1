use crate::{ObjectUrl, Progress, UploadStatus};

/// Filename offered when the user saves the processed image.
pub const DEFAULT_DOWNLOAD_FILENAME: &str = "processed_image.jpg";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WidgetViewModel {
    pub status: UploadStatus,
    pub progress: Progress,
    pub file_name: Option<String>,
    pub result: Option<ResultView>,
    pub can_download: bool,
    pub can_cancel: bool,
    pub last_error: Option<String>,
    pub last_rejection: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub url: ObjectUrl,
    pub byte_len: u64,
    pub content_type: Option<String>,
    pub received_at: String,
}

impl WidgetViewModel {
    pub fn button_label(&self) -> &'static str {
        if self.result.is_some() {
            "Replace File"
        } else {
            "Upload File"
        }
    }

    /// Text shown in the result area when there is nothing to display.
    pub fn placeholder(&self) -> Option<&'static str> {
        match (self.status, &self.result) {
            (UploadStatus::Uploading, _) | (_, Some(_)) => None,
            _ => Some("No file uploaded"),
        }
    }

    pub fn caption(&self) -> Option<&'static str> {
        self.result.as_ref().map(|_| "Processed Image")
    }
}
