use std::collections::HashMap;

use bytes::Bytes;
use widget_logging::widget_debug;

/// Bytes kept alive behind an object URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub data: Bytes,
    pub content_type: Option<String>,
}

impl Blob {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Owns the blobs handed out as `blob:` URLs.
///
/// A URL stays valid until it is revoked; callers revoke a URL when the
/// widget stops displaying it.
#[derive(Debug, Default)]
pub struct ObjectUrlStore {
    next_id: u64,
    blobs: HashMap<String, Blob>,
}

impl ObjectUrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, data: impl Into<Bytes>, content_type: Option<String>) -> String {
        self.next_id += 1;
        let url = format!("blob:widget/{}", self.next_id);
        let blob = Blob {
            data: data.into(),
            content_type,
        };
        widget_debug!("Created {} ({} bytes)", url, blob.len());
        self.blobs.insert(url.clone(), blob);
        url
    }

    pub fn get(&self, url: &str) -> Option<&Blob> {
        self.blobs.get(url)
    }

    /// Returns whether `url` was live.
    pub fn revoke(&mut self, url: &str) -> bool {
        let removed = self.blobs.remove(url).is_some();
        if removed {
            widget_debug!("Revoked {}", url);
        }
        removed
    }

    pub fn revoke_all(&mut self) -> usize {
        let count = self.blobs.len();
        self.blobs.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}
