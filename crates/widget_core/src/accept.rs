/// MIME patterns accepted by the file picker, in the `accept` attribute style
/// (`image/*`, `video/mp4`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptFilter {
    patterns: Vec<String>,
}

impl Default for AcceptFilter {
    fn default() -> Self {
        Self::new(["video/*", "image/*"])
    }
}

impl AcceptFilter {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.into().trim().to_ascii_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// A filter that accepts any content type.
    pub fn any() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn accepts(&self, content_type: &str) -> bool {
        if self.patterns.is_empty() {
            return true;
        }
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or(content_type)
            .trim()
            .to_ascii_lowercase();
        let Some((top, _)) = essence.split_once('/') else {
            return false;
        };
        self.patterns.iter().any(|pattern| match pattern.strip_suffix("/*") {
            Some(prefix) => prefix == top,
            None => *pattern == essence,
        })
    }
}
