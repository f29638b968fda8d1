/// Upload progress as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Progress {
    /// The transport cannot tell how many bytes there are in total.
    #[default]
    Unknown,
    Percent(u8),
}

impl Progress {
    pub fn from_bytes(loaded: u64, total: Option<u64>) -> Self {
        match percent(loaded, total) {
            Some(value) => Progress::Percent(value),
            None => Progress::Unknown,
        }
    }

    pub fn as_percent(self) -> Option<u8> {
        match self {
            Progress::Percent(value) => Some(value),
            Progress::Unknown => None,
        }
    }
}

/// `loaded / total * 100`, rounded half up and clamped to 100.
///
/// Returns `None` when the total is unknown or zero.
pub fn percent(loaded: u64, total: Option<u64>) -> Option<u8> {
    let total = total.filter(|&t| t > 0)?;
    let loaded = u128::from(loaded.min(total));
    let total = u128::from(total);
    let rounded = (loaded * 100 + total / 2) / total;
    Some(rounded.min(100) as u8)
}
