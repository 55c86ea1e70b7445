use std::path::Path;

use super::{lrc, vtt};

/// One timed line of lyrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionLine {
    pub time_ms: u64,
    pub text: String,
}

impl CaptionLine {
    pub fn new(time_ms: u64, text: impl Into<String>) -> Self {
        Self {
            time_ms,
            text: text.into(),
        }
    }
}

/// Supported caption file formats.
///
/// Ordered so that `Vtt` ranks above `Lrc` when two candidates score the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CaptionFormat {
    Lrc,
    Vtt,
}

impl CaptionFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "lrc" => Some(Self::Lrc),
            "vtt" => Some(Self::Vtt),
            _ => None,
        }
    }

    /// Parse file contents into lines sorted by timestamp.
    pub fn parse(self, content: &str) -> Vec<CaptionLine> {
        match self {
            Self::Lrc => lrc::parse(content),
            Self::Vtt => vtt::parse(content),
        }
    }
}
