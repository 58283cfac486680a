//! Media-domain enums shared across crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The role an input file plays in a combine request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    /// Lower-case name used in messages (e.g. "audio").
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }

    /// Capitalized label used at the start of a sentence (e.g. "Audio").
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Audio => "Audio",
            MediaKind::Video => "Video",
        }
    }

    /// Accepted file extensions, lower-case and dot-prefixed.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Audio => &[".mp3", ".aac", ".wav", ".m4a", ".ogg", ".flac"],
            MediaKind::Video => &[".mp4", ".mov", ".avi", ".mkv", ".wmv", ".flv", ".webm"],
        }
    }

    /// Display names of the accepted formats, in the same order as
    /// [`MediaKind::extensions`].
    pub fn format_names(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Audio => &["MP3", "AAC", "WAV", "M4A", "OGG", "FLAC"],
            MediaKind::Video => &["MP4", "MOV", "AVI", "MKV", "WMV", "FLV", "WebM"],
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
