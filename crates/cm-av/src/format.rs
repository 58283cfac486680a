//! Input format validation.
//!
//! Validation is purely suffix-based on the lower-cased path. No container
//! sniffing is done: a renamed file passes here and fails later in ffmpeg.

use cm_core::{Error, MediaKind, Result};

/// Check that `path` carries one of the extensions accepted for `kind`.
///
/// Existence is the caller's concern and is checked before this so that a
/// missing file and a bad extension surface as different errors.
pub fn validate_format(path: &str, kind: MediaKind) -> Result<()> {
    let lower = path.to_lowercase();
    if kind.extensions().iter().any(|ext| lower.ends_with(ext)) {
        Ok(())
    } else {
        Err(Error::UnsupportedFormat { kind })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_audio_extension() {
        for path in ["a.mp3", "a.aac", "a.wav", "a.m4a", "a.ogg", "a.flac"] {
            assert!(validate_format(path, MediaKind::Audio).is_ok(), "{path}");
        }
    }

    #[test]
    fn accepts_every_video_extension() {
        for path in ["v.mp4", "v.mov", "v.avi", "v.mkv", "v.wmv", "v.flv", "v.webm"] {
            assert!(validate_format(path, MediaKind::Video).is_ok(), "{path}");
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(validate_format("/Media/Track.MP3", MediaKind::Audio).is_ok());
        assert!(validate_format("/Media/Clip.WebM", MediaKind::Video).is_ok());
    }

    #[test]
    fn kinds_do_not_cross() {
        assert!(validate_format("clip.mp4", MediaKind::Audio).is_err());
        assert!(validate_format("song.mp3", MediaKind::Video).is_err());
    }

    #[test]
    fn rejection_names_supported_set() {
        let err = validate_format("notes.txt", MediaKind::Audio).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported audio format. Supported formats: MP3, AAC, WAV, M4A, OGG, FLAC"
        );
        let err = validate_format("notes.txt", MediaKind::Video).unwrap_err();
        assert!(err.to_string().ends_with("MP4, MOV, AVI, MKV, WMV, FLV, WebM"));
    }

    #[test]
    fn extension_needs_a_dot() {
        assert!(validate_format("mp3", MediaKind::Audio).is_err());
        assert!(validate_format("trackmp3", MediaKind::Audio).is_err());
    }

    #[test]
    fn suffix_only_no_sniffing() {
        // A text file renamed to .mp4 is accepted.
        assert!(validate_format("/tmp/readme.txt.mp4", MediaKind::Video).is_ok());
    }
}
