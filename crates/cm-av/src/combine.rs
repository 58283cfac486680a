//! Mux an audio track onto a video as a social-media friendly MP4.
//!
//! The output is H.264 High@4.0 / yuv420p with AAC audio at 128k, moov atom
//! up front, trimmed to the shorter input.

use std::path::Path;
use std::time::Duration;

use cm_core::{Error, MediaKind, Result};

use crate::command::{ExecutionOutcome, ToolCommand};
use crate::format::validate_format;
use crate::preset::Preset;
use crate::tools::ToolRegistry;

/// Description of the container/codec combination every combine produces.
pub const OUTPUT_FORMAT: &str = "MP4 with H.264 video and AAC audio (Instagram/Facebook compatible)";

/// Arguments shared by every preset, placed after the preset filter.
const COMPAT_ARGS: &[&str] = &[
    "-c:v", "libx264",
    "-preset", "medium",
    "-profile:v", "high",
    "-level", "4.0",
    "-pix_fmt", "yuv420p",
    "-c:a", "aac",
    "-b:a", "128k",
    "-movflags", "+faststart",
    "-shortest",
];

const MISSING_PARAMS: &str = "Missing required parameters: audio_file, video_file, output_file";

/// One combine job: two inputs, one output, one preset id.
///
/// `preset` keeps the id exactly as the caller sent it so it can be echoed
/// back; [`CombineSpec::preset`] resolves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineSpec {
    pub audio_file: String,
    pub video_file: String,
    pub output_file: String,
    pub preset: String,
}

impl CombineSpec {
    pub fn new(
        audio_file: impl Into<String>,
        video_file: impl Into<String>,
        output_file: impl Into<String>,
        preset: impl Into<String>,
    ) -> Self {
        Self {
            audio_file: audio_file.into(),
            video_file: video_file.into(),
            output_file: output_file.into(),
            preset: preset.into(),
        }
    }

    /// The resolved preset (unknown ids resolve to standard).
    pub fn preset(&self) -> Preset {
        Preset::from_id(&self.preset)
    }

    /// Validate the request before anything is spawned.
    ///
    /// Order: required fields, audio exists, video exists, audio format,
    /// video format. The first failure wins.
    pub fn validate(&self) -> Result<()> {
        if self.audio_file.is_empty() || self.video_file.is_empty() || self.output_file.is_empty() {
            return Err(Error::Validation(MISSING_PARAMS.to_string()));
        }

        if !Path::new(&self.audio_file).exists() {
            return Err(Error::file_not_found(MediaKind::Audio, &self.audio_file));
        }
        if !Path::new(&self.video_file).exists() {
            return Err(Error::file_not_found(MediaKind::Video, &self.video_file));
        }

        validate_format(&self.audio_file, MediaKind::Audio)?;
        validate_format(&self.video_file, MediaKind::Video)?;

        Ok(())
    }

    /// ffmpeg arguments (without the program) in the order ffmpeg needs them:
    /// overwrite flag, audio input, video input, preset filter, codec block,
    /// output.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-i".to_string(),
            self.audio_file.clone(),
            "-i".to_string(),
            self.video_file.clone(),
        ];
        args.extend(self.preset().filter_args());
        args.extend(COMPAT_ARGS.iter().map(|s| s.to_string()));
        args.push(self.output_file.clone());
        args
    }

    /// Build the ffmpeg invocation for this job.
    pub fn command(&self, ffmpeg: &Path, timeout: Duration) -> ToolCommand {
        let mut cmd = ToolCommand::new(ffmpeg.to_path_buf());
        cmd.args(self.args()).timeout(timeout);
        cmd
    }
}

/// Validate, build and run a combine job.
///
/// # Errors
///
/// - Validation failures ([`Error::Validation`], [`Error::FileNotFound`],
///   [`Error::UnsupportedFormat`]); nothing is spawned in that case.
/// - [`Error::Tool`] if ffmpeg is missing or cannot be spawned.
/// - [`Error::Timeout`] if ffmpeg outlives `timeout` (it is killed).
/// - [`Error::ToolFailed`] with captured stderr on a non-zero exit.
pub async fn run_combine(tools: &ToolRegistry, spec: &CombineSpec, timeout: Duration) -> Result<()> {
    spec.validate()?;

    let ffmpeg = tools.require("ffmpeg")?;
    let cmd = spec.command(ffmpeg, timeout);

    tracing::info!("Executing command: {}", cmd.argv().join(" "));

    match cmd.run().await? {
        ExecutionOutcome::Completed { exit_code: 0, .. } => {
            tracing::info!("ffmpeg completed: {}", spec.output_file);
            Ok(())
        }
        ExecutionOutcome::Completed { exit_code, stderr } => {
            tracing::warn!("ffmpeg failed with exit code {exit_code}");
            Err(Error::ToolFailed {
                tool: cmd.program_name(),
                exit_code,
                stderr,
            })
        }
        ExecutionOutcome::TimedOut { after } => Err(Error::Timeout {
            tool: cmd.program_name(),
            after,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn spec(preset: &str) -> CombineSpec {
        CombineSpec::new("a.mp3", "v.mp4", "out.mp4", preset)
    }

    #[test]
    fn standard_args_exact() {
        assert_eq!(
            spec("standard").args(),
            vec![
                "-y", "-i", "a.mp3", "-i", "v.mp4",
                "-c:v", "libx264", "-preset", "medium", "-profile:v", "high",
                "-level", "4.0", "-pix_fmt", "yuv420p", "-c:a", "aac", "-b:a", "128k",
                "-movflags", "+faststart", "-shortest", "out.mp4",
            ]
        );
    }

    #[test]
    fn preset_filter_sits_before_codec_block() {
        let args = spec("instagram_feed").args();
        let vf = args.iter().position(|a| a == "-vf").unwrap();
        let codec = args.iter().position(|a| a == "-c:v").unwrap();
        assert_eq!(args[vf + 1], "scale=1080:1080,setsar=1:1");
        assert_eq!(vf, 5);
        assert!(vf < codec);
    }

    #[test]
    fn each_preset_contributes_its_filter() {
        for (id, filter) in [
            ("instagram_stories", "scale=1080:1920,setsar=1:1"),
            ("instagram_feed", "scale=1080:1080,setsar=1:1"),
            ("facebook_landscape", "scale=1280:720,setsar=1:1"),
            ("facebook_square", "scale=1080:1080,setsar=1:1"),
        ] {
            let args = spec(id).args();
            assert!(args.iter().any(|a| a == filter), "{id}");
        }
    }

    #[test]
    fn standard_and_unknown_have_no_filter() {
        for id in ["standard", "youtube_shorts", ""] {
            let args = spec(id).args();
            assert!(!args.iter().any(|a| a == "-vf"), "{id}");
            assert!(!args.iter().any(|a| a.starts_with("scale=")), "{id}");
        }
    }

    #[test]
    fn audio_before_video_output_last() {
        let args = spec("facebook_landscape").args();
        let audio = args.iter().position(|a| a == "a.mp3").unwrap();
        let video = args.iter().position(|a| a == "v.mp4").unwrap();
        assert_eq!(args[audio - 1], "-i");
        assert_eq!(args[video - 1], "-i");
        assert!(audio < video);
        assert_eq!(args.last().unwrap(), "out.mp4");
    }

    #[test]
    fn paths_with_shell_metacharacters_stay_single_arguments() {
        let spec = CombineSpec::new("my song; rm -rf ~.mp3", "$(clip).mp4", "out put.mp4", "standard");
        let args = spec.args();
        assert!(args.contains(&"my song; rm -rf ~.mp3".to_string()));
        assert!(args.contains(&"$(clip).mp4".to_string()));
        assert_eq!(args.last().unwrap(), "out put.mp4");
    }

    #[test]
    fn command_carries_program_and_timeout() {
        let cmd = spec("standard").command(Path::new("/usr/bin/ffmpeg"), Duration::from_secs(42));
        assert_eq!(cmd.program(), &PathBuf::from("/usr/bin/ffmpeg"));
        assert_eq!(cmd.get_timeout(), Duration::from_secs(42));
        assert_eq!(cmd.argv()[0], "/usr/bin/ffmpeg");
        assert_eq!(cmd.argv()[1], "-y");
    }

    #[test]
    fn validate_missing_fields() {
        let err = CombineSpec::new("", "v.mp4", "out.mp4", "standard")
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), MISSING_PARAMS);
    }

    #[test]
    fn validate_checks_existence_before_format() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("a.txt");
        std::fs::write(&audio, b"x").unwrap();
        let missing_video = dir.path().join("v.mp4");

        // Audio exists but has a bad extension; the missing video is reported first.
        let spec = CombineSpec::new(
            audio.to_string_lossy(),
            missing_video.to_string_lossy(),
            "out.mp4",
            "standard",
        );
        let err = spec.validate().unwrap_err();
        assert!(matches!(err, Error::FileNotFound { kind: MediaKind::Video, .. }));
    }

    #[test]
    fn validate_rejects_bad_formats() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("a.mp3");
        let video = dir.path().join("v.gif");
        std::fs::write(&audio, b"x").unwrap();
        std::fs::write(&video, b"x").unwrap();

        let spec = CombineSpec::new(audio.to_string_lossy(), video.to_string_lossy(), "o.mp4", "");
        let err = spec.validate().unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { kind: MediaKind::Video }));
    }

    #[tokio::test]
    async fn run_without_ffmpeg_is_tool_error() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("a.mp3");
        let video = dir.path().join("v.mp4");
        std::fs::write(&audio, b"x").unwrap();
        std::fs::write(&video, b"x").unwrap();

        let spec = CombineSpec::new(audio.to_string_lossy(), video.to_string_lossy(), "o.mp4", "");
        let err = run_combine(&ToolRegistry::default(), &spec, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Tool { .. }));
    }
}
