//! Output framing presets.
//!
//! Each preset optionally contributes a scale + pixel-aspect filter. Unknown
//! preset ids resolve to [`Preset::Standard`] instead of erroring.

use std::fmt;

use serde::Serialize;

/// A named bundle of output framing parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Keep the source resolution.
    #[default]
    Standard,
    /// 9:16, 1080x1920.
    InstagramStories,
    /// 1:1, 1080x1080.
    InstagramFeed,
    /// 16:9, 1280x720.
    FacebookLandscape,
    /// 1:1, 1080x1080.
    FacebookSquare,
}

impl Preset {
    /// Every preset, in catalog order.
    pub const ALL: [Preset; 5] = [
        Preset::Standard,
        Preset::InstagramStories,
        Preset::InstagramFeed,
        Preset::FacebookLandscape,
        Preset::FacebookSquare,
    ];

    /// Resolve a preset id. Unrecognized ids fall back to `Standard`.
    pub fn from_id(id: &str) -> Self {
        match id {
            "instagram_stories" => Preset::InstagramStories,
            "instagram_feed" => Preset::InstagramFeed,
            "facebook_landscape" => Preset::FacebookLandscape,
            "facebook_square" => Preset::FacebookSquare,
            "standard" => Preset::Standard,
            other => {
                tracing::debug!("Unknown preset {other:?}; using standard");
                Preset::Standard
            }
        }
    }

    /// The wire id of this preset.
    pub fn id(&self) -> &'static str {
        match self {
            Preset::Standard => "standard",
            Preset::InstagramStories => "instagram_stories",
            Preset::InstagramFeed => "instagram_feed",
            Preset::FacebookLandscape => "facebook_landscape",
            Preset::FacebookSquare => "facebook_square",
        }
    }

    /// Human-readable description for the preset catalog.
    pub fn description(&self) -> &'static str {
        match self {
            Preset::Standard => "Keep original resolution with Instagram/Facebook compatibility",
            Preset::InstagramStories => "Instagram Stories format (9:16, 1080x1920)",
            Preset::InstagramFeed => "Instagram Feed format (1:1, 1080x1080)",
            Preset::FacebookLandscape => "Facebook Landscape format (16:9, 1280x720)",
            Preset::FacebookSquare => "Facebook Square format (1:1, 1080x1080)",
        }
    }

    /// The ffmpeg video filter expression, if this preset rescales.
    pub fn scale_filter(&self) -> Option<&'static str> {
        match self {
            Preset::Standard => None,
            Preset::InstagramStories => Some("scale=1080:1920,setsar=1:1"),
            Preset::InstagramFeed => Some("scale=1080:1080,setsar=1:1"),
            Preset::FacebookLandscape => Some("scale=1280:720,setsar=1:1"),
            Preset::FacebookSquare => Some("scale=1080:1080,setsar=1:1"),
        }
    }

    /// ffmpeg arguments contributed by this preset (empty for `Standard`).
    pub fn filter_args(&self) -> Vec<String> {
        match self.scale_filter() {
            Some(filter) => vec!["-vf".to_string(), filter.to_string()],
            None => Vec::new(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
