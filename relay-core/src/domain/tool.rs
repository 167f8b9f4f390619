//! Media tools
//!
//! The conversion tools hosted by the remote media API. Each tool has its own
//! start endpoint; status polling is shared.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A media tool the remote API can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    /// Assemble a GIF from a sequence of images
    GifMaker,
    /// Convert a video clip to a GIF
    VideoToGif,
    Resize,
    Crop,
    Optimize,
    /// Overlay captions on an animation
    AddText,
}

impl Tool {
    /// Every tool, in the order the site lists them
    pub const ALL: [Tool; 6] = [
        Tool::GifMaker,
        Tool::VideoToGif,
        Tool::Resize,
        Tool::Crop,
        Tool::Optimize,
        Tool::AddText,
    ];

    /// Path segment of the tool's start endpoint
    pub fn path_segment(&self) -> &'static str {
        match self {
            Tool::GifMaker => "gif-maker",
            Tool::VideoToGif => "video-to-gif",
            Tool::Resize => "resize",
            Tool::Crop => "crop",
            Tool::Optimize => "optimize",
            Tool::AddText => "add-text",
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::ALL
            .into_iter()
            .find(|tool| tool.path_segment() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Tool::ALL.iter().map(|t| t.path_segment()).collect();
                format!("unknown tool '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}
