use std::fmt::{self, Write as _};
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::time_codec;

// @module: Canonical cue model and output serializers

// @struct: Single timed subtitle unit
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    // @field: Start offset in seconds
    pub start_seconds: f64,

    // @field: End offset in seconds
    pub end_seconds: f64,

    // @field: Decoded, trimmed text
    pub text: String,
}

impl Cue {
    /// Creates a new cue
    pub fn new(start_seconds: f64, end_seconds: f64, text: impl Into<String>) -> Self {
        Cue {
            start_seconds,
            end_seconds,
            text: text.into(),
        }
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        time_codec::format_timestamp(self.start_seconds)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        time_codec::format_timestamp(self.end_seconds)
    }
}

/// Output format of a download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    /// One line of text per cue
    Txt,
    /// Numbered, time-coded SubRip
    #[default]
    Srt,
}

impl SubtitleFormat {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Srt => "srt",
        }
    }

    /// Serialize `cues` in this format
    pub fn render(&self, cues: &[Cue]) -> String {
        match self {
            Self::Txt => to_plain_text(cues),
            Self::Srt => to_timed_format(cues),
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for SubtitleFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "txt" | "plain" => Ok(Self::Txt),
            "srt" | "timed" => Ok(Self::Srt),
            _ => Err(anyhow!("Invalid subtitle format: {}", s)),
        }
    }
}

/// Join the cue texts with newlines
pub fn to_plain_text(cues: &[Cue]) -> String {
    cues.iter()
        .map(|cue| cue.text.as_str())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render cues as SRT blocks, numbered from 1 over the emitted cues
pub fn to_timed_format(cues: &[Cue]) -> String {
    let mut out = String::new();
    for (idx, cue) in cues.iter().filter(|cue| !cue.text.is_empty()).enumerate() {
        // Writing to a String cannot fail
        let _ = write!(
            out,
            "{}\n{} --> {}\n{}\n\n",
            idx + 1,
            cue.format_start_time(),
            cue.format_end_time(),
            cue.text
        );
    }
    out
}
