use std::fmt;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::errors::{CatalogError, TrackDiagnostic};
use crate::metadata::json_path::{str_at, value_at};

// @module: Normalisation of caption-track descriptors

/// `kind` value of automatically generated (speech recognition) tracks
pub const AUTO_GENERATED_KIND: &str = "asr";

const TRACK_LIST_PATH: [&str; 3] = ["captions", "playerCaptionsTracklistRenderer", "captionTracks"];

/// One selectable subtitle source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionTrack {
    /// Short locale identifier, e.g. "en"
    pub language_code: String,

    /// Human-readable language label
    pub display_name: String,

    /// Absolute URL of the raw timed-text payload
    pub source_url: String,

    /// Optional classifier, "asr" for generated tracks
    pub kind: Option<String>,
}

impl CaptionTrack {
    /// Whether the track was produced by speech recognition
    pub fn is_auto_generated(&self) -> bool {
        self.kind.as_deref() == Some(AUTO_GENERATED_KIND)
    }

    /// Display label for menus, marking generated tracks
    pub fn label(&self) -> String {
        if self.is_auto_generated() {
            format!("{} (auto-generated)", self.display_name)
        } else {
            self.display_name.clone()
        }
    }

    /// Build a track from one raw `captionTracks` entry.
    ///
    /// Returns `None` when the entry lacks a language code or an absolute URL.
    pub fn from_raw(raw: &Value) -> Option<Self> {
        let source_url = str_at(raw, &["baseUrl"])?;
        let language_code = str_at(raw, &["languageCode"])?;

        if Url::parse(source_url).is_err() {
            debug!("Track {} has a non-absolute URL: {}", language_code, source_url);
            return None;
        }

        let display_name = str_at(raw, &["name", "simpleText"])
            .map(str::to_string)
            .or_else(|| joined_runs(raw))
            .unwrap_or_else(|| language_code.to_string());

        Some(Self {
            language_code: language_code.to_string(),
            display_name,
            source_url: source_url.to_string(),
            kind: str_at(raw, &["kind"]).map(str::to_string),
        })
    }
}

impl fmt::Display for CaptionTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.language_code)
    }
}

/// Concatenated `name.runs[].text`, if non-empty
fn joined_runs(raw: &Value) -> Option<String> {
    let runs = value_at(raw, &["name", "runs"])?.as_array()?;
    let text: String = runs.iter().filter_map(|run| str_at(run, &["text"])).collect();
    (!text.is_empty()).then_some(text)
}

/// Outcome of a track extraction pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackExtraction {
    /// Valid tracks in source order
    pub tracks: Vec<CaptionTrack>,

    /// Why the list is empty, when it is
    pub diagnostic: Option<TrackDiagnostic>,

    /// Number of raw entries dropped as invalid
    pub dropped: usize,
}

impl TrackExtraction {
    fn empty(diagnostic: TrackDiagnostic) -> Self {
        Self {
            tracks: Vec::new(),
            diagnostic: Some(diagnostic),
            dropped: 0,
        }
    }
}

/// Walk `captions → playerCaptionsTracklistRenderer → captionTracks` and
/// normalise every entry.
pub fn extract_tracks(blob: &Value) -> TrackExtraction {
    let Some(captions) = value_at(blob, &TRACK_LIST_PATH[..1]) else {
        warn!("No 'captions' object in the player response");
        return TrackExtraction::empty(TrackDiagnostic::NoCaptionsMetadata);
    };

    let Some(renderer) = value_at(captions, &TRACK_LIST_PATH[1..2]) else {
        warn!("No '{}' in the captions object", TRACK_LIST_PATH[1]);
        return TrackExtraction::empty(TrackDiagnostic::TrackListMissing { level: TRACK_LIST_PATH[1] });
    };

    let Some(raw_tracks) = value_at(renderer, &TRACK_LIST_PATH[2..]).and_then(Value::as_array) else {
        warn!("No '{}' array in the track list renderer", TRACK_LIST_PATH[2]);
        return TrackExtraction::empty(TrackDiagnostic::TrackListMissing { level: TRACK_LIST_PATH[2] });
    };

    if raw_tracks.is_empty() {
        info!("This video has no caption tracks");
        return TrackExtraction::empty(TrackDiagnostic::EmptyTrackList);
    }

    debug!("Found {} raw caption track(s)", raw_tracks.len());

    let tracks: Vec<CaptionTrack> = raw_tracks
        .iter()
        .filter_map(|raw| {
            let track = CaptionTrack::from_raw(raw);
            if track.is_none() {
                warn!("Dropping caption track without a usable URL or language code");
            }
            track
        })
        .collect();

    let dropped = raw_tracks.len() - tracks.len();
    let diagnostic = tracks
        .is_empty()
        .then_some(TrackDiagnostic::AllTracksInvalid { dropped });

    if !tracks.is_empty() {
        info!(
            "Extracted {} caption track(s): {}",
            tracks.len(),
            tracks.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        );
    }

    TrackExtraction { tracks, diagnostic, dropped }
}

/// List the usable tracks of a metadata blob, or say why there are none.
pub fn list_tracks(blob: &Value) -> Result<Vec<CaptionTrack>, CatalogError> {
    let extraction = extract_tracks(blob);
    match extraction.diagnostic {
        Some(diagnostic) => Err(CatalogError::NoCaptionsAvailable(diagnostic)),
        None => Ok(extraction.tracks),
    }
}

/// `videoDetails.title` of a metadata blob
pub fn video_title(blob: &Value) -> Option<&str> {
    str_at(blob, &["videoDetails", "title"])
}
