/*!
 * Tests for caption track normalisation
 */

use serde_json::json;
use ytsubdl::errors::{CatalogError, TrackDiagnostic};
use ytsubdl::track_catalog::{extract_tracks, list_tracks, video_title, CaptionTrack};

use crate::common;

#[test]
fn test_list_tracks_withTwoTracks_shouldKeepSourceOrder() {
    let blob = common::player_response("https://www.youtube.com");

    let tracks = list_tracks(&blob).unwrap();

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].language_code, "en");
    assert_eq!(tracks[0].display_name, "English");
    assert!(!tracks[0].is_auto_generated());
    assert_eq!(tracks[1].language_code, "de");
    assert_eq!(tracks[1].display_name, "German");
    assert!(tracks[1].is_auto_generated());
    assert_eq!(tracks[1].label(), "German (auto-generated)");
}

#[test]
fn test_list_tracks_withCaptionTracksAbsent_shouldDifferFromCaptionsAbsent() {
    let without_captions = json!({ "videoDetails": { "title": "x" } });
    let without_track_list = json!({ "captions": { "playerCaptionsTracklistRenderer": {} } });

    let no_captions = extract_tracks(&without_captions);
    let no_list = extract_tracks(&without_track_list);

    assert!(no_captions.tracks.is_empty());
    assert!(no_list.tracks.is_empty());
    assert_eq!(no_captions.diagnostic, Some(TrackDiagnostic::NoCaptionsMetadata));
    assert_eq!(
        no_list.diagnostic,
        Some(TrackDiagnostic::TrackListMissing { level: "captionTracks" })
    );
    assert_ne!(no_captions.diagnostic, no_list.diagnostic);
}

#[test]
fn test_list_tracks_withMissingRenderer_shouldNameTheMissingLevel() {
    let blob = json!({ "captions": {} });

    let result = list_tracks(&blob);

    assert_eq!(
        result,
        Err(CatalogError::NoCaptionsAvailable(TrackDiagnostic::TrackListMissing {
            level: "playerCaptionsTracklistRenderer"
        }))
    );
}

#[test]
fn test_list_tracks_withEmptyArray_shouldReportEmptyTrackList() {
    let blob = json!({ "captions": { "playerCaptionsTracklistRenderer": { "captionTracks": [] } } });

    assert_eq!(
        list_tracks(&blob),
        Err(CatalogError::NoCaptionsAvailable(TrackDiagnostic::EmptyTrackList))
    );
}

#[test]
fn test_list_tracks_withEntryLackingUrl_shouldDropOnlyThatEntry() {
    let blob = json!({ "captions": { "playerCaptionsTracklistRenderer": { "captionTracks": [
        { "languageCode": "fr", "name": { "simpleText": "French" } },
        common::raw_track("en", "English", "https://example.com/en"),
        { "baseUrl": "", "languageCode": "es" },
        { "baseUrl": "/relative/path", "languageCode": "it" },
        { "baseUrl": "https://example.com/x", "languageCode": "" },
    ] } } });

    let extraction = extract_tracks(&blob);

    assert_eq!(extraction.tracks.len(), 1);
    assert_eq!(extraction.tracks[0].language_code, "en");
    assert_eq!(extraction.dropped, 4);
    assert_eq!(extraction.diagnostic, None);
}

#[test]
fn test_list_tracks_withOnlyInvalidEntries_shouldCountDropped() {
    let blob = json!({ "captions": { "playerCaptionsTracklistRenderer": { "captionTracks": [
        { "languageCode": "fr" },
        { "baseUrl": 42, "languageCode": "de" },
    ] } } });

    assert_eq!(
        list_tracks(&blob),
        Err(CatalogError::NoCaptionsAvailable(TrackDiagnostic::AllTracksInvalid { dropped: 2 }))
    );
}

#[test]
fn test_from_raw_withoutName_shouldFallBackToLanguageCode() {
    let raw = json!({ "baseUrl": "https://example.com/t", "languageCode": "pt-BR" });

    let track = CaptionTrack::from_raw(&raw).unwrap();

    assert_eq!(track.display_name, "pt-BR");
    assert_eq!(track.kind, None);
}

#[test]
fn test_from_raw_withRuns_shouldConcatenateThem() {
    let raw = json!({
        "baseUrl": "https://example.com/t",
        "languageCode": "en",
        "name": { "runs": [{ "text": "English" }, { "text": " (United Kingdom)" }] }
    });

    let track = CaptionTrack::from_raw(&raw).unwrap();

    assert_eq!(track.display_name, "English (United Kingdom)");
}

#[test]
fn test_from_raw_shouldKeepUrlVerbatim() {
    let url = "https://www.youtube.com/api/timedtext?v=abc&lang=en&sparams=ip%2Cipbits&signature=1A.2B";
    let raw = common::raw_track("en", "English", url);

    let track = CaptionTrack::from_raw(&raw).unwrap();

    assert_eq!(track.source_url, url);
}

#[test]
fn test_video_title_shouldReadVideoDetails() {
    let blob = common::player_response("https://example.com");

    assert_eq!(video_title(&blob), Some("Rust: Ownership/Borrowing"));
    assert_eq!(video_title(&json!({})), None);
}
