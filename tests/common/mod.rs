/*!
 * Common test utilities for the ytsubdl test suite
 */

use std::path::{Path, PathBuf};
use std::fs;

use anyhow::Result;
use serde_json::{json, Value};
use tempfile::TempDir;
use ytsubdl::CaptionTrack;

/// Flat-cue payload with an escaped entity and one blank cue
pub const FLAT_CUE_XML: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0" dur="1.5">Hi</text><text start="1.5" dur="1">   </text><text start="2.5" dur="2">It&amp;#39;s &amp;quot;fine&amp;quot;</text></transcript>"#;

/// Paragraph payload, times in milliseconds
pub const PARAGRAPH_XML: &str = r#"<?xml version="1.0" encoding="utf-8" ?><timedtext format="3"><body><p t="1000" d="2500">Hello</p><p t="4000" d="1000"><s>World</s></p></body></timedtext>"#;

/// Route library logs to the test harness; safe to call repeatedly
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Raw `captionTracks` entry
pub fn raw_track(language_code: &str, name: &str, url: &str) -> Value {
    json!({
        "baseUrl": url,
        "languageCode": language_code,
        "name": { "simpleText": name },
    })
}

/// Player response with an English track and a generated German one
pub fn player_response(base_url: &str) -> Value {
    json!({
        "videoDetails": { "videoId": "abc123", "title": "Rust: Ownership/Borrowing" },
        "captions": {
            "playerCaptionsTracklistRenderer": {
                "captionTracks": [
                    raw_track("en", "English", &format!("{}/api/timedtext?lang=en", base_url)),
                    {
                        "baseUrl": format!("{}/api/timedtext?lang=de&kind=asr", base_url),
                        "languageCode": "de",
                        "kind": "asr",
                        "name": { "runs": [{ "text": "German" }] },
                    }
                ]
            }
        }
    })
}

/// A ready-made track pointing at `url`
pub fn sample_track(url: &str) -> CaptionTrack {
    CaptionTrack {
        language_code: "en".to_string(),
        display_name: "English".to_string(),
        source_url: url.to_string(),
        kind: None,
    }
}

/// Minimal watch page that assigns the player response in a script
pub fn watch_page_html(player_response: &Value) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>Fallback Title - YouTube</title></head><body><script nonce="x">var ytInitialPlayerResponse = {};var meta = {{}};</script></body></html>"#,
        player_response
    )
}
