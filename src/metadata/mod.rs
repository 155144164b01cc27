/*!
 * Discovery of the player-response metadata embedded in a watch page.
 *
 * The page exposes the same object under several names depending on how far
 * the player has initialised. `find_metadata_blob` tries every known location
 * in a fixed order and returns the first hit:
 * - `ytplayer.config.args.raw_player_response`
 * - `ytplayer.bootstrapPlayerResponse`
 * - `ytInitialPlayerResponse`
 * - the `ytcfg` configuration object
 * - an assignment to `ytInitialPlayerResponse` inside a script
 * - an embedded `"playerResponse":{...}` fragment inside a script
 */

use std::fmt;

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::errors::CatalogError;

pub mod json_path;
pub mod page;
pub mod scanner;

pub use page::PageSnapshot;

use json_path::{is_truthy, preview, value_at};

/// Matches `var ytInitialPlayerResponse = {`, `window.ytInitialPlayerResponse = {`
/// and `window["ytInitialPlayerResponse"] = {`; the match ends on the brace.
static ASSIGNMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:\bvar\s+|\bwindow\s*\.\s*|\bwindow\s*\[\s*["'])ytInitialPlayerResponse(?:["']\s*\])?\s*=\s*\{"#)
        .unwrap()
});

const EMBEDDED_MARKER: &str = r#""playerResponse":"#;
const EMBEDDED_OPENER: &str = r#""playerResponse":{"#;
const TRACKS_MARKER: &str = r#""captionTracks":"#;

/// Read access to the host page's state.
///
/// Implementations must never fail: anything unavailable is simply `None` or
/// an empty list.
pub trait HostEnvironment {
    /// A top-level global variable of the page
    fn global(&self, name: &str) -> Option<&Value>;

    /// The page configuration getter (`ytcfg.get(key)`)
    fn config_get(&self, key: &str) -> Option<Value>;

    /// Text of every inline script, in document order
    fn script_texts(&self) -> Vec<&str>;

    /// Human-readable page title, if the page has one
    fn page_title(&self) -> Option<String>;
}

/// One of the ordered lookup strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryStrategy {
    /// Fully initialised player state
    PlayerConfig,
    /// Bootstrap player state
    BootstrapPlayer,
    /// Page initial-state global
    InitialPlayerResponse,
    /// Configuration object lookup
    ConfigObject,
    /// Script assignment to the initial-state global
    ScriptAssignment,
    /// JSON fragment embedded in a script
    EmbeddedFragment,
}

impl DiscoveryStrategy {
    /// All strategies in priority order
    pub const ALL: [DiscoveryStrategy; 6] = [
        Self::PlayerConfig,
        Self::BootstrapPlayer,
        Self::InitialPlayerResponse,
        Self::ConfigObject,
        Self::ScriptAssignment,
        Self::EmbeddedFragment,
    ];

    /// Run this strategy against the host
    pub fn run(self, env: &dyn HostEnvironment) -> Option<Value> {
        match self {
            Self::PlayerConfig => env
                .global("ytplayer")
                .and_then(|p| value_at(p, &["config", "args", "raw_player_response"]))
                .and_then(accept_candidate),
            Self::BootstrapPlayer => env
                .global("ytplayer")
                .and_then(|p| value_at(p, &["bootstrapPlayerResponse"]))
                .and_then(accept_candidate),
            Self::InitialPlayerResponse => env
                .global("ytInitialPlayerResponse")
                .and_then(accept_candidate),
            Self::ConfigObject => from_config_object(env),
            Self::ScriptAssignment => env.script_texts().into_iter().find_map(from_assignment),
            Self::EmbeddedFragment => env.script_texts().into_iter().find_map(from_embedded_fragment),
        }
    }
}

impl fmt::Display for DiscoveryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PlayerConfig => "ytplayer.config.args.raw_player_response",
            Self::BootstrapPlayer => "ytplayer.bootstrapPlayerResponse",
            Self::InitialPlayerResponse => "ytInitialPlayerResponse",
            Self::ConfigObject => "ytcfg",
            Self::ScriptAssignment => "script assignment",
            Self::EmbeddedFragment => "embedded playerResponse",
        };
        write!(f, "{}", name)
    }
}

/// A metadata blob together with where it was found
#[derive(Debug, Clone)]
pub struct DiscoveredMetadata {
    /// The player-response object
    pub blob: Value,
    /// The strategy that produced it
    pub strategy: DiscoveryStrategy,
}

/// Try every strategy in priority order and return the first blob found.
pub fn find_metadata_blob(env: &dyn HostEnvironment) -> Result<DiscoveredMetadata, CatalogError> {
    let found = DiscoveryStrategy::ALL.iter().find_map(|&strategy| {
        debug!("Looking for player response via {}", strategy);
        strategy.run(env).map(|blob| DiscoveredMetadata { blob, strategy })
    });

    match found {
        Some(discovered) => {
            info!("Found player response via {}", discovered.strategy);
            Ok(discovered)
        }
        None => {
            warn!("No known location yielded a player response");
            Err(CatalogError::MetadataNotFound)
        }
    }
}

/// Accept a truthy object, or a string holding one
fn accept_candidate(value: &Value) -> Option<Value> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::Object(_) => Some(value.clone()),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(parsed @ Value::Object(_)) => Some(parsed),
            _ => {
                debug!("Player response string did not hold a JSON object: {}", preview(raw, 80));
                None
            }
        },
        _ => None,
    }
}

fn from_config_object(env: &dyn HostEnvironment) -> Option<Value> {
    let data = env.global("ytcfg").and_then(|cfg| value_at(cfg, &["data_"]));
    ["PLAYER_RESPONSE", "playerResponse"]
        .iter()
        .find_map(|&key| data.and_then(|d| value_at(d, &[key])).and_then(accept_candidate))
        .or_else(|| {
            ["PLAYER_RESPONSE", "playerResponse"]
                .iter()
                .find_map(|&key| env.config_get(key).as_ref().and_then(accept_candidate))
        })
}

fn from_assignment(script: &str) -> Option<Value> {
    if !script.contains("ytInitialPlayerResponse") {
        return None;
    }

    ASSIGNMENT_REGEX.find_iter(script).find_map(|m| {
        let literal = scanner::balanced_object_at(script, m.end() - 1)?;
        match serde_json::from_str::<Value>(literal) {
            Ok(value @ Value::Object(_)) => Some(value),
            Ok(_) => None,
            Err(e) => {
                warn!("Assigned ytInitialPlayerResponse is not valid JSON ({}): {}", e, preview(literal, 200));
                None
            }
        }
    })
}

fn from_embedded_fragment(script: &str) -> Option<Value> {
    if !script.contains(EMBEDDED_OPENER) || !script.contains(TRACKS_MARKER) {
        return None;
    }

    scanner::objects_after(script, EMBEDDED_MARKER).find_map(|fragment| {
        match serde_json::from_str::<Value>(fragment) {
            Ok(value) if value_at(&value, &["videoDetails"]).is_some_and(is_truthy) => Some(value),
            Ok(_) => {
                warn!("Embedded JSON parsed but does not look like a player response: {}", preview(fragment, 200));
                None
            }
            Err(e) => {
                warn!("Embedded playerResponse is not valid JSON ({}): {}", e, preview(fragment, 200));
                None
            }
        }
    })
}
