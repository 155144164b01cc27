/*!
 * Error types for the ytsubdl library.
 *
 * Every stage of the pipeline has its own error enum so callers can tell
 * "no metadata on the page" apart from "the server said 404" without string
 * matching. All of them are defined with thiserror and fold into `AppError`.
 */

use thiserror::Error;

/// Why a metadata blob yielded no usable caption tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackDiagnostic {
    /// The blob has no `captions` object at all
    NoCaptionsMetadata,

    /// `captions` exists but a nested level is missing or has the wrong shape
    TrackListMissing {
        /// Name of the key that could not be followed
        level: &'static str,
    },

    /// The track array exists but is empty
    EmptyTrackList,

    /// The track array had entries but none carried a URL and language code
    AllTracksInvalid {
        /// Number of entries that were dropped
        dropped: usize,
    },
}

impl std::fmt::Display for TrackDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCaptionsMetadata => {
                write!(f, "no caption information in the video data (missing 'captions' object)")
            }
            Self::TrackListMissing { level } => {
                write!(f, "caption metadata present but '{}' was not found", level)
            }
            Self::EmptyTrackList => write!(f, "this video has no subtitle tracks"),
            Self::AllTracksInvalid { dropped } => write!(
                f,
                "found {} subtitle track(s) but none had a usable download link",
                dropped
            ),
        }
    }
}

/// Errors raised while discovering metadata and listing tracks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No discovery strategy produced a metadata blob
    #[error("could not find the video data (player response) on the page; reload the page and try again")]
    MetadataNotFound,

    /// Metadata was found but it contains no usable tracks
    #[error("no subtitles available: {0}")]
    NoCaptionsAvailable(TrackDiagnostic),
}

/// Errors raised by the timed-text parser
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The payload is not well-formed XML
    #[error("malformed subtitle XML: {0}")]
    Malformed(String),

    /// The XML is well-formed but neither known dialect matched
    #[error("no <text> or <p> subtitle entries could be recognised")]
    NoRecognizedCues,
}

/// Errors reported by a network transport
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request exceeded its time budget
    #[error("request timed out")]
    Timeout,

    /// Connection, DNS, TLS or body-read failure
    #[error("transport failure: {0}")]
    Network(String),
}

/// Terminal failure of a single download request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The transport could not complete the request
    #[error("network error: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout
    #[error("request timed out; the network may be slow or the server unresponsive")]
    Timeout,

    /// The server answered with a non-2xx status
    #[error("server error: HTTP {code}")]
    HttpStatus {
        /// HTTP status code
        code: u16,
    },

    /// 2xx response whose body was empty or whitespace only
    #[error("the subtitle file returned by the server is empty")]
    EmptyBody,

    /// The body could not be parsed as timed-text XML
    #[error("could not parse subtitle data: {0}")]
    Unparseable(#[from] ParseError),

    /// The body parsed but contained no text
    #[error("the subtitle track does not contain any text")]
    EmptyContent,
}

impl From<TransportError> for FetchFailure {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Timeout => Self::Timeout,
            TransportError::Network(message) => Self::Network(message),
        }
    }
}

impl FetchFailure {
    /// Short machine-friendly tag for logs and tests
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Timeout => "timeout",
            Self::HttpStatus { .. } => "http_status",
            Self::EmptyBody => "empty_body",
            Self::Unparseable(_) => "unparseable",
            Self::EmptyContent => "empty_content",
        }
    }

    /// Explanatory text for the status codes users actually run into
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::HttpStatus { code } => http_hint(*code),
            _ => None,
        }
    }
}

fn http_hint(code: u16) -> Option<&'static str> {
    match code {
        404 => Some("subtitle resource not found; the link may have expired or the URL scheme changed, refresh the page and retry"),
        403 => Some("access to the subtitle resource was denied; make sure you are signed in and no extension interferes with the request"),
        _ => None,
    }
}

/// Errors raised when handing the finished file to its destination
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// The destination already holds a file with that name
    #[error("output file already exists: {0}")]
    AlreadyExists(String),

    /// The file name would leave the destination directory
    #[error("refusing to save outside the output directory: {0}")]
    InvalidFilename(String),

    /// Writing the file failed
    #[error("failed to save subtitle file: {0}")]
    Write(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from track discovery
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Error from a download
    #[error("Download failed: {0}")]
    Fetch(#[from] FetchFailure),

    /// Error from saving the result
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// No track matches what was asked for
    #[error("Selection error: {0}")]
    Selection(String),

    /// Error from configuration handling
    #[error("Config error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for DeliveryError {
    fn from(error: std::io::Error) -> Self {
        Self::Write(error.to_string())
    }
}
