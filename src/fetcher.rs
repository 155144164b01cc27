/*!
 * Download orchestration for a single caption track.
 *
 * One download moves through `Idle -> Requesting -> Succeeded | Failed`,
 * and back to `Idle` once the outcome has been acknowledged. Exactly one
 * terminal event is produced per request: transport errors, the time
 * budget, non-2xx statuses and parser failures all end up as a
 * `FetchFailure`.
 */

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::sync::oneshot;

use crate::app_config::Config;
use crate::errors::FetchFailure;
use crate::file_utils::{DEFAULT_FILENAME, FileManager};
use crate::subtitle_processor::SubtitleFormat;
use crate::timedtext::TimedTextParser;
use crate::track_catalog::CaptionTrack;
use crate::transport::{FetchRequest, FetchResponse, Transport};

/// Time budget of one subtitle request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Accept header sent with subtitle requests
pub const DEFAULT_ACCEPT: &str = "text/xml,application/xml,*/*";

/// Default maximum length of a sanitized title, in characters
pub const DEFAULT_MAX_FILENAME_CHARS: usize = 200;

/// Knobs of the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Budget for the whole exchange
    pub timeout: Duration,
    /// Accept header value
    pub accept: String,
    /// Maximum characters kept from the title
    pub max_filename_chars: usize,
    /// Title used when none is known
    pub fallback_title: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            accept: DEFAULT_ACCEPT.to_string(),
            max_filename_chars: DEFAULT_MAX_FILENAME_CHARS,
            fallback_title: DEFAULT_FILENAME.to_string(),
        }
    }
}

impl From<&Config> for FetchSettings {
    fn from(config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.fetch.timeout_secs),
            accept: config.fetch.accept.clone(),
            max_filename_chars: config.output.max_filename_chars,
            fallback_title: config.output.fallback_title.clone(),
        }
    }
}

/// A rendered subtitle file, ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedSubtitle {
    /// `<title>.<lang>.<ext>`
    pub filename: String,
    /// Serialized body
    pub content: String,
    /// Format the body was rendered in
    pub format: SubtitleFormat,
    /// Number of cues with text
    pub cue_count: usize,
}

/// Terminal notification of a download
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadEvent {
    /// The subtitle was fetched and rendered
    Completed(DownloadedSubtitle),
    /// The request ended without a usable subtitle
    Failed(FetchFailure),
}

impl DownloadEvent {
    /// Convert into a `Result`
    pub fn into_result(self) -> Result<DownloadedSubtitle, FetchFailure> {
        match self {
            Self::Completed(subtitle) => Ok(subtitle),
            Self::Failed(failure) => Err(failure),
        }
    }
}

/// Lifecycle of the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DownloadState {
    /// Nothing in flight
    #[default]
    Idle,
    /// A request is outstanding
    Requesting {
        language_code: String,
        format: SubtitleFormat,
    },
    /// The last request produced a subtitle
    Succeeded(DownloadedSubtitle),
    /// The last request failed
    Failed(FetchFailure),
}

impl DownloadState {
    /// Whether the state is `Succeeded` or `Failed`
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }
}

/// Fetches, parses and renders one caption track at a time
#[derive(Debug, Clone)]
pub struct FetchOrchestrator {
    transport: Arc<dyn Transport>,
    parser: TimedTextParser,
    settings: FetchSettings,
    state: DownloadState,
}

impl FetchOrchestrator {
    /// Create an orchestrator with default settings
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_settings(transport, FetchSettings::default())
    }

    /// Create an orchestrator with explicit settings
    pub fn with_settings(transport: Arc<dyn Transport>, settings: FetchSettings) -> Self {
        Self {
            transport,
            parser: TimedTextParser::new(),
            settings,
            state: DownloadState::Idle,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> &DownloadState {
        &self.state
    }

    /// Active settings
    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Return to `Idle` after a terminal state has been observed
    pub fn acknowledge(&mut self) {
        if self.state.is_terminal() {
            self.state = DownloadState::Idle;
        }
    }

    /// Download `track` and render it as `format`.
    ///
    /// `&mut self` keeps one request in flight per orchestrator. The returned
    /// event is also recorded as the terminal state.
    pub async fn download(
        &mut self,
        track: &CaptionTrack,
        format: SubtitleFormat,
        title: Option<&str>,
    ) -> DownloadEvent {
        self.acknowledge();
        self.state = DownloadState::Requesting {
            language_code: track.language_code.clone(),
            format,
        };
        info!("Downloading {} subtitles as {}", track.label(), format);

        let event = match self.fetch_track(track).await {
            Ok(response) => match self.process_response(response, track, format, title) {
                Ok(subtitle) => DownloadEvent::Completed(subtitle),
                Err(failure) => DownloadEvent::Failed(failure),
            },
            Err(failure) => DownloadEvent::Failed(failure),
        };

        self.state = match &event {
            DownloadEvent::Completed(subtitle) => {
                info!("Subtitle ready: {} ({} cues)", subtitle.filename, subtitle.cue_count);
                DownloadState::Succeeded(subtitle.clone())
            }
            DownloadEvent::Failed(failure) => {
                error!("Subtitle download failed: {}", failure);
                if let Some(hint) = failure.hint() {
                    error!("{}", hint);
                }
                DownloadState::Failed(failure.clone())
            }
        };
        event
    }

    /// Run a download on a background task and deliver the event through a channel.
    ///
    /// The task works on a clone of this orchestrator, so this instance's
    /// state is left untouched.
    pub fn spawn_download(
        &self,
        track: CaptionTrack,
        format: SubtitleFormat,
        title: Option<String>,
    ) -> oneshot::Receiver<DownloadEvent> {
        let (sender, receiver) = oneshot::channel();
        let mut worker = Self::with_settings(Arc::clone(&self.transport), self.settings.clone());

        tokio::spawn(async move {
            let event = worker.download(&track, format, title.as_deref()).await;
            if sender.send(event).is_err() {
                debug!("Download finished after its receiver was dropped");
            }
        });

        receiver
    }

    async fn fetch_track(&self, track: &CaptionTrack) -> Result<FetchResponse, FetchFailure> {
        let request = FetchRequest::get(track.source_url.as_str(), self.settings.timeout)
            .header("Accept", self.settings.accept.as_str());

        match tokio::time::timeout(self.settings.timeout, self.transport.fetch(&request)).await {
            Ok(result) => result.map_err(FetchFailure::from),
            Err(_) => {
                warn!("No response within {:?}", self.settings.timeout);
                Err(FetchFailure::Timeout)
            }
        }
    }

    /// Turn a completed exchange into a rendered subtitle
    pub fn process_response(
        &self,
        response: FetchResponse,
        track: &CaptionTrack,
        format: SubtitleFormat,
        title: Option<&str>,
    ) -> Result<DownloadedSubtitle, FetchFailure> {
        if !response.is_success() {
            return Err(FetchFailure::HttpStatus { code: response.status });
        }
        if response.body.trim().is_empty() {
            return Err(FetchFailure::EmptyBody);
        }
        debug!("Received {} byte(s) of timed text", response.body.len());

        let cues = self.parser.parse(&response.body)?;
        let content = format.render(&cues);
        if content.trim().is_empty() {
            return Err(FetchFailure::EmptyContent);
        }

        let title = title.unwrap_or(self.settings.fallback_title.as_str());
        let filename = FileManager::derive_filename(
            title,
            &track.language_code,
            format.extension(),
            self.settings.max_filename_chars,
        );

        Ok(DownloadedSubtitle {
            filename,
            content,
            format,
            cue_count: cues.len(),
        })
    }
}
