use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::app_config::Config;
use crate::errors::{AppError, CatalogError};
use crate::fetcher::{DownloadedSubtitle, FetchOrchestrator, FetchSettings};
use crate::file_utils::Delivery;
use crate::metadata::{find_metadata_blob, DiscoveredMetadata, HostEnvironment};
use crate::subtitle_processor::SubtitleFormat;
use crate::track_catalog::{list_tracks, video_title, CaptionTrack};
use crate::transport::Transport;

// @module: Interaction flow between a host page and the download pipeline

/// Result of activating the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Tracks were discovered and the selection is open
    Opened(Vec<CaptionTrack>),
    /// A selection was already open and has been dismissed
    Cancelled,
}

/// One page's worth of track discovery and downloads
#[derive(Debug)]
pub struct DownloadSession<H: HostEnvironment> {
    // @field: Page the tracks come from
    host: H,

    // @field: Request pipeline
    orchestrator: FetchOrchestrator,

    // @field: Metadata found on the last activation
    metadata: Option<DiscoveredMetadata>,

    // @field: Tracks found on the last activation
    tracks: Vec<CaptionTrack>,

    // @field: Whether a track selection is currently offered
    open: bool,
}

impl<H: HostEnvironment> DownloadSession<H> {
    /// Create a session over `host` using an existing orchestrator
    pub fn new(host: H, orchestrator: FetchOrchestrator) -> Self {
        Self {
            host,
            orchestrator,
            metadata: None,
            tracks: Vec::new(),
            open: false,
        }
    }

    // @method: Create a session whose orchestrator follows the configuration
    pub fn with_config(host: H, transport: Arc<dyn Transport>, config: &Config) -> Self {
        let settings = FetchSettings::from(config);
        Self::new(host, FetchOrchestrator::with_settings(transport, settings))
    }

    /// Whether a track selection is open
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Tracks from the last successful activation
    pub fn tracks(&self) -> &[CaptionTrack] {
        &self.tracks
    }

    /// Metadata from the last successful activation
    pub fn metadata(&self) -> Option<&DiscoveredMetadata> {
        self.metadata.as_ref()
    }

    /// The orchestrator, for state inspection
    pub fn orchestrator(&self) -> &FetchOrchestrator {
        &self.orchestrator
    }

    /// Discover tracks and open the selection, or dismiss it if already open.
    pub fn activate(&mut self) -> Result<Activation, CatalogError> {
        if self.open {
            debug!("Selection already open, dismissing it");
            self.open = false;
            return Ok(Activation::Cancelled);
        }

        self.metadata = None;
        self.tracks.clear();

        let discovered = find_metadata_blob(&self.host)?;
        let tracks = list_tracks(&discovered.blob)?;

        self.metadata = Some(discovered);
        self.tracks = tracks;
        self.open = true;
        Ok(Activation::Opened(self.tracks.clone()))
    }

    /// Close the selection without downloading
    pub fn dismiss(&mut self) {
        self.open = false;
    }

    /// Move to another page; tracks of the previous page are discarded
    pub fn navigate(&mut self, host: H) {
        info!("Page changed, discarding {} track(s)", self.tracks.len());
        self.host = host;
        self.metadata = None;
        self.tracks.clear();
        self.open = false;
    }

    /// Video title, from the metadata first and the page second
    pub fn resolve_title(&self) -> Option<String> {
        let from_metadata = self
            .metadata
            .as_ref()
            .and_then(|m| video_title(&m.blob))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        from_metadata.or_else(|| {
            let title = self.host.page_title();
            if title.is_none() {
                warn!("Could not determine the video title, using the fallback name");
            }
            title
        })
    }

    /// Index of the track for `language`.
    ///
    /// An exact code match wins, then a case-insensitive one; without a
    /// language the first track is chosen.
    pub fn find_track(&self, language: Option<&str>) -> Option<usize> {
        match language {
            None => (!self.tracks.is_empty()).then_some(0),
            Some(code) => self
                .tracks
                .iter()
                .position(|t| t.language_code == code)
                .or_else(|| {
                    self.tracks
                        .iter()
                        .position(|t| t.language_code.eq_ignore_ascii_case(code))
                }),
        }
    }

    /// Download the track at `index` and close the selection
    pub async fn download(&mut self, index: usize, format: SubtitleFormat) -> Result<DownloadedSubtitle, AppError> {
        let track = self.tracks.get(index).cloned().ok_or_else(|| {
            AppError::Selection(format!(
                "no track at position {} ({} available)",
                index,
                self.tracks.len()
            ))
        })?;
        self.open = false;

        let title = self.resolve_title();
        let event = self.orchestrator.download(&track, format, title.as_deref()).await;
        self.orchestrator.acknowledge();
        Ok(event.into_result()?)
    }

    /// Download the track at `index` and hand the file to `delivery`
    pub async fn download_to(
        &mut self,
        index: usize,
        format: SubtitleFormat,
        delivery: &dyn Delivery,
    ) -> Result<PathBuf, AppError> {
        let subtitle = self.download(index, format).await?;
        Ok(delivery.deliver(&subtitle.filename, &subtitle.content)?)
    }
}
