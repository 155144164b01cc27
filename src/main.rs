// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use ytsubdl::app_config::{self, Config};
use ytsubdl::file_utils::DirectoryDelivery;
use ytsubdl::transport::{FetchRequest, HttpTransport, Transport};
use ytsubdl::{Activation, DownloadSession, PageSnapshot, SubtitleFormat};

/// Accept header used when fetching a watch page
const PAGE_ACCEPT: &str = "text/html,application/xhtml+xml,*/*";

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for SubtitleFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    /// Plain text, one line per cue
    Txt,
    /// Numbered SubRip with timestamps
    Srt,
}

impl From<CliFormat> for SubtitleFormat {
    fn from(cli_format: CliFormat) -> Self {
        match cli_format {
            CliFormat::Txt => SubtitleFormat::Txt,
            CliFormat::Srt => SubtitleFormat::Srt,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the subtitle tracks of a video
    Tracks {
        /// Watch-page URL, saved .html page or .json dump of page globals
        #[arg(value_name = "SOURCE")]
        source: String,
    },

    /// Download one subtitle track
    Download(DownloadArgs),

    /// Generate shell completions for ytsubdl
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct DownloadArgs {
    /// Watch-page URL, saved .html page or .json dump of page globals
    #[arg(value_name = "SOURCE")]
    source: String,

    /// Language code of the track (first track when omitted)
    #[arg(short = 'l', long)]
    language: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<CliFormat>,

    /// Directory to save the file into
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Replace an existing file with the same name
    #[arg(long)]
    force: bool,
}

/// ytsubdl - YouTube subtitle downloader
///
/// Finds the caption tracks of a YouTube video and saves one of them as
/// plain text or SRT.
#[derive(Parser, Debug)]
#[command(name = "ytsubdl")]
#[command(version)]
#[command(about = "Download YouTube subtitles as TXT or SRT")]
#[command(long_about = "ytsubdl reads the caption tracks of a YouTube watch page and converts one of them to plain text or SRT.

EXAMPLES:
    ytsubdl tracks 'https://www.youtube.com/watch?v=VIDEO'        # List tracks
    ytsubdl download 'https://www.youtube.com/watch?v=VIDEO'      # First track as SRT
    ytsubdl download -l de -f txt saved_page.html                 # German track as text
    ytsubdl download -o ~/subs --force page_globals.json          # Custom folder, overwrite
    ytsubdl completions bash > ytsubdl.bash                       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour prefix for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; log::set_max_level does the filtering
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "ytsubdl", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli.config_path, cli.log_level)?;
    log::set_max_level(config.log_level.into());

    match cli.command {
        Commands::Tracks { source } => run_tracks(&source, &config).await,
        Commands::Download(args) => run_download(args, &config).await,
        Commands::Completions { .. } => Ok(()),
    }
}

/// Load or create the configuration, apply CLI overrides and validate it
fn load_config(config_path: &str, log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = Config::load_or_create(config_path)?;

    if let Some(level) = log_level {
        config.log_level = level.into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn build_transport(config: &Config) -> Result<Arc<dyn Transport>> {
    let transport = HttpTransport::new(config.fetch.user_agent.as_deref())?;
    Ok(Arc::new(transport))
}

/// Build a page snapshot from a URL, an HTML file or a JSON dump
async fn load_source(source: &str, transport: &dyn Transport, config: &Config) -> Result<PageSnapshot> {
    if source.starts_with("http://") || source.starts_with("https://") {
        info!("Fetching watch page {}", source);
        let request = FetchRequest::get(source, Duration::from_secs(config.fetch.timeout_secs))
            .header("Accept", PAGE_ACCEPT);
        let response = transport
            .fetch(&request)
            .await
            .with_context(|| format!("Failed to fetch {}", source))?;
        if !response.is_success() {
            bail!("Fetching {} failed with HTTP {}", source, response.status);
        }
        return Ok(PageSnapshot::from_html(&response.body));
    }

    let path = Path::new(source);
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("json"));

    if is_json {
        debug!("Reading page globals from {}", path.display());
        PageSnapshot::from_json(&content).with_context(|| format!("Failed to parse page dump: {}", path.display()))
    } else {
        debug!("Reading saved page {}", path.display());
        Ok(PageSnapshot::from_html(&content))
    }
}

/// Open a session on `source` and discover its tracks
async fn open_session(source: &str, config: &Config) -> Result<DownloadSession<PageSnapshot>> {
    let transport = build_transport(config)?;
    let page = load_source(source, transport.as_ref(), config).await?;
    let mut session = DownloadSession::with_config(page, transport, config);

    match session.activate()? {
        Activation::Opened(tracks) => debug!("{} track(s) available", tracks.len()),
        Activation::Cancelled => bail!("Track selection was dismissed"),
    }
    Ok(session)
}

async fn run_tracks(source: &str, config: &Config) -> Result<()> {
    let session = open_session(source, config).await?;

    if let Some(title) = session.resolve_title() {
        println!("{}", title);
    }
    for (idx, track) in session.tracks().iter().enumerate() {
        let flag = if track.is_auto_generated() { "auto" } else { "" };
        println!("  [{}] {:<8} {:<4} {}", idx, track.language_code, flag, track.display_name);
    }
    Ok(())
}

async fn run_download(args: DownloadArgs, config: &Config) -> Result<()> {
    let mut session = open_session(&args.source, config).await?;

    let index = session.find_track(args.language.as_deref()).ok_or_else(|| {
        let available: Vec<&str> = session.tracks().iter().map(|t| t.language_code.as_str()).collect();
        anyhow!(
            "No subtitle track for language '{}'. Available: {}",
            args.language.as_deref().unwrap_or_default(),
            available.join(", ")
        )
    })?;

    let format = args.format.map(SubtitleFormat::from).unwrap_or(config.output.default_format);
    let directory = args.output_dir.unwrap_or_else(|| config.output.directory.clone());
    let delivery = DirectoryDelivery::new(directory).overwrite(args.force || config.output.overwrite);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Downloading {}", session.tracks()[index].label()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = session.download_to(index, format, &delivery).await;
    spinner.finish_and_clear();

    let path = result?;
    info!("✅ Subtitles saved to {}", path.display());
    Ok(())
}
