use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::errors::DeliveryError;

// @module: Filename derivation and file delivery

/// Name used when a title sanitizes to nothing
pub const DEFAULT_FILENAME: &str = "youtube_subtitles";

/// Characters that are not allowed in file names on common platforms
const RESERVED_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Make a title safe to use as a file name.
    ///
    /// Reserved characters and control characters become `_`, the result is
    /// cut to `max_chars` characters, and an empty result falls back to
    /// `youtube_subtitles`.
    pub fn sanitize_filename(name: &str, max_chars: usize) -> String {
        let sanitized: String = Self::replace_reserved(name).take(max_chars).collect();

        if sanitized.is_empty() {
            DEFAULT_FILENAME.to_string()
        } else {
            sanitized
        }
    }

    // @generates: `<sanitized title>.<sanitized language>.<extension>`
    pub fn derive_filename(title: &str, language_code: &str, extension: &str, max_chars: usize) -> String {
        format!(
            "{}.{}.{}",
            Self::sanitize_filename(title, max_chars),
            Self::replace_reserved(language_code).collect::<String>(),
            extension
        )
    }

    /// True when `filename` names an entry directly inside a directory
    pub fn is_plain_filename(filename: &str) -> bool {
        let mut components = Path::new(filename).components();
        matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        )
    }

    fn replace_reserved(name: &str) -> impl Iterator<Item = char> + '_ {
        name.chars().map(|c| {
            if RESERVED_CHARS.contains(&c) || c.is_ascii_control() {
                '_'
            } else {
                c
            }
        })
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file, creating parent directories as needed
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content).with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Write a string to a file that must not exist yet
    pub fn write_new_file<P: AsRef<Path>>(path: P, content: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(path.as_ref())?;
        file.write_all(content.as_bytes())?;
        file.flush()
    }
}

/// Where a finished subtitle file ends up
pub trait Delivery {
    /// Hand `content` over under `filename`, returning where it went
    fn deliver(&self, filename: &str, content: &str) -> Result<PathBuf, DeliveryError>;
}

/// Saves files into a directory on disk
#[derive(Debug, Clone)]
pub struct DirectoryDelivery {
    directory: PathBuf,
    overwrite: bool,
}

impl DirectoryDelivery {
    /// Deliver into `directory`, refusing to replace existing files
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            overwrite: false,
        }
    }

    /// Allow or refuse replacing existing files
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Target directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl Delivery for DirectoryDelivery {
    fn deliver(&self, filename: &str, content: &str) -> Result<PathBuf, DeliveryError> {
        if !FileManager::is_plain_filename(filename) {
            return Err(DeliveryError::InvalidFilename(filename.to_string()));
        }

        FileManager::ensure_dir(&self.directory).map_err(|e| DeliveryError::Write(format!("{:#}", e)))?;
        let path = self.directory.join(filename);

        if self.overwrite {
            FileManager::write_to_file(&path, content).map_err(|e| DeliveryError::Write(format!("{:#}", e)))?;
        } else {
            match FileManager::write_new_file(&path, content) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    return Err(DeliveryError::AlreadyExists(path.display().to_string()));
                }
                Err(e) => return Err(e.into()),
            }
        }

        debug!("Wrote {} byte(s) to {:?}", content.len(), path);
        info!("Saved {}", path.display());
        Ok(path)
    }
}
