use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;

use crate::error::Result;
use crate::source::DownloadRequest;

/// Descriptive metadata reported by a finished download.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoInfo {
    pub title: Option<String>,
    /// Seconds.
    pub duration: Option<u64>,
}

impl VideoInfo {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown")
    }

    /// `m:ss`, `0:00` when unknown.
    pub fn duration_display(&self) -> String {
        let seconds = self.duration.unwrap_or(0);
        format!("{}:{:02}", seconds / 60, seconds % 60)
    }
}

/// One entry of the extractor's format table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormatInfo {
    pub format_id: Option<String>,
    pub ext: Option<String>,
    pub format_note: Option<String>,
    pub resolution: Option<String>,
    pub filesize: Option<u64>,
}

impl FormatInfo {
    pub fn id(&self) -> &str {
        self.format_id.as_deref().unwrap_or("N/A")
    }

    pub fn extension(&self) -> &str {
        self.ext.as_deref().unwrap_or("N/A")
    }

    /// Format note, falling back to the resolution.
    pub fn quality(&self) -> &str {
        self.format_note
            .as_deref()
            .or(self.resolution.as_deref())
            .unwrap_or("N/A")
    }

    pub fn size_display(&self) -> String {
        match self.filesize {
            Some(bytes) => format!("{}MB", bytes / (1024 * 1024)),
            None => "Unknown".to_string(),
        }
    }
}

/// The operation run once per request by the worker pool.
///
/// Implementations either leave a file in `request.output` and return its
/// metadata, or fail with an error whose message is shown to the user.
#[async_trait]
pub trait Downloader: Send + Sync + 'static {
    async fn download(&self, request: &DownloadRequest) -> Result<VideoInfo>;
}

/// Creates the destination directory if needed. Safe to call concurrently and
/// repeatedly for the same path.
pub async fn check_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}
