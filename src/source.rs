//! Turns user input into download requests.
//!
//! URLs come either from a command-line argument or from a text file holding
//! one URL per line. Only URLs under [`ALLOWED_PREFIXES`] are accepted.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::DownloadOptions;
use crate::error::{DownloadError, Result};

pub const ALLOWED_PREFIXES: &[&str] = &[
    "https://www.youtube.com/",
    "https://youtu.be/",
    "https://youtube.com/",
];

/// One unit of work for the pool. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub output: PathBuf,
    pub quality: String,
    pub audio_only: bool,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, options: &DownloadOptions) -> DownloadRequest {
        DownloadRequest {
            url: url.into(),
            output: options.output.clone(),
            quality: options.quality.clone(),
            audio_only: options.audio_only,
        }
    }
}

/// A line of a URL file that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based.
    pub line_number: usize,
    pub content: String,
}

/// Result of reading a URL list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UrlList {
    pub urls: Vec<String>,
    pub rejected: Vec<RejectedLine>,
}

impl UrlList {
    /// Pairs every accepted URL with the shared options, in file order.
    pub fn into_requests(self, options: &DownloadOptions) -> Vec<DownloadRequest> {
        self.urls
            .into_iter()
            .map(|url| DownloadRequest::new(url, options))
            .collect()
    }
}

pub fn is_supported_url(url: &str) -> bool {
    ALLOWED_PREFIXES.iter().any(|prefix| url.starts_with(prefix))
}

/// Checks a single URL argument.
pub fn validate_url(url: &str) -> Result<&str> {
    let url = url.trim();
    if is_supported_url(url) {
        Ok(url)
    } else {
        Err(DownloadError::InvalidUrl(url.to_string()))
    }
}

/// Parses URL-list text. Blank lines and `#` comments are skipped, invalid
/// lines are logged and collected in [`UrlList::rejected`].
pub fn parse_url_list(content: &str) -> UrlList {
    let mut list = UrlList::default();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if is_supported_url(line) {
            list.urls.push(line.to_string());
        } else {
            let line_number = index + 1;
            warn!(line_number, "line is not a valid video URL: {}", line);
            list.rejected.push(RejectedLine {
                line_number,
                content: line.to_string(),
            });
        }
    }
    list
}

pub async fn read_url_file(path: &Path) -> Result<UrlList> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DownloadError::UrlFile {
            path: path.to_owned(),
            source,
        })?;
    let list = parse_url_list(&content);
    debug!(
        path = %path.display(),
        accepted = list.urls.len(),
        rejected = list.rejected.len(),
        "read URL file"
    );
    Ok(list)
}
