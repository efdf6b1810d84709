use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = DownloadError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("worker task failed: {0}")]
    JoinError(#[from] tokio::task::JoinError),

    #[error("invalid metadata from extractor: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("not a supported video URL: {0}")]
    InvalidUrl(String),

    #[error("cannot read URL file '{}': {source}", .path.display())]
    UrlFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("yt-dlp executable not found: {0}")]
    ExtractorNotFound(String),

    #[error("yt-dlp exited with {}: {message}", .code.map_or("signal".to_string(), |c| format!("status {}", c)))]
    Extractor { code: Option<i32>, message: String },

    #[error("batch incomplete: {received} of {expected} outcomes collected")]
    IncompleteBatch { expected: usize, received: usize },
}
