use std::path::PathBuf;
use tracing::warn;

/// Worker count used when none is given or the given one is out of range.
pub const DEFAULT_WORKERS: usize = 10;
/// Largest accepted worker count.
pub const MAX_WORKERS: usize = 20;

pub const DEFAULT_OUTPUT: &str = "./downloads";
pub const DEFAULT_QUALITY: &str = "best";

/// Options shared by every request of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    pub output: PathBuf,
    pub quality: String,
    pub audio_only: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        DownloadOptions {
            output: PathBuf::from(DEFAULT_OUTPUT),
            quality: DEFAULT_QUALITY.to_string(),
            audio_only: false,
        }
    }
}

/// Maps a requested worker count onto `1..=MAX_WORKERS`.
///
/// Out-of-range values are not an error: they fall back to
/// [`DEFAULT_WORKERS`] and a warning is logged.
pub fn clamp_workers(requested: i64) -> usize {
    if requested < 1 || requested > MAX_WORKERS as i64 {
        warn!(
            requested,
            "workers count should be between 1 and {}, using {}", MAX_WORKERS, DEFAULT_WORKERS
        );
        return DEFAULT_WORKERS;
    }
    requested as usize
}
