//! Concurrent video downloads on top of `yt-dlp`.
//!
//! URLs are validated by [`source`], turned into [`DownloadRequest`]s and run
//! through a bounded [`WorkerPool`]. Every request yields exactly one
//! [`DownloadOutcome`], collected into a [`ResultSet`].

pub mod config;
pub mod downloader;
pub mod error;
pub mod logging;
pub mod outcome;
pub mod pool;
pub mod source;
pub mod ytdlp;

pub use config::DownloadOptions;
pub use downloader::{Downloader, FormatInfo, VideoInfo};
pub use error::{DownloadError, Result};
pub use outcome::{DownloadOutcome, ResultSet};
pub use pool::WorkerPool;
pub use source::DownloadRequest;
pub use ytdlp::YtDlp;
