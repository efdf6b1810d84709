//! [`Downloader`] backed by the `yt-dlp` executable.
//!
//! Each download runs the extractor twice: once to probe the title and
//! duration, once to fetch the media into the request's output directory.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::downloader::{check_directory, Downloader, FormatInfo, VideoInfo};
use crate::error::{DownloadError, Result};
use crate::source::DownloadRequest;

pub const PROGRAM: &str = "yt-dlp";
const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";
const AUDIO_FORMAT: &str = "mp3";
const AUDIO_QUALITY: &str = "192K";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProbeOutput {
    title: Option<String>,
    duration: Option<f64>,
    formats: Vec<FormatInfo>,
}

impl ProbeOutput {
    fn video_info(&self) -> VideoInfo {
        VideoInfo {
            title: self.title.clone(),
            duration: self
                .duration
                .filter(|d| d.is_finite() && *d >= 0.0)
                .map(|d| d as u64),
        }
    }
}

#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
}

impl YtDlp {
    pub fn new(program: impl Into<PathBuf>) -> YtDlp {
        YtDlp {
            program: program.into(),
        }
    }

    /// Uses `explicit` when given, otherwise looks `yt-dlp` up on `PATH`.
    pub fn locate(explicit: Option<PathBuf>) -> Result<YtDlp> {
        let program = match explicit {
            Some(path) => path,
            None => which::which(PROGRAM)
                .map_err(|e| DownloadError::ExtractorNotFound(e.to_string()))?,
        };
        debug!(program = %program.display(), "using extractor");
        Ok(YtDlp::new(program))
    }

    /// Title and duration without downloading.
    pub async fn probe(&self, url: &str) -> Result<VideoInfo> {
        Ok(self.dump(url).await?.video_info())
    }

    /// Title and format table without downloading.
    pub async fn list_formats(&self, url: &str) -> Result<(VideoInfo, Vec<FormatInfo>)> {
        let probe = self.dump(url).await?;
        let info = probe.video_info();
        Ok((info, probe.formats))
    }

    /// Downloads the media only, without probing metadata first.
    pub async fn fetch(&self, request: &DownloadRequest) -> Result<()> {
        self.run(&download_args(request)).await?;
        Ok(())
    }

    async fn dump(&self, url: &str) -> Result<ProbeOutput> {
        let args = vec![
            "--dump-single-json".to_string(),
            "--skip-download".to_string(),
            "--no-warnings".to_string(),
            url.to_string(),
        ];
        let stdout = self.run(&args).await?;
        Ok(serde_json::from_slice(&stdout)?)
    }

    async fn run(&self, args: &[String]) -> Result<Vec<u8>> {
        debug!(program = %self.program.display(), ?args, "spawning extractor");
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    DownloadError::ExtractorNotFound(self.program.display().to_string())
                }
                _ => DownloadError::Io(e),
            })?;
        if !output.status.success() {
            return Err(DownloadError::Extractor {
                code: output.status.code(),
                message: error_message(&String::from_utf8_lossy(&output.stderr)),
            });
        }
        Ok(output.stdout)
    }
}

/// Format selector handed to `-f`.
pub fn format_selector(quality: &str, audio_only: bool) -> String {
    if audio_only {
        "bestaudio/best".to_string()
    } else {
        format!("{}[ext=mp4]/best[ext=mp4]/best", quality)
    }
}

pub fn download_args(request: &DownloadRequest) -> Vec<String> {
    let template = request.output.join(OUTPUT_TEMPLATE);
    let mut args = vec![
        "-f".to_string(),
        format_selector(&request.quality, request.audio_only),
        "-o".to_string(),
        template.to_string_lossy().into_owned(),
        "--quiet".to_string(),
        "--no-progress".to_string(),
        "--no-warnings".to_string(),
    ];
    if request.audio_only {
        args.extend(
            [
                "--extract-audio",
                "--audio-format",
                AUDIO_FORMAT,
                "--audio-quality",
                AUDIO_QUALITY,
            ]
            .map(String::from),
        );
    }
    args.push(request.url.clone());
    args
}

/// Picks the most useful line of extractor stderr.
fn error_message(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR:"))
        .or(lines.last())
        .map(|l| l.to_string())
        .unwrap_or_else(|| "no error output".to_string())
}

#[async_trait]
impl Downloader for YtDlp {
    async fn download(&self, request: &DownloadRequest) -> Result<VideoInfo> {
        check_directory(&request.output).await?;
        let info = self.probe(&request.url).await?;
        info!(
            url = %request.url,
            title = info.title(),
            duration = %info.duration_display(),
            "starting download"
        );
        self.fetch(request).await?;
        Ok(info)
    }
}
