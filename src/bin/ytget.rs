use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use yt_scrape::config::{DEFAULT_OUTPUT, DEFAULT_QUALITY};
use yt_scrape::downloader::check_directory;
use yt_scrape::{logging, source, DownloadOptions, DownloadRequest, FormatInfo, Result, YtDlp};

/// Download a single video
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Video URL to download
    url: String,

    /// Output directory for downloaded files
    #[clap(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Video quality preference: best, worst, 720p, 480p, 360p, ...
    #[clap(short, long, default_value = DEFAULT_QUALITY)]
    quality: String,

    /// Download only audio (MP3 format)
    #[clap(short, long)]
    audio_only: bool,

    /// List available formats for the video without downloading
    #[clap(long)]
    list_formats: bool,

    /// Path to the yt-dlp executable
    #[clap(long = "yt-dlp", env = "YT_DLP")]
    yt_dlp: Option<PathBuf>,

    /// More log output, repeat for trace
    #[clap(short, long, parse(from_occurrences))]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Args = Args::parse();
    logging::init(args.verbose);

    let url = match source::validate_url(&args.url) {
        Ok(url) => url.to_string(),
        Err(_) => {
            eprintln!("Error: Please provide a valid YouTube URL");
            return ExitCode::FAILURE;
        }
    };
    let ytdlp = match YtDlp::locate(args.yt_dlp.clone()) {
        Ok(ytdlp) => ytdlp,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    if args.list_formats {
        return match print_formats(&ytdlp, &url).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("Error listing formats: {}", err);
                ExitCode::FAILURE
            }
        };
    }

    let options = DownloadOptions {
        output: args.output,
        quality: args.quality,
        audio_only: args.audio_only,
    };
    let request = DownloadRequest::new(url, &options);
    match download(&ytdlp, &request).await {
        Ok(()) => {
            println!("Download completed successfully!");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error downloading video: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn download(ytdlp: &YtDlp, request: &DownloadRequest) -> Result<()> {
    check_directory(&request.output).await?;
    let info = ytdlp.probe(&request.url).await?;
    println!("Title: {}", info.title());
    println!("Duration: {}", info.duration_display());
    println!("Downloading to: {}", request.output.display());
    println!("{}", "-".repeat(50));
    ytdlp.fetch(request).await
}

async fn print_formats(ytdlp: &YtDlp, url: &str) -> Result<()> {
    let (info, formats) = ytdlp.list_formats(url).await?;
    println!("Available formats for: {}", info.title());
    println!("{}", "-".repeat(80));
    println!(
        "{:<12} {:<10} {:<15} {:<10}",
        "Format ID", "Extension", "Quality", "Size"
    );
    println!("{}", "-".repeat(80));
    for format in &formats {
        print_format(format);
    }
    Ok(())
}

fn print_format(format: &FormatInfo) {
    println!(
        "{:<12} {:<10} {:<15} {:<10}",
        format.id(),
        format.extension(),
        format.quality(),
        format.size_display()
    );
}
